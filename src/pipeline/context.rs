//! Pipeline context for managing dependencies

use std::sync::Arc;

use crate::bundler::{AppBundler, BundleOutcome, BundlePlan, BundleSettings};
use crate::config::BuildConfig;
use crate::linker::{RuntimeImage, RuntimeLinker};
use crate::process::ProcessRunner;
use crate::progress::{NoOpHandler, ProgressHandler};
use crate::resolver::{ModuleResolver, Resolution, ResolveScope};

/// Context that owns all long-lived pipeline dependencies
pub struct PipelineContext {
    /// Resolved build configuration
    pub config: BuildConfig,

    /// Runs the external platform tools
    pub runner: Arc<dyn ProcessRunner>,

    /// Receives progress events
    pub progress: Arc<dyn ProgressHandler>,
}

impl PipelineContext {
    pub fn new(config: BuildConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            config,
            runner,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn resolver(&self) -> ModuleResolver {
        ModuleResolver::new(
            Arc::clone(&self.runner),
            self.config.jdk_layout(),
            self.config.analysis_timeout,
        )
        .with_progress(Arc::clone(&self.progress))
    }

    pub fn resolve_scope(&self) -> ResolveScope {
        ResolveScope::from_config(&self.config)
    }

    pub fn linker(&self) -> RuntimeLinker {
        RuntimeLinker::new(
            Arc::clone(&self.runner),
            self.config.jdk_layout(),
            self.config.link_timeout,
        )
    }

    pub fn bundler(&self) -> AppBundler {
        AppBundler::new(BundleSettings::from_config(&self.config))
    }
}

/// Results handed from one phase to the next
#[derive(Debug, Default)]
pub struct PipelineState {
    pub resolution: Option<Resolution>,
    pub plan: Option<BundlePlan>,
    pub image: Option<RuntimeImage>,
    pub bundle: Option<BundleOutcome>,
    pub skipped: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockProcessRunner;
    use std::path::Path;

    fn config() -> BuildConfig {
        BuildConfig::builder()
            .java_home("/jdk")
            .main_class("app.Main")
            .build_relative_to(Path::new("/work"))
            .unwrap()
    }

    #[test]
    fn test_context_derives_collaborators() {
        let context = PipelineContext::new(config(), Arc::new(MockProcessRunner::new()));

        assert_eq!(
            context.resolve_scope(),
            ResolveScope::Directory(context.config.libs_dir.clone())
        );
        assert_eq!(
            context.bundler().settings().main_class.as_deref(),
            Some("app.Main")
        );
    }

    #[test]
    fn test_state_starts_empty() {
        let state = PipelineState::default();
        assert!(state.resolution.is_none());
        assert!(state.image.is_none());
        assert!(state.skipped.is_none());
    }
}
