//! Runtime image linking
//!
//! The output directory is always rebuilt from scratch: a previous image is
//! removed before the linker runs so modules dropped from the set cannot linger.

use crate::jdk::JdkLayout;
use crate::process::{ProcessError, ProcessRunner};
use crate::resolver::ModuleSet;
use crate::util::fs::remove_if_exists;
use serde::Serialize;
use std::env::{consts::EXE_SUFFIX, JoinPathsError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Refusing to link an empty module set")]
    EmptyModuleSet,

    #[error("Failed to remove stale runtime image {path}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid module path: {0}")]
    InvalidModulePath(#[from] JoinPathsError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Linker finished but produced no lib directory in {0}")]
    MissingLibDir(PathBuf),
}

/// A linked runtime image on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeImage {
    root: PathBuf,
}

impl RuntimeImage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// The image's own launcher binary
    pub fn java_executable(&self) -> PathBuf {
        self.bin_dir().join(format!("java{}", EXE_SUFFIX))
    }

    pub fn launcher_path(&self, app_name: &str) -> PathBuf {
        self.bin_dir().join(app_name)
    }
}

pub struct RuntimeLinker {
    runner: Arc<dyn ProcessRunner>,
    jdk: JdkLayout,
    timeout: Duration,
}

impl RuntimeLinker {
    pub fn new(runner: Arc<dyn ProcessRunner>, jdk: JdkLayout, timeout: Duration) -> Self {
        Self {
            runner,
            jdk,
            timeout,
        }
    }

    /// Links `modules` into a fresh runtime image at `output_dir`
    pub async fn link(&self, modules: &ModuleSet, output_dir: &Path) -> Result<RuntimeImage, LinkError> {
        if modules.is_empty() {
            return Err(LinkError::EmptyModuleSet);
        }

        let command = self.jdk.link_command(modules.names(), output_dir, self.timeout)?;

        if remove_if_exists(output_dir).map_err(|source| LinkError::RemoveStale {
            path: output_dir.to_path_buf(),
            source,
        })? {
            debug!("Removed stale runtime image {}", output_dir.display());
        }

        info!(modules = %modules, output = %output_dir.display(), "Linking runtime image");
        self.runner.run(&command).await?;

        let image = RuntimeImage::new(output_dir);
        if !image.lib_dir().is_dir() {
            return Err(LinkError::MissingLibDir(output_dir.to_path_buf()));
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{MockProcessRunner, MockResponse};
    use std::fs;
    use tempfile::TempDir;

    fn modules(names: &[&str]) -> ModuleSet {
        names.iter().filter_map(|n| crate::resolver::ModuleName::new(n)).collect()
    }

    fn linker(runner: &Arc<MockProcessRunner>) -> RuntimeLinker {
        RuntimeLinker::new(
            runner.clone(),
            JdkLayout::new("/jdk", "/jdk"),
            Duration::from_secs(60),
        )
    }

    /// Fake linker that materialises the image layout at `--output`
    fn creates_image() -> MockResponse {
        MockResponse::success().with_side_effect(|command| {
            let output = command.arg_after("--output").map(PathBuf::from).unwrap_or_default();
            fs::create_dir_all(output.join("lib"))?;
            fs::create_dir_all(output.join("bin"))
        })
    }

    #[test]
    fn test_runtime_image_layout() {
        let image = RuntimeImage::new("/out/app");
        assert_eq!(image.lib_dir(), PathBuf::from("/out/app/lib"));
        assert_eq!(image.bin_dir(), PathBuf::from("/out/app/bin"));
        assert_eq!(image.launcher_path("demo"), PathBuf::from("/out/app/bin/demo"));
        assert!(image.java_executable().starts_with("/out/app/bin"));
    }

    #[tokio::test]
    async fn test_link_passes_sorted_modules() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("app");
        let runner = Arc::new(MockProcessRunner::new());
        runner.respond("jlink", creates_image());

        let image = linker(&runner)
            .link(&modules(&["java.sql", "java.base"]), &output)
            .await
            .unwrap();

        assert_eq!(image.root(), output.as_path());
        let calls = runner.calls_to("jlink");
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].arg_after("--add-modules").unwrap().to_string_lossy(),
            "java.base,java.sql"
        );
        assert!(calls[0].has_arg("--no-header-files"));
        assert!(calls[0].has_arg("--no-man-pages"));
        assert!(calls[0].has_arg("--compress=2"));
    }

    #[tokio::test]
    async fn test_link_removes_stale_image() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("app");
        fs::create_dir_all(output.join("lib")).unwrap();
        fs::write(output.join("lib").join("stale.jar"), "old").unwrap();

        let runner = Arc::new(MockProcessRunner::new());
        runner.respond("jlink", creates_image());

        linker(&runner).link(&modules(&["java.base"]), &output).await.unwrap();

        assert!(output.join("lib").is_dir());
        assert!(!output.join("lib").join("stale.jar").exists());
    }

    #[tokio::test]
    async fn test_empty_module_set_is_rejected() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("app");
        let runner = Arc::new(MockProcessRunner::new());

        let err = linker(&runner).link(&ModuleSet::new(), &output).await.unwrap_err();

        assert!(matches!(err, LinkError::EmptyModuleSet));
        assert!(runner.calls().is_empty());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_linker_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(MockProcessRunner::new());
        runner.respond("jlink", MockResponse::failure(1, "Error: module not found: java.nope"));

        let err = linker(&runner)
            .link(&modules(&["java.nope"]), &temp.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(err, LinkError::Process(ProcessError::NonZeroExit { .. })));
    }

    #[tokio::test]
    async fn test_missing_lib_dir_after_link() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(MockProcessRunner::new());
        runner.respond("jlink", MockResponse::success());

        let err = linker(&runner)
            .link(&modules(&["java.base"]), &temp.path().join("app"))
            .await
            .unwrap_err();

        assert!(matches!(err, LinkError::MissingLibDir(_)));
    }
}
