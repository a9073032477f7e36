//! Platform module resolution
//!
//! Determines which platform modules an application needs by running the
//! dependency analyzer once per archive, concurrently, and merging the results.
//! Alternatively every module of the platform installation can be selected, in
//! which case no archive is inspected.

mod module_set;
mod parse;

pub use module_set::{ModuleName, ModuleSet};
pub use parse::{parse_dependency_line, parse_module_listing_line};

use crate::config::BuildConfig;
use crate::jdk::JdkLayout;
use crate::process::{ProcessError, ProcessRunner};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::util::fs::list_files;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to list archive directory {path}: {source}")]
    ArchiveDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Archive directory is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Archive analysis task failed: {0}")]
    Task(String),
}

/// Which inputs decide the module set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveScope {
    /// Every module the platform installation provides
    AllPlatformModules,
    /// Every file directly inside the directory
    Directory(PathBuf),
    /// One self-contained archive standing in for the whole application
    SingleArchive(PathBuf),
}

impl ResolveScope {
    pub fn from_config(config: &BuildConfig) -> Self {
        if config.all_modules {
            return ResolveScope::AllPlatformModules;
        }
        if config.fat_jar {
            match &config.executable_jar {
                Some(name) => return ResolveScope::SingleArchive(config.libs_dir.join(name)),
                None => warn!("Fat jar mode needs an executable jar name; analyzing the whole libs directory"),
            }
        }
        ResolveScope::Directory(config.libs_dir.clone())
    }
}

/// Outcome of a resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub modules: ModuleSet,
    /// Archives that were analysed; empty when all platform modules were selected
    pub archives: Vec<PathBuf>,
}

pub struct ModuleResolver {
    runner: Arc<dyn ProcessRunner>,
    jdk: JdkLayout,
    timeout: Duration,
    progress: Arc<dyn ProgressHandler>,
}

impl ModuleResolver {
    pub fn new(runner: Arc<dyn ProcessRunner>, jdk: JdkLayout, timeout: Duration) -> Self {
        Self {
            runner,
            jdk,
            timeout,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub async fn resolve(&self, scope: &ResolveScope) -> Result<Resolution, ResolveError> {
        let resolution = match scope {
            ResolveScope::AllPlatformModules => Resolution {
                modules: self.all_platform_modules().await?,
                archives: Vec::new(),
            },
            ResolveScope::Directory(dir) => {
                let archives = archives_in(dir)?;
                let modules = self.modules_of_archives(&archives).await?;
                Resolution { modules, archives }
            }
            ResolveScope::SingleArchive(archive) => {
                let archives = vec![archive.clone()];
                let modules = self.modules_of_archives(&archives).await?;
                Resolution { modules, archives }
            }
        };

        self.progress.on_progress(&ProgressEvent::ModulesResolved {
            modules: resolution.modules.len(),
            archives: resolution.archives.len(),
        });
        Ok(resolution)
    }

    /// Lists every module of the platform installation
    pub async fn all_platform_modules(&self) -> Result<ModuleSet, ResolveError> {
        let command = self.jdk.list_modules_command(self.timeout);
        let modules: ModuleSet = self
            .runner
            .run_lines(&command)
            .await?
            .iter()
            .filter_map(|line| parse_module_listing_line(line))
            .collect();

        info!(modules = modules.len(), "Selected all platform modules");
        Ok(modules)
    }

    /// Analyses each archive concurrently and unions their platform modules
    ///
    /// The first failing analysis aborts the others.
    pub async fn modules_of_archives(&self, archives: &[PathBuf]) -> Result<ModuleSet, ResolveError> {
        let mut tasks = JoinSet::new();
        for archive in archives {
            let runner = Arc::clone(&self.runner);
            let progress = Arc::clone(&self.progress);
            let command = self.jdk.list_deps_command(archive, self.timeout);
            let archive = archive.display().to_string();

            tasks.spawn(async move {
                let start = Instant::now();
                let modules: ModuleSet = runner
                    .run_lines(&command)
                    .await?
                    .iter()
                    .filter_map(|line| parse_dependency_line(line))
                    .collect();

                debug!(archive = %archive, modules = %modules, "Resolved archive dependencies");
                progress.on_progress(&ProgressEvent::ArchiveAnalyzed {
                    archive,
                    modules: modules.len(),
                    duration: start.elapsed(),
                });
                Ok::<_, ProcessError>(modules)
            });
        }

        let mut modules = ModuleSet::new();
        while let Some(joined) = tasks.join_next().await {
            let archive_modules = joined.map_err(|e| ResolveError::Task(e.to_string()))??;
            modules.union_with(archive_modules);
        }
        Ok(modules)
    }
}

fn archives_in(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    if !dir.exists() {
        warn!("Archive directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(ResolveError::NotADirectory(dir.to_path_buf()));
    }
    list_files(dir).map_err(|source| ResolveError::ArchiveDirectory {
        path: dir.to_path_buf(),
        source,
    })
}
