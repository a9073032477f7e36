//! Application bundling
//!
//! Turns a linked runtime image into a runnable application: the archives are
//! copied into the image's `lib` directory and a launcher script that starts the
//! executable archive is written to its `bin` directory.
//!
//! Bundling is split in two steps. [`BundlePlan::prepare`] only reads the archive
//! directory, so configuration problems such as an ambiguous executable archive
//! surface before the output directory is touched. [`AppBundler::apply`] then
//! performs the file system work against a linked image.

mod classpath;
mod launcher;

pub use classpath::{Classpath, SEPARATOR};
pub use launcher::LauncherScript;

use crate::config::BuildConfig;
use crate::linker::RuntimeImage;
use crate::util::fs::{copy_dir_recursive, list_files};
use serde::Serialize;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Runtime image has no lib directory: {0}")]
    MissingLibDir(PathBuf),

    #[error("Runtime lib path is not a directory: {0}")]
    LibNotADirectory(PathBuf),

    #[error("A main class is required to bundle the application")]
    MissingMainClass,

    #[error(
        "Expected only a single jar in {} but found {count}. Please specify the executable jar explicitly",
        .dir.display()
    )]
    ExecutableArchiveCount { dir: PathBuf, count: usize },

    #[error("Executable jar not found: {0}")]
    ExecutableArchiveNotFound(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The parts of the build configuration the bundler reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSettings {
    pub main_class: Option<String>,
    pub executable_jar: Option<String>,
    pub jvm_args: Option<String>,
    pub app_args: Option<String>,
    pub app_name: String,
    pub windows_launcher: bool,
}

impl BundleSettings {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            main_class: config.main_class.clone(),
            executable_jar: config.executable_jar.clone(),
            jvm_args: config.jvm_args.clone(),
            app_args: config.app_args.clone(),
            app_name: config.app_name.clone(),
            windows_launcher: config.windows_launcher,
        }
    }
}

/// Decisions taken from the archive directory before anything is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundlePlan {
    pub libs_dir: PathBuf,
    pub main_class: String,
    /// File name of the archive passed to `-jar`
    pub executable_archive: String,
    /// File names of every other archive, in listing order
    pub classpath_archives: Vec<String>,
}

impl BundlePlan {
    /// Selects the executable archive and the classpath archives in `libs_dir`
    pub fn prepare(libs_dir: &Path, settings: &BundleSettings) -> Result<Self, BundleError> {
        let main_class = settings
            .main_class
            .clone()
            .ok_or(BundleError::MissingMainClass)?;
        let archives = archive_names(libs_dir)?;

        let executable_archive = match &settings.executable_jar {
            Some(name) => archive_name_in(libs_dir, name),
            None => match archives.as_slice() {
                [only] => only.clone(),
                _ => {
                    return Err(BundleError::ExecutableArchiveCount {
                        dir: libs_dir.to_path_buf(),
                        count: archives.len(),
                    })
                }
            },
        };

        let executable_path = libs_dir.join(&executable_archive);
        if !executable_path.is_file() {
            return Err(BundleError::ExecutableArchiveNotFound(executable_path));
        }

        let classpath_archives = archives
            .into_iter()
            .filter(|name| *name != executable_archive)
            .collect();

        debug!(executable = %executable_archive, "Selected executable archive");
        Ok(Self {
            libs_dir: libs_dir.to_path_buf(),
            main_class,
            executable_archive,
            classpath_archives,
        })
    }

    pub fn classpath(&self, image: &RuntimeImage) -> Classpath {
        Classpath::from_names(&image.lib_dir(), &self.classpath_archives)
    }
}

/// What a bundling run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleOutcome {
    pub executable_archive: String,
    pub classpath: String,
    pub copied_files: usize,
    pub launchers: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppBundler {
    settings: BundleSettings,
}

impl AppBundler {
    pub fn new(settings: BundleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BundleSettings {
        &self.settings
    }

    pub fn prepare(&self, libs_dir: &Path) -> Result<BundlePlan, BundleError> {
        BundlePlan::prepare(libs_dir, &self.settings)
    }

    /// Copies the archives into the image and writes the launcher(s)
    pub fn apply(&self, plan: &BundlePlan, image: &RuntimeImage) -> Result<BundleOutcome, BundleError> {
        let lib_dir = image.lib_dir();
        if !lib_dir.exists() {
            return Err(BundleError::MissingLibDir(lib_dir));
        }
        if !lib_dir.is_dir() {
            return Err(BundleError::LibNotADirectory(lib_dir));
        }

        let copied_files = copy_dir_recursive(&plan.libs_dir, &lib_dir).map_err(BundleError::io(&plan.libs_dir))?;
        debug!(files = copied_files, "Copied application archives into {}", lib_dir.display());

        let classpath = plan.classpath(image);
        let launcher = LauncherScript::new(
            &image.java_executable(),
            self.settings.jvm_args.as_deref(),
            &lib_dir.join(&plan.executable_archive),
            &plan.main_class,
            self.settings.app_args.as_deref(),
            &classpath,
        );

        let script_path = image.launcher_path(&self.settings.app_name);
        launcher.write_unix(&script_path).map_err(BundleError::io(&script_path))?;
        let mut launchers = vec![script_path];

        if self.settings.windows_launcher {
            let bat_path = image.launcher_path(&format!("{}.bat", self.settings.app_name));
            launcher.write_windows(&bat_path).map_err(BundleError::io(&bat_path))?;
            launchers.push(bat_path);
        }

        info!(launcher = %launchers[0].display(), "Application bundled");
        Ok(BundleOutcome {
            executable_archive: plan.executable_archive.clone(),
            classpath: classpath.to_string(),
            copied_files,
            launchers,
        })
    }

    pub fn bundle(&self, libs_dir: &Path, image: &RuntimeImage) -> Result<BundleOutcome, BundleError> {
        let plan = self.prepare(libs_dir)?;
        self.apply(&plan, image)
    }
}

/// An explicit archive name relative to `libs_dir`, without `.` components, so that
/// `./app.jar` and `<libs>/app.jar` compare equal to the listed `app.jar`
fn archive_name_in(libs_dir: &Path, name: &str) -> String {
    let path = Path::new(name);
    path.strip_prefix(libs_dir)
        .unwrap_or(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

/// Regular file names directly inside `dir`; a missing directory has none
fn archive_names(dir: &Path) -> Result<Vec<String>, BundleError> {
    if !dir.exists() {
        warn!("Archive directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let files = list_files(dir).map_err(BundleError::io(dir))?;
    Ok(files
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect())
}
