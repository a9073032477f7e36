//! Build configuration for linkpack
//!
//! A [`BuildConfig`] is assembled once through [`BuildConfigBuilder`] and is read-only
//! afterwards. The builder starts from environment defaults, takes explicit overrides
//! (usually from the command line), resolves every path to absolute form and
//! normalises optional strings so that an empty value counts as absent.
//!
//! # Environment Variables
//!
//! - `LINKPACK_JAVA_HOME`, then `JAVA_HOME`: platform installation holding the tools - **required**
//! - `LINKPACK_MODULES_HOME`: installation holding `jmods` - default: the java home
//! - `LINKPACK_BUILD_DIR`: build output root - default: "build"
//! - `LINKPACK_ANALYSIS_TIMEOUT`: per-archive analysis timeout in seconds - default: "120"
//! - `LINKPACK_LINK_TIMEOUT`: linker timeout in seconds - default: "1200"
//!
//! # Example
//!
//! ```no_run
//! use linkpack::BuildConfigBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BuildConfigBuilder::from_env()?
//!     .main_class("com.example.Main")
//!     .app_name("example")
//!     .build()?;
//!
//! println!("{}", config);
//! # Ok(())
//! # }
//! ```

use crate::jdk::JdkLayout;
use crate::util::fs::absolutize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_BUILD_DIR: &str = "build";
const DEFAULT_APP_NAME: &str = "app";
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LINK_TIMEOUT_SECS: u64 = 1200; // 20 minutes

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform installation given
    #[error("Java home not specified. Pass --java-home or set LINKPACK_JAVA_HOME or JAVA_HOME")]
    MissingJavaHome,

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
}

/// Fully resolved inputs of one pipeline run
///
/// Paths are absolute. Optional strings are `None` or non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Installation providing `jdeps`, `jlink` and `java`
    pub java_home: PathBuf,

    /// Installation providing the `jmods` directory
    pub modules_home: PathBuf,

    pub build_dir: PathBuf,

    /// Directory holding the application archives
    pub libs_dir: PathBuf,

    /// Where the runtime image is linked
    pub output_dir: PathBuf,

    pub executable_jar: Option<String>,
    pub main_class: Option<String>,
    pub jvm_args: Option<String>,
    pub app_args: Option<String>,

    /// Launcher script file name
    pub app_name: String,

    /// Link every platform module instead of analysing archives
    pub all_modules: bool,

    /// Analyse only the executable archive
    pub fat_jar: bool,

    /// Echo external command lines at info level
    pub verbose: bool,

    /// Module-path entries searched after `<modules_home>/jmods`
    pub extra_module_path: Vec<PathBuf>,

    pub analysis_timeout: Duration,
    pub link_timeout: Duration,

    /// Also write a `.bat` launcher next to the shell one
    pub windows_launcher: bool,
}

impl BuildConfig {
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    pub fn jdk_layout(&self) -> JdkLayout {
        JdkLayout::new(&self.java_home, &self.modules_home)
            .with_extra_module_path(self.extra_module_path.clone())
    }

    /// Whether a launcher will be generated after linking
    pub fn bundles_application(&self) -> bool {
        self.main_class.is_some()
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for zero timeouts, an unusable app name, or when
    /// all-modules and fat-jar mode are combined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "Analysis timeout must be at least 1 second".to_string(),
            ));
        }
        if self.link_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "Link timeout must be at least 1 second".to_string(),
            ));
        }

        if self.app_name.is_empty() || self.app_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidOption(format!(
                "App name '{}' must be a plain file name",
                self.app_name
            )));
        }

        if self.all_modules && self.fat_jar {
            return Err(ConfigError::ConflictingOptions(
                "all-modules and fat-jar cannot be used together".to_string(),
            ));
        }

        Ok(())
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("java_home".to_string(), self.java_home.display().to_string());
        map.insert(
            "modules_home".to_string(),
            self.modules_home.display().to_string(),
        );
        map.insert("build_dir".to_string(), self.build_dir.display().to_string());
        map.insert("libs_dir".to_string(), self.libs_dir.display().to_string());
        map.insert(
            "output_dir".to_string(),
            self.output_dir.display().to_string(),
        );
        if let Some(ref jar) = self.executable_jar {
            map.insert("executable_jar".to_string(), jar.clone());
        }
        if let Some(ref class) = self.main_class {
            map.insert("main_class".to_string(), class.clone());
        }
        if let Some(ref args) = self.jvm_args {
            map.insert("jvm_args".to_string(), args.clone());
        }
        if let Some(ref args) = self.app_args {
            map.insert("app_args".to_string(), args.clone());
        }
        map.insert("app_name".to_string(), self.app_name.clone());
        map.insert("all_modules".to_string(), self.all_modules.to_string());
        map.insert("fat_jar".to_string(), self.fat_jar.to_string());
        map.insert("verbose".to_string(), self.verbose.to_string());
        if !self.extra_module_path.is_empty() {
            let paths: Vec<String> = self
                .extra_module_path
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            map.insert("extra_module_path".to_string(), paths.join(", "));
        }
        map.insert(
            "analysis_timeout_secs".to_string(),
            self.analysis_timeout.as_secs().to_string(),
        );
        map.insert(
            "link_timeout_secs".to_string(),
            self.link_timeout.as_secs().to_string(),
        );
        map.insert(
            "windows_launcher".to_string(),
            self.windows_launcher.to_string(),
        );

        map
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Linkpack Configuration:")?;
        writeln!(f, "  Java Home: {}", self.java_home.display())?;
        writeln!(f, "  Modules Home: {}", self.modules_home.display())?;
        writeln!(f, "  Libs Dir: {}", self.libs_dir.display())?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        if let Some(ref jar) = self.executable_jar {
            writeln!(f, "  Executable Jar: {}", jar)?;
        }
        if let Some(ref class) = self.main_class {
            writeln!(f, "  Main Class: {}", class)?;
        }
        if let Some(ref args) = self.jvm_args {
            writeln!(f, "  JVM Args: {}", args)?;
        }
        if let Some(ref args) = self.app_args {
            writeln!(f, "  App Args: {}", args)?;
        }
        writeln!(f, "  App Name: {}", self.app_name)?;
        writeln!(f, "  All Modules: {}", self.all_modules)?;
        writeln!(f, "  Fat Jar: {}", self.fat_jar)?;
        for path in &self.extra_module_path {
            writeln!(f, "  Module Path: {}", path.display())?;
        }
        writeln!(f, "  Analysis Timeout: {}s", self.analysis_timeout.as_secs())?;
        writeln!(f, "  Link Timeout: {}s", self.link_timeout.as_secs())?;
        writeln!(f, "  Windows Launcher: {}", self.windows_launcher)?;
        Ok(())
    }
}

/// Collects configuration values before they are resolved into a [`BuildConfig`]
#[derive(Debug, Clone, Default)]
pub struct BuildConfigBuilder {
    java_home: Option<PathBuf>,
    modules_home: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    libs_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    executable_jar: Option<String>,
    main_class: Option<String>,
    jvm_args: Option<String>,
    app_args: Option<String>,
    app_name: Option<String>,
    all_modules: bool,
    fat_jar: bool,
    verbose: bool,
    extra_module_path: Vec<PathBuf>,
    analysis_timeout_secs: Option<u64>,
    link_timeout_secs: Option<u64>,
    windows_launcher: bool,
}

impl BuildConfigBuilder {
    /// Starts from the `LINKPACK_*` (and `JAVA_HOME`) environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            java_home: env_value("LINKPACK_JAVA_HOME")
                .or_else(|| env_value("JAVA_HOME"))
                .map(PathBuf::from),
            modules_home: env_value("LINKPACK_MODULES_HOME").map(PathBuf::from),
            build_dir: env_value("LINKPACK_BUILD_DIR").map(PathBuf::from),
            analysis_timeout_secs: env_secs("LINKPACK_ANALYSIS_TIMEOUT")?,
            link_timeout_secs: env_secs("LINKPACK_LINK_TIMEOUT")?,
            ..Self::default()
        })
    }

    pub fn java_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.java_home = Some(path.into());
        self
    }

    pub fn modules_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.modules_home = Some(path.into());
        self
    }

    pub fn build_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_dir = Some(path.into());
        self
    }

    pub fn libs_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.libs_dir = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn executable_jar(mut self, name: impl Into<String>) -> Self {
        self.executable_jar = Some(name.into());
        self
    }

    pub fn main_class(mut self, class: impl Into<String>) -> Self {
        self.main_class = Some(class.into());
        self
    }

    pub fn jvm_args(mut self, args: impl Into<String>) -> Self {
        self.jvm_args = Some(args.into());
        self
    }

    pub fn app_args(mut self, args: impl Into<String>) -> Self {
        self.app_args = Some(args.into());
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn all_modules(mut self, enabled: bool) -> Self {
        self.all_modules = enabled;
        self
    }

    pub fn fat_jar(mut self, enabled: bool) -> Self {
        self.fat_jar = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn module_path_entry(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_module_path.push(path.into());
        self
    }

    pub fn analysis_timeout_secs(mut self, secs: u64) -> Self {
        self.analysis_timeout_secs = Some(secs);
        self
    }

    pub fn link_timeout_secs(mut self, secs: u64) -> Self {
        self.link_timeout_secs = Some(secs);
        self
    }

    pub fn windows_launcher(mut self, enabled: bool) -> Self {
        self.windows_launcher = enabled;
        self
    }

    /// Resolves relative paths against the current working directory
    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        let cwd = env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        self.build_relative_to(&cwd)
    }

    /// Resolves relative paths against `base` and validates the result
    pub fn build_relative_to(self, base: &Path) -> Result<BuildConfig, ConfigError> {
        let java_home = self
            .java_home
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| absolutize(base, &p))
            .ok_or(ConfigError::MissingJavaHome)?;
        let modules_home = self
            .modules_home
            .map(|p| absolutize(base, &p))
            .unwrap_or_else(|| java_home.clone());

        let build_dir = absolutize(
            base,
            &self
                .build_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
        );
        let libs_dir = self
            .libs_dir
            .map(|p| absolutize(base, &p))
            .unwrap_or_else(|| build_dir.join("libs"));
        let output_dir = self
            .output_dir
            .map(|p| absolutize(base, &p))
            .unwrap_or_else(|| build_dir.join("app"));

        let config = BuildConfig {
            java_home,
            modules_home,
            build_dir,
            libs_dir,
            output_dir,
            executable_jar: present(self.executable_jar),
            main_class: present(self.main_class),
            jvm_args: present(self.jvm_args),
            app_args: present(self.app_args),
            app_name: present(self.app_name).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            all_modules: self.all_modules,
            fat_jar: self.fat_jar,
            verbose: self.verbose,
            extra_module_path: self
                .extra_module_path
                .iter()
                .map(|p| absolutize(base, p))
                .collect(),
            analysis_timeout: Duration::from_secs(
                self.analysis_timeout_secs
                    .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS),
            ),
            link_timeout: Duration::from_secs(
                self.link_timeout_secs.unwrap_or(DEFAULT_LINK_TIMEOUT_SECS),
            ),
            windows_launcher: self.windows_launcher,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Trimmed value, with blank strings treated as absent
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_value(key: &str) -> Option<String> {
    present(env::var(key).ok())
}

fn env_secs(key: &str) -> Result<Option<u64>, ConfigError> {
    env_value(key)
        .map(|v| {
            v.parse::<u64>().map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: e.to_string(),
            })
        })
        .transpose()
}
