use crate::config::{BuildConfigBuilder, ConfigError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Builds trimmed Java runtime images and bundles applications into them
#[derive(Parser, Debug)]
#[command(
    name = "linkpack",
    about = "Builds trimmed Java runtime images and bundles applications into them",
    version,
    author,
    long_about = "linkpack inspects the application archives in a libs directory with jdeps, \
                  links exactly the platform modules they need into a runtime image with jlink, \
                  and installs the application into that image together with a launcher script."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Verbose output, echoes every external command"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Link a runtime image and bundle the application",
        long_about = "Resolves the platform modules used by the archives in the libs directory, \
                      links them into a fresh runtime image and, when a main class is given, \
                      copies the archives into the image and writes a launcher script.\n\n\
                      Examples:\n  \
                      linkpack link --main-class com.example.Main\n  \
                      linkpack link --libs-dir build/libs --executable-jar app.jar --main-class com.example.Main\n  \
                      linkpack link --all-modules --format json"
    )]
    Link(LinkArgs),

    #[command(
        about = "Print the platform modules the application needs",
        long_about = "Runs only the dependency analysis and prints the resolved module set.\n\n\
                      Examples:\n  \
                      linkpack deps\n  \
                      linkpack deps --libs-dir build/libs --format json"
    )]
    Deps(DepsArgs),

    #[command(about = "Print the resolved configuration")]
    Config(ConfigArgs),
}

/// Options shared by every subcommand that resolves a [`crate::BuildConfig`]
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Java installation providing jdeps, jlink and java (default: LINKPACK_JAVA_HOME or JAVA_HOME)"
    )]
    pub java_home: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Installation whose jmods are linked (default: the java home)"
    )]
    pub modules_home: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Build output root (default: build)")]
    pub build_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory with the application archives (default: <build-dir>/libs)"
    )]
    pub libs_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Runtime image output directory (default: <build-dir>/app)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Archive started with -jar (required when the libs directory holds several)"
    )]
    pub executable_jar: Option<String>,

    #[arg(long, value_name = "CLASS", help = "Main class; enables bundling")]
    pub main_class: Option<String>,

    #[arg(long, value_name = "ARGS", allow_hyphen_values = true, help = "Arguments for the JVM")]
    pub jvm_args: Option<String>,

    #[arg(long, value_name = "ARGS", allow_hyphen_values = true, help = "Arguments for the application")]
    pub app_args: Option<String>,

    #[arg(long, value_name = "NAME", help = "Launcher script name (default: app)")]
    pub app_name: Option<String>,

    #[arg(long, help = "Link every platform module instead of analysing archives")]
    pub all_modules: bool,

    #[arg(long, help = "Analyse only the executable archive")]
    pub fat_jar: bool,

    #[arg(
        long = "module-path",
        value_name = "DIR",
        help = "Extra linker module-path entry (repeatable)"
    )]
    pub module_path: Vec<PathBuf>,

    #[arg(long, help = "Also write a .bat launcher")]
    pub windows_launcher: bool,

    #[arg(long, value_name = "SECONDS", help = "Per-archive analysis timeout")]
    pub analysis_timeout: Option<u64>,

    #[arg(long, value_name = "SECONDS", help = "Linker timeout")]
    pub link_timeout: Option<u64>,
}

impl BuildArgs {
    /// Layers these options over the environment defaults
    pub fn to_builder(&self, verbose: bool) -> Result<BuildConfigBuilder, ConfigError> {
        let mut builder = BuildConfigBuilder::from_env()?
            .all_modules(self.all_modules)
            .fat_jar(self.fat_jar)
            .windows_launcher(self.windows_launcher)
            .verbose(verbose);

        if let Some(ref path) = self.java_home {
            builder = builder.java_home(path);
        }
        if let Some(ref path) = self.modules_home {
            builder = builder.modules_home(path);
        }
        if let Some(ref path) = self.build_dir {
            builder = builder.build_dir(path);
        }
        if let Some(ref path) = self.libs_dir {
            builder = builder.libs_dir(path);
        }
        if let Some(ref path) = self.output_dir {
            builder = builder.output_dir(path);
        }
        if let Some(ref name) = self.executable_jar {
            builder = builder.executable_jar(name);
        }
        if let Some(ref class) = self.main_class {
            builder = builder.main_class(class);
        }
        if let Some(ref args) = self.jvm_args {
            builder = builder.jvm_args(args);
        }
        if let Some(ref args) = self.app_args {
            builder = builder.app_args(args);
        }
        if let Some(ref name) = self.app_name {
            builder = builder.app_name(name);
        }
        for path in &self.module_path {
            builder = builder.module_path_entry(path);
        }
        if let Some(secs) = self.analysis_timeout {
            builder = builder.analysis_timeout_secs(secs);
        }
        if let Some(secs) = self.link_timeout {
            builder = builder.link_timeout_secs(secs);
        }

        Ok(builder)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct LinkArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DepsArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
