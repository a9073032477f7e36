//! linkpack - trimmed Java runtime images for applications
//!
//! This library builds a self-contained runtime image holding only the platform
//! modules an application needs, then installs the application into it together
//! with a launcher script.
//!
//! # Core Concepts
//!
//! - **Resolution**: every archive in the libs directory is analysed with `jdeps`
//!   concurrently and the platform modules they use are merged into one set
//! - **Linking**: `jlink` builds a fresh runtime image from that set; a previous
//!   image is always removed first
//! - **Bundling**: the archives are copied into the image's `lib` directory and a
//!   launcher starting the executable archive is written to its `bin` directory
//!
//! # Example Usage
//!
//! ```no_run
//! use linkpack::{BuildConfig, PipelineContext, PipelineOrchestrator, SystemProcessRunner};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BuildConfig::builder()
//!     .java_home("/opt/jdk-21")
//!     .main_class("com.example.Main")
//!     .build()?;
//!
//! let runner = Arc::new(SystemProcessRunner::new(config.verbose));
//! let report = PipelineOrchestrator::new(PipelineContext::new(config, runner))
//!     .execute()
//!     .await?;
//!
//! println!("Linked {} module(s)", report.modules.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`process`]: external command execution and its test double
//! - [`resolver`]: platform module resolution
//! - [`linker`]: runtime image linking
//! - [`bundler`]: application bundling and launcher generation
//! - [`pipeline`]: phase orchestration and progress reporting

// Public modules
pub mod bundler;
pub mod cli;
pub mod config;
pub mod jdk;
pub mod linker;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod resolver;
pub mod util;

// Re-export key types for convenient access
pub use bundler::{AppBundler, BundleError, BundleOutcome, BundlePlan, BundleSettings};
pub use config::{BuildConfig, BuildConfigBuilder, ConfigError};
pub use jdk::JdkLayout;
pub use linker::{LinkError, RuntimeImage, RuntimeLinker};
pub use pipeline::{PipelineContext, PipelineOrchestrator, PipelineReport};
pub use process::{
    CommandSpec, MockProcessRunner, MockResponse, ProcessError, ProcessRunner, SystemProcessRunner,
};
pub use resolver::{ModuleName, ModuleResolver, ModuleSet, Resolution, ResolveError, ResolveScope};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
