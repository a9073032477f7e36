pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildArgs, CliArgs, Commands, ConfigArgs, DepsArgs, LinkArgs};
pub use output::{OutputFormat, OutputFormatter};
