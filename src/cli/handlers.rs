//! Subcommand handlers
//!
//! Each handler returns the process exit code; only `main` terminates the process.

use super::commands::{BuildArgs, ConfigArgs, DepsArgs, LinkArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::BuildConfig;
use crate::pipeline::{PipelineContext, PipelineOrchestrator};
use crate::process::SystemProcessRunner;
use crate::progress::LoggingHandler;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

fn resolve_config(args: &BuildArgs, verbose: bool) -> Result<BuildConfig> {
    let config = args
        .to_builder(verbose)?
        .build()
        .context("Invalid configuration")?;
    debug!("Resolved configuration:\n{}", config);
    Ok(config)
}

fn orchestrator(config: BuildConfig) -> PipelineOrchestrator {
    let runner = Arc::new(SystemProcessRunner::new(config.verbose));
    let context = PipelineContext::new(config, runner).with_progress(Arc::new(LoggingHandler));
    PipelineOrchestrator::new(context)
}

fn emit(output: Result<String>, format: OutputFormat, quiet: bool) -> i32 {
    match output {
        Ok(text) => {
            if !(quiet && format == OutputFormat::Human) {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            EXIT_SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(e: anyhow::Error) -> i32 {
    eprintln!("Error: {:#}", e);
    EXIT_FAILURE
}

pub async fn handle_link(args: &LinkArgs, quiet: bool, verbose: bool) -> i32 {
    let format = OutputFormat::from(args.format);
    let config = match resolve_config(&args.build, verbose) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    let report = match orchestrator(config).execute().await {
        Ok(report) => report,
        Err(e) => return fail(e),
    };

    emit(OutputFormatter::new(format).format_report(&report), format, quiet)
}

pub async fn handle_deps(args: &DepsArgs, quiet: bool, verbose: bool) -> i32 {
    let format = OutputFormat::from(args.format);
    let config = match resolve_config(&args.build, verbose) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    let resolution = match orchestrator(config).resolve_only().await {
        Ok(resolution) => resolution,
        Err(e) => return fail(e),
    };

    emit(OutputFormatter::new(format).format_modules(&resolution), format, quiet)
}

pub fn handle_config(args: &ConfigArgs, verbose: bool) -> i32 {
    let format = OutputFormat::from(args.format);
    let config = match resolve_config(&args.build, verbose) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    emit(OutputFormatter::new(format).format_config(&config), format, false)
}
