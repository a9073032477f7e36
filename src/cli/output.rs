//! Output formatting for multiple formats
//!
//! Reports are rendered as JSON, YAML, or human-readable text and written to stdout by
//! the command handlers.
//!
//! # Example
//!
//! ```ignore
//! use linkpack::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_report(&report)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use std::fmt::Write as _;

use crate::config::BuildConfig;
use crate::pipeline::PipelineReport;
use crate::resolver::Resolution;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for command results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the report of a `link` run
    pub fn format_report(&self, report: &PipelineReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    /// Formats the module set of a `deps` run
    pub fn format_modules(&self, resolution: &Resolution) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(resolution)
                .context("Failed to serialize modules to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(resolution).context("Failed to serialize modules to YAML")
            }
            OutputFormat::Human => Ok(resolution
                .modules
                .names()
                .map(|name| format!("{}\n", name))
                .collect()),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &BuildConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_report_human(&self, report: &PipelineReport) -> String {
        let mut out = String::new();

        if let Some(ref reason) = report.skip_reason {
            let _ = writeln!(out, "Skipped linking: {}", reason);
            let _ = writeln!(out, "Archives analysed: {}", report.archives.len());
            return out;
        }

        let _ = writeln!(out, "Modules ({}): {}", report.modules.len(), report.modules.join(", "));
        if let Some(ref dir) = report.runtime_dir {
            let _ = writeln!(out, "Runtime image: {}", dir.display());
        }
        if let Some(ref archive) = report.executable_archive {
            let _ = writeln!(out, "Executable jar: {}", archive);
        }
        if let Some(ref classpath) = report.classpath {
            if !classpath.is_empty() {
                let _ = writeln!(out, "Classpath: {}", classpath);
            }
        }
        for launcher in &report.launchers {
            let _ = writeln!(out, "Launcher: {}", launcher.display());
        }
        let _ = writeln!(out, "Completed in {} ms", report.elapsed_ms);
        out
    }
}
