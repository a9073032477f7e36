//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { libs_dir } => {
                info!(libs = %libs_dir, "Starting runtime link");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Phase started");
            }
            ProgressEvent::ArchiveAnalyzed {
                archive,
                modules,
                duration,
            } => {
                debug!(
                    archive = %archive,
                    modules,
                    duration_ms = duration.as_millis(),
                    "Archive analyzed"
                );
            }
            ProgressEvent::ModulesResolved { modules, archives } => {
                info!(modules, archives, "Platform modules resolved");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                debug!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::Skipped { reason } => {
                info!(reason = %reason, "Skipping link and bundle");
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Runtime link complete");
            }
            ProgressEvent::Failed { error } => {
                error!(error = %error, "Runtime link failed");
            }
        }
    }
}
