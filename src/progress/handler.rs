//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started for the given library directory
    Started { libs_dir: String },

    /// A pipeline phase is about to run
    PhaseStarted { phase: String },

    /// Dependency analysis of one archive finished
    ArchiveAnalyzed {
        archive: String,
        modules: usize,
        duration: Duration,
    },

    /// All archives analysed and their modules merged
    ModulesResolved { modules: usize, archives: usize },

    /// A pipeline phase finished
    PhaseComplete { phase: String, duration: Duration },

    /// Remaining phases were skipped
    Skipped { reason: String },

    /// Pipeline finished successfully
    Completed { total_time: Duration },

    /// Pipeline aborted
    Failed { error: String },
}

/// Receives progress events during a pipeline run
///
/// Events for concurrent archive analyses may arrive from several tasks at once.
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
