//! The resolve, link and bundle pipeline

pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;
pub mod report;

pub use context::{PipelineContext, PipelineState};
pub use orchestrator::PipelineOrchestrator;
pub use phase_trait::{PhaseFlow, PipelinePhase};
pub use report::PipelineReport;
