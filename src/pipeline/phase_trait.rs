use super::context::{PipelineContext, PipelineState};
use anyhow::Result;
use async_trait::async_trait;

/// Whether the pipeline goes on after a phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseFlow {
    Continue,
    /// Skip every remaining phase; the run still succeeds
    Stop(String),
}

#[async_trait]
pub trait PipelinePhase: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<PhaseFlow>;
}
