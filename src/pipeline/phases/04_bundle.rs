use crate::pipeline::context::{PipelineContext, PipelineState};
use crate::pipeline::phase_trait::{PhaseFlow, PipelinePhase};
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Copies the archives into the image and writes the launcher
pub struct BundlePhase;

#[async_trait]
impl PipelinePhase for BundlePhase {
    fn name(&self) -> &'static str {
        "BundlePhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<PhaseFlow> {
        let Some(plan) = state.plan.as_ref() else {
            return Ok(PhaseFlow::Continue);
        };
        let image = state
            .image
            .as_ref()
            .context("Runtime image must be linked before bundling")?;

        let outcome = context.bundler().apply(plan, image)?;
        state.bundle = Some(outcome);
        Ok(PhaseFlow::Continue)
    }
}
