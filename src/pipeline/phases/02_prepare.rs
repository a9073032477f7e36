use crate::pipeline::context::{PipelineContext, PipelineState};
use crate::pipeline::phase_trait::{PhaseFlow, PipelinePhase};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Checks the bundling inputs while the output directory is still untouched
///
/// Without a main class there is nothing to bundle and the phase does nothing.
pub struct PreparePhase;

#[async_trait]
impl PipelinePhase for PreparePhase {
    fn name(&self) -> &'static str {
        "PreparePhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<PhaseFlow> {
        if !context.config.bundles_application() {
            debug!("No main class configured, application will not be bundled");
            return Ok(PhaseFlow::Continue);
        }

        let plan = context.bundler().prepare(&context.config.libs_dir)?;
        state.plan = Some(plan);
        Ok(PhaseFlow::Continue)
    }
}
