use crate::pipeline::context::{PipelineContext, PipelineState};
use crate::pipeline::phase_trait::{PhaseFlow, PipelinePhase};
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Links the resolved modules into a fresh runtime image
pub struct LinkPhase;

#[async_trait]
impl PipelinePhase for LinkPhase {
    fn name(&self) -> &'static str {
        "LinkPhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<PhaseFlow> {
        let resolution = state
            .resolution
            .as_ref()
            .context("Modules must be resolved before linking")?;

        let image = context
            .linker()
            .link(&resolution.modules, &context.config.output_dir)
            .await?;
        state.image = Some(image);
        Ok(PhaseFlow::Continue)
    }
}
