use crate::pipeline::context::{PipelineContext, PipelineState};
use crate::pipeline::phase_trait::{PhaseFlow, PipelinePhase};
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Determines the platform modules the runtime image must contain
pub struct ResolvePhase;

#[async_trait]
impl PipelinePhase for ResolvePhase {
    fn name(&self) -> &'static str {
        "ResolvePhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<PhaseFlow> {
        let resolution = context.resolver().resolve(&context.resolve_scope()).await?;
        let empty = resolution.modules.is_empty();

        info!(
            "Resolved {} platform module(s) from {} archive(s)",
            resolution.modules.len(),
            resolution.archives.len()
        );
        state.resolution = Some(resolution);

        if empty {
            return Ok(PhaseFlow::Stop("no platform modules required".to_string()));
        }
        Ok(PhaseFlow::Continue)
    }
}
