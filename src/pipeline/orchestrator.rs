use super::context::{PipelineContext, PipelineState};
use super::phase_trait::{PhaseFlow, PipelinePhase};
use super::phases::{BundlePhase, LinkPhase, PreparePhase, ResolvePhase};
use super::report::PipelineReport;
use crate::progress::ProgressEvent;
use crate::resolver::Resolution;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Runs resolve, prepare, link and bundle in order, stopping at the first failure
pub struct PipelineOrchestrator {
    context: PipelineContext,
}

impl PipelineOrchestrator {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    fn phases() -> Vec<Box<dyn PipelinePhase>> {
        vec![
            Box::new(ResolvePhase),
            Box::new(PreparePhase),
            Box::new(LinkPhase),
            Box::new(BundlePhase),
        ]
    }

    pub async fn execute(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        let libs_dir = self.context.config.libs_dir.display().to_string();
        info!("Starting pipeline for: {}", libs_dir);
        self.context
            .progress
            .on_progress(&ProgressEvent::Started { libs_dir });

        let mut state = PipelineState::default();
        if let Err(e) = self.run_phases(&mut state).await {
            self.context.progress.on_progress(&ProgressEvent::Failed {
                error: format!("{:#}", e),
            });
            return Err(e);
        }

        self.context.progress.on_progress(&ProgressEvent::Completed {
            total_time: start.elapsed(),
        });
        Ok(PipelineReport::from_state(state, start.elapsed()))
    }

    async fn run_phases(&self, state: &mut PipelineState) -> Result<()> {
        for phase in Self::phases() {
            let phase_name = phase.name();
            info!("Phase: {}", phase_name);
            self.context.progress.on_progress(&ProgressEvent::PhaseStarted {
                phase: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            let flow = phase
                .execute(&self.context, state)
                .await
                .with_context(|| format!("Phase {} failed", phase_name))?;

            self.context.progress.on_progress(&ProgressEvent::PhaseComplete {
                phase: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });
            debug!("Phase {} complete", phase_name);

            if let PhaseFlow::Stop(reason) = flow {
                info!("Skipping remaining phases: {}", reason);
                self.context
                    .progress
                    .on_progress(&ProgressEvent::Skipped { reason: reason.clone() });
                state.skipped = Some(reason);
                break;
            }
        }
        Ok(())
    }

    /// Resolves the module set without linking anything
    pub async fn resolve_only(&self) -> Result<Resolution> {
        let mut state = PipelineState::default();
        let phase = ResolvePhase;
        phase
            .execute(&self.context, &mut state)
            .await
            .with_context(|| format!("Phase {} failed", phase.name()))?;
        state
            .resolution
            .context("Resolution produced no result")
    }
}
