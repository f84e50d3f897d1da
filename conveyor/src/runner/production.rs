use super::{ErrorRecord, PipelineLifecycle, PipelineRunner};
use crate::Result;
use std::sync::Arc;

/// Runs one pipeline through its full lifecycle and fronts its runner's
/// control surface.
pub struct ProductionPipeline<P: PipelineLifecycle> {
    pipeline: P,
    runner: Arc<dyn PipelineRunner>,
}

impl<P: PipelineLifecycle> ProductionPipeline<P> {
    pub fn new(pipeline: P, runner: Arc<dyn PipelineRunner>) -> Self {
        Self { pipeline, runner }
    }

    /// Execute init/run/destroy. Once `init` succeeds, `destroy` runs no
    /// matter how `run` exits; a failure in `run` takes precedence over a
    /// failure in `destroy` when both occur.
    pub fn run(&mut self) -> Result<()> {
        self.pipeline.init()?;
        let run_result = self.pipeline.run();
        let destroy_result = self.pipeline.destroy();
        if let Err(e) = &destroy_result {
            tracing::warn!(error = %e, "pipeline destroy failed");
        }
        run_result.and(destroy_result)
    }

    pub fn stop(&self) {
        self.runner.stop();
    }

    pub fn was_stopped(&self) -> bool {
        self.runner.was_stopped()
    }

    pub fn committed_offset(&self) -> Option<String> {
        self.runner.committed_offset()
    }

    /// Reposition the source: the override is committed immediately so it
    /// survives a restart.
    pub fn override_offset(&self, offset: Option<String>) {
        self.runner.override_offset(offset);
    }

    pub fn last_batch_time(&self) -> u64 {
        self.runner.last_batch_time()
    }

    pub fn capture_snapshot(&self, name: &str, batch_size: usize) {
        self.runner.capture_snapshot(name, batch_size);
    }

    pub fn error_records(&self, instance: &str, max: usize) -> Vec<ErrorRecord> {
        self.runner.error_records(instance, max)
    }

    pub fn error_messages(&self, instance: &str, max: usize) -> Vec<String> {
        self.runner.error_messages(instance, max)
    }
}
