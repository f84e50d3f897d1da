//! Pipeline execution boundary.
//!
//! The upgrade engine has no dependency on this module; it is the lifecycle
//! contract the surrounding runtime exposes. A pipeline goes through
//! `init`/`run`/`destroy`, with `destroy` guaranteed on every exit path once
//! `init` succeeded, and its runner answers control-plane queries (stop,
//! committed offsets, snapshots, recent error records).

mod offset;
mod production;

pub use offset::SourceOffsetTracker;
pub use production::ProductionPipeline;

use crate::Result;

/// One error record captured while a stage processed a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    /// Stage instance that produced the record.
    pub instance: String,
    pub message: String,
}

/// The three-phase lifecycle every runnable pipeline implements.
pub trait PipelineLifecycle {
    fn init(&mut self) -> Result<()>;
    fn run(&mut self) -> Result<()>;
    fn destroy(&mut self) -> Result<()>;
}

/// Control-plane surface of a running pipeline.
pub trait PipelineRunner: Send + Sync {
    /// Request a stop; `run` is expected to return shortly after.
    fn stop(&self);

    fn was_stopped(&self) -> bool;

    fn committed_offset(&self) -> Option<String>;

    /// Override the source offset and commit it immediately, repositioning
    /// the source for the next run.
    fn override_offset(&self, offset: Option<String>);

    /// Milliseconds since the epoch of the last committed batch; 0 when no
    /// batch has committed yet.
    fn last_batch_time(&self) -> u64;

    /// Capture the next batch under `name`, at most `batch_size` records.
    fn capture_snapshot(&self, name: &str, batch_size: usize);

    /// Up to `max` most recent error records for one stage instance.
    fn error_records(&self, instance: &str, max: usize) -> Vec<ErrorRecord>;

    /// Up to `max` most recent error messages for one stage instance.
    fn error_messages(&self, instance: &str, max: usize) -> Vec<String>;
}
