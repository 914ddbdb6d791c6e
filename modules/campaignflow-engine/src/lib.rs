pub mod fallback;
pub mod handoff;
pub mod pipeline;
pub mod scheduler;
pub mod stages;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use pipeline::{Pipeline, PipelineOutcome};
