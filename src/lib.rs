pub mod buffer;
pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod reporting;

pub use buffer::{BoundedBuffer, PutError, TakeError};
pub use config::{DefaultPipelineConfig, PipelineConfig};
pub use pipeline::{run_pipeline, run_pipeline_quiet, Coordinator};
pub use reporting::{ConsoleProgressReporter, NoOpProgressReporter, ProgressReporter};
pub use self::core::{PipelineError, PipelineResult, RunOutcome, RunState, RunSummary};
