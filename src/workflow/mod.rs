//! Workflow orchestration for the brand research pipeline.
//!
//! `stages` fixes the pipeline, `progress` normalizes per-stage responses,
//! `driver` walks one execution, and `session` wraps the health gate and
//! start call around it.
mod driver;
mod progress;
mod session;
mod stages;

#[cfg(test)]
mod fake;

pub use driver::{
    monitor_workflow_progress, synthetic_completion, Callbacks, DriverSettings,
    ProgressObserver, ProgressionDriver, StepOutcome,
};
pub use progress::{
    progress_percentage, ProgressDetails, ProgressStatus, WorkflowProgress, STARTING_NODE,
};
pub use session::{run_brand_research, start_research};
pub use stages::{stage_status, Stage, StageStatus, STAGE_SEQUENCE};
