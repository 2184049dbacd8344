//! Stepwise driver that walks one execution through the stage sequence.
//!
//! The driver is an explicit state object (`execution_id`, `stage_index`)
//! advanced by [`ProgressionDriver::step`]. [`ProgressionDriver::run`] adds
//! the pacing delays and dispatches each outcome to a [`ProgressObserver`].
//! Exactly one terminal outcome is produced per run; after it the driver
//! makes no further remote calls.
use super::progress::WorkflowProgress;
use super::stages::STAGE_SEQUENCE;
use crate::error::ResearchError;
use crate::transport::{TransportError, WorkflowResponse, WorkflowTransport};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_STAGE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_RESULTS_RETRIES: u32 = 1;

/// Timing and retry knobs for a run.
///
/// The delays only pace the run for a human watching it; zero is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Pause after each stage report before the next remote call.
    pub stage_delay: Duration,
    /// Pause after the last stage so the service can finalize its state.
    pub settle_delay: Duration,
    /// Extra attempts at the results fetch before falling back.
    pub results_retries: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            stage_delay: DEFAULT_STAGE_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
            results_retries: DEFAULT_RESULTS_RETRIES,
        }
    }
}

/// Receives the notifications of one run.
pub trait ProgressObserver {
    /// Placeholder record for a run that has started but reported no stage
    /// yet. Not every caller shows it.
    fn on_started(&mut self, _progress: &WorkflowProgress) {}

    fn on_progress(&mut self, progress: &WorkflowProgress);
    fn on_complete(&mut self, results: WorkflowResponse);
    fn on_error(&mut self, error: ResearchError);
}

/// Adapter for the three-closure callback form.
pub struct Callbacks<P, C, E> {
    pub on_progress: P,
    pub on_complete: C,
    pub on_error: E,
}

impl<P, C, E> ProgressObserver for Callbacks<P, C, E>
where
    P: FnMut(&WorkflowProgress),
    C: FnMut(WorkflowResponse),
    E: FnMut(ResearchError),
{
    fn on_progress(&mut self, progress: &WorkflowProgress) {
        (self.on_progress)(progress);
    }

    fn on_complete(&mut self, results: WorkflowResponse) {
        (self.on_complete)(results);
    }

    fn on_error(&mut self, error: ResearchError) {
        (self.on_error)(error);
    }
}

/// Result of advancing the driver by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Progress(WorkflowProgress),
    Completed(WorkflowResponse),
    Failed(ResearchError),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepOutcome::Progress(_))
    }
}

pub struct ProgressionDriver<'t, T: ?Sized> {
    transport: &'t T,
    execution_id: String,
    stage_index: usize,
    settings: DriverSettings,
    finished: bool,
}

impl<'t, T: WorkflowTransport + ?Sized> ProgressionDriver<'t, T> {
    pub fn new(transport: &'t T, execution_id: &str, settings: DriverSettings) -> Self {
        Self {
            transport,
            execution_id: execution_id.to_string(),
            stage_index: 0,
            settings,
            finished: false,
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True once every stage has reported success.
    pub fn stages_exhausted(&self) -> bool {
        self.stage_index >= STAGE_SEQUENCE.len()
    }

    /// Advance by one remote step. Returns `None` once a terminal outcome
    /// has been produced.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.finished {
            return None;
        }
        let Some(stage) = STAGE_SEQUENCE.get(self.stage_index).copied() else {
            self.finished = true;
            return Some(StepOutcome::Completed(self.fetch_results()));
        };

        tracing::info!(
            execution_id = %self.execution_id,
            stage = stage.id(),
            "executing stage"
        );
        let response = match self
            .transport
            .execute_single_node(&self.execution_id, stage.id())
        {
            Ok(response) => response,
            Err(err) => {
                self.finished = true;
                return Some(StepOutcome::Failed(err.into()));
            }
        };
        if !response.success {
            self.finished = true;
            return Some(StepOutcome::Failed(ResearchError::StageFailed {
                stage: stage.id().to_string(),
                message: response.message,
            }));
        }

        let progress = WorkflowProgress::for_stage(&self.execution_id, stage, &response);
        self.stage_index += 1;
        Some(StepOutcome::Progress(progress))
    }

    /// Drive the run to its terminal outcome, pacing between steps.
    pub fn run<O: ProgressObserver + ?Sized>(mut self, observer: &mut O) {
        loop {
            if self.stages_exhausted() && !self.finished {
                pause(self.settings.settle_delay);
            }
            let Some(outcome) = self.step() else {
                return;
            };
            match outcome {
                StepOutcome::Progress(progress) => {
                    observer.on_progress(&progress);
                    pause(self.settings.stage_delay);
                }
                StepOutcome::Completed(results) => {
                    observer.on_complete(results);
                    return;
                }
                StepOutcome::Failed(error) => {
                    tracing::error!(
                        execution_id = %self.execution_id,
                        error = %error,
                        "workflow run failed"
                    );
                    observer.on_error(error);
                    return;
                }
            }
        }
    }

    fn fetch_results(&self) -> WorkflowResponse {
        let attempts = self.settings.results_retries.saturating_add(1);
        let mut last_error: Option<TransportError> = None;
        for attempt in 1..=attempts {
            if attempt > 1 {
                pause(self.settings.stage_delay);
            }
            match self.transport.get_workflow_results(&self.execution_id) {
                Ok(results) => return results,
                Err(err) => {
                    tracing::debug!(attempt, attempts, error = %err, "results fetch failed");
                    last_error = Some(err);
                }
            }
        }
        if let Some(err) = last_error {
            tracing::warn!(
                execution_id = %self.execution_id,
                error = %err,
                "results unavailable after all stages succeeded; reporting synthetic completion"
            );
        }
        synthetic_completion(&self.execution_id)
    }
}

/// Completion reported when every stage succeeded but the results fetch
/// did not.
pub fn synthetic_completion(execution_id: &str) -> WorkflowResponse {
    WorkflowResponse {
        success: true,
        message: "Workflow completed successfully".to_string(),
        data: Some(json!({
            "execution_id": execution_id,
            "status": "completed",
            "message": "All workflow nodes executed successfully",
        })),
        current_node: None,
        next_nodes: None,
        extra: serde_json::Map::new(),
    }
}

/// Run an already started execution to completion with plain callbacks.
pub fn monitor_workflow_progress<T, P, C, E>(
    transport: &T,
    execution_id: &str,
    settings: DriverSettings,
    on_progress: P,
    on_complete: C,
    on_error: E,
) where
    T: WorkflowTransport + ?Sized,
    P: FnMut(&WorkflowProgress),
    C: FnMut(WorkflowResponse),
    E: FnMut(ResearchError),
{
    let mut callbacks = Callbacks {
        on_progress,
        on_complete,
        on_error,
    };
    ProgressionDriver::new(transport, execution_id, settings).run(&mut callbacks);
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
