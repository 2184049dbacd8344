//! Caller side of a research run: health gate, start, then hand-off to the
//! driver.
use super::driver::{DriverSettings, ProgressObserver, ProgressionDriver};
use super::progress::WorkflowProgress;
use crate::error::ResearchError;
use crate::transport::{BrandResearchInput, WorkflowResponse, WorkflowTransport};

/// Start a new execution after a one-time health probe.
///
/// Returns the start response together with its execution id. A response
/// with `success: false` is a fatal setup error: nothing further may run.
pub fn start_research<T: WorkflowTransport + ?Sized>(
    transport: &T,
    input: &BrandResearchInput,
) -> Result<(String, WorkflowResponse), ResearchError> {
    if !transport.health_check() {
        return Err(ResearchError::ServiceUnavailable);
    }
    let response = transport.start_workflow(input)?;
    if !response.success {
        return Err(ResearchError::StartRejected {
            message: response.message,
        });
    }
    let execution_id = response
        .execution_id()
        .ok_or(ResearchError::MissingExecutionId)?
        .to_string();
    tracing::info!(execution_id = %execution_id, "brand research workflow started");
    Ok((execution_id, response))
}

/// Start a run and drive it to its terminal notification.
///
/// Setup failures are returned directly and no observer callback fires.
/// Once the run is started `observer` first sees the starting record, then
/// every outcome, and the execution id is returned after the terminal
/// callback.
pub fn run_brand_research<T, O>(
    transport: &T,
    input: &BrandResearchInput,
    settings: DriverSettings,
    observer: &mut O,
) -> Result<String, ResearchError>
where
    T: WorkflowTransport + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let (execution_id, _) = start_research(transport, input)?;
    observer.on_started(&WorkflowProgress::starting(&execution_id));
    ProgressionDriver::new(transport, &execution_id, settings).run(observer);
    Ok(execution_id)
}
