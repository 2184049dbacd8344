//! ureq-backed client for the workflow service HTTP API.
use super::{
    BrandResearchInput, Operation, TransportCause, TransportError, WorkflowResponse,
    WorkflowTransport,
};
use std::time::Instant;
use ureq::http::Response;
use ureq::{Agent, Body};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Stateless HTTP transport; cloning shares the underlying agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    agent: Agent,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        // Non-2xx statuses are mapped by `decode`, not by ureq.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn workflow_url(&self, execution_id: &str, suffix: &str) -> String {
        self.url(&format!("/api/v1/workflow/{execution_id}/{suffix}"))
    }

    fn post_empty(
        &self,
        operation: Operation,
        url: &str,
    ) -> Result<WorkflowResponse, TransportError> {
        let started = Instant::now();
        let result = self
            .agent
            .post(url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .send_empty();
        decode(operation, started, result)
    }

    fn get(&self, operation: Operation, url: &str) -> Result<WorkflowResponse, TransportError> {
        let started = Instant::now();
        let result = self
            .agent
            .get(url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .call();
        decode(operation, started, result)
    }
}

fn decode(
    operation: Operation,
    started: Instant,
    result: Result<Response<Body>, ureq::Error>,
) -> Result<WorkflowResponse, TransportError> {
    let mut response = result.map_err(|err| {
        TransportError::new(operation.clone(), TransportCause::Network(err.to_string()))
    })?;
    let status = response.status();
    tracing::debug!(
        operation = %operation,
        status = status.as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "workflow request complete"
    );
    if !status.is_success() {
        return Err(TransportError::new(
            operation,
            TransportCause::Status(status.as_u16()),
        ));
    }
    // Results payloads can exceed ureq's default body limit.
    response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_json::<WorkflowResponse>()
        .map_err(|err| TransportError::new(operation, TransportCause::Decode(err.to_string())))
}

impl WorkflowTransport for HttpTransport {
    fn start_workflow(
        &self,
        input: &BrandResearchInput,
    ) -> Result<WorkflowResponse, TransportError> {
        let started = Instant::now();
        let result = self
            .agent
            .post(self.url("/api/v1/workflow/start"))
            .header("Content-Type", JSON_CONTENT_TYPE)
            .send_json(input);
        decode(Operation::Start, started, result)
    }

    fn execute_workflow(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError> {
        let url = self.workflow_url(execution_id, "execute");
        self.post_empty(Operation::Execute, &url)
    }

    fn execute_single_node(
        &self,
        execution_id: &str,
        node_name: &str,
    ) -> Result<WorkflowResponse, TransportError> {
        let url = self.workflow_url(execution_id, &format!("node/{node_name}"));
        self.post_empty(Operation::ExecuteNode(node_name.to_string()), &url)
    }

    fn get_workflow_state(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError> {
        let url = self.workflow_url(execution_id, "state");
        self.get(Operation::State, &url)
    }

    fn get_workflow_results(
        &self,
        execution_id: &str,
    ) -> Result<WorkflowResponse, TransportError> {
        let url = self.workflow_url(execution_id, "results");
        self.get(Operation::Results, &url)
    }

    fn health_check(&self) -> bool {
        match self.agent.get(self.url("/health")).call() {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(base_url = %self.base_url, error = %err, "health check failed");
                false
            }
        }
    }
}
