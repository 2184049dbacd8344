//! Scripted in-memory transport shared by the workflow unit tests.
use crate::transport::{
    BrandResearchInput, Operation, TransportCause, TransportError, WorkflowResponse,
    WorkflowTransport,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) fn ok_response(message: &str, data: Option<Value>) -> WorkflowResponse {
    WorkflowResponse {
        success: true,
        message: message.to_string(),
        data,
        current_node: None,
        next_nodes: None,
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn failed_response(message: &str) -> WorkflowResponse {
    WorkflowResponse {
        success: false,
        message: message.to_string(),
        data: None,
        current_node: None,
        next_nodes: None,
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn status_error(operation: Operation, status: u16) -> TransportError {
    TransportError::new(operation, TransportCause::Status(status))
}

pub(crate) fn fetched_results() -> WorkflowResponse {
    ok_response(
        "Results ready",
        Some(json!({
            "execution_id": "exec-1",
            "status": "completed",
            "research_insights": { "key_insights": ["Lead with durability"] },
        })),
    )
}

/// Every call is appended to `log` as `<operation>:<argument>`.
pub(crate) struct FakeTransport {
    pub(crate) log: Log,
    healthy: bool,
    start: Result<WorkflowResponse, TransportError>,
    nodes: HashMap<String, Result<WorkflowResponse, TransportError>>,
    results: RefCell<VecDeque<Result<WorkflowResponse, TransportError>>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            healthy: true,
            start: Ok(ok_response(
                "Workflow started",
                Some(json!({ "execution_id": "exec-1" })),
            )),
            nodes: HashMap::new(),
            results: RefCell::new(VecDeque::from([Ok(fetched_results())])),
        }
    }

    pub(crate) fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub(crate) fn with_start(mut self, start: Result<WorkflowResponse, TransportError>) -> Self {
        self.start = start;
        self
    }

    pub(crate) fn with_node(
        mut self,
        node: &str,
        outcome: Result<WorkflowResponse, TransportError>,
    ) -> Self {
        self.nodes.insert(node.to_string(), outcome);
        self
    }

    /// Results returned by successive fetches; an exhausted queue answers 500.
    pub(crate) fn with_results(
        self,
        results: Vec<Result<WorkflowResponse, TransportError>>,
    ) -> Self {
        *self.results.borrow_mut() = results.into();
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl WorkflowTransport for FakeTransport {
    fn start_workflow(
        &self,
        input: &BrandResearchInput,
    ) -> Result<WorkflowResponse, TransportError> {
        self.record(format!("start:{}", input.lp_links.len()));
        self.start.clone()
    }

    fn execute_workflow(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError> {
        self.record(format!("execute:{execution_id}"));
        Ok(ok_response("executed", None))
    }

    fn execute_single_node(
        &self,
        execution_id: &str,
        node_name: &str,
    ) -> Result<WorkflowResponse, TransportError> {
        self.record(format!("node:{node_name}"));
        if let Some(outcome) = self.nodes.get(node_name) {
            return outcome.clone();
        }
        let data = if node_name == "node_a" {
            json!({ "execution_id": execution_id, "pages_scraped": 2, "total_pages": 4 })
        } else {
            json!({ "execution_id": execution_id, "node": node_name })
        };
        Ok(ok_response(&format!("{node_name} done"), Some(data)))
    }

    fn get_workflow_state(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError> {
        self.record(format!("state:{execution_id}"));
        Ok(ok_response("state", None))
    }

    fn get_workflow_results(
        &self,
        execution_id: &str,
    ) -> Result<WorkflowResponse, TransportError> {
        self.record(format!("results:{execution_id}"));
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(status_error(Operation::Results, 500)))
    }

    fn health_check(&self) -> bool {
        self.record("health".to_string());
        self.healthy
    }
}
