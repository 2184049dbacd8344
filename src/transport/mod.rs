//! Wire types and the transport seam for the brand research workflow service.
//!
//! A transport makes one call per remote operation with no retries and no
//! timeouts. Everything that decides what to call next lives in
//! `workflow`.
mod http;

pub use http::HttpTransport;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Landing page the research service should scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPageLink {
    pub url: String,
}

/// Social account the research service should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub handle_or_url: String,
}

/// Body of the start request. Sent once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandResearchInput {
    pub brand_brief: Value,
    #[serde(default)]
    pub lp_links: Vec<LandingPageLink>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

/// Envelope returned by every workflow endpoint.
///
/// `success == false` is a stage-level failure reported by the service, not
/// a transport failure. Fields the client does not model are kept in
/// `extra`, and an explicit `"data": null` stays `Some(Value::Null)`, so a
/// decoded response serializes back to the body the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_nodes: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field that is present decodes to `Some`, even when it is `null`.
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl WorkflowResponse {
    /// Execution id carried in `data.execution_id`, as returned by start.
    pub fn execution_id(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("execution_id")?
            .as_str()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Remote operation a transport error happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Start,
    Execute,
    ExecuteNode(String),
    State,
    Results,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Start => f.write_str("start brand research workflow"),
            Operation::Execute => f.write_str("execute workflow"),
            Operation::ExecuteNode(node) => write!(f, "execute node {node}"),
            Operation::State => f.write_str("get workflow state"),
            Operation::Results => f.write_str("get workflow results"),
        }
    }
}

/// Why a remote call did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportCause {
    #[error("HTTP error status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A failed remote call, named by the operation it was part of.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to {operation}: {cause}")]
pub struct TransportError {
    pub operation: Operation,
    pub cause: TransportCause,
}

impl TransportError {
    pub fn new(operation: Operation, cause: TransportCause) -> Self {
        Self { operation, cause }
    }
}

/// One method per remote operation of the workflow service.
///
/// Implementations must be reentrant: concurrent runs for different
/// execution ids share one transport.
pub trait WorkflowTransport {
    fn start_workflow(&self, input: &BrandResearchInput)
        -> Result<WorkflowResponse, TransportError>;

    fn execute_workflow(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError>;

    fn execute_single_node(
        &self,
        execution_id: &str,
        node_name: &str,
    ) -> Result<WorkflowResponse, TransportError>;

    fn get_workflow_state(&self, execution_id: &str) -> Result<WorkflowResponse, TransportError>;

    fn get_workflow_results(&self, execution_id: &str)
        -> Result<WorkflowResponse, TransportError>;

    /// Liveness probe. Never fails: any error means `false`.
    fn health_check(&self) -> bool;
}
