//! Normalized progress records built from per-stage responses.
use super::stages::{Stage, STAGE_SEQUENCE};
use crate::transport::WorkflowResponse;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const STARTING_NODE: &str = "starting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_scraped: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Snapshot emitted after every stage. Only the latest one matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub execution_id: String,
    pub current_node: String,
    pub status: ProgressStatus,
    pub progress_percentage: u8,
    pub details: ProgressDetails,
}

impl WorkflowProgress {
    /// Placeholder shown between start and the first stage report.
    pub fn starting(execution_id: &str) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            current_node: STARTING_NODE.to_string(),
            status: ProgressStatus::Running,
            progress_percentage: 0,
            details: ProgressDetails {
                pages_scraped: Some(0),
                total_pages: Some(0),
                current_operation: Some("Initializing workflow...".to_string()),
                extracted_data: Some(json!({})),
                errors: Some(Vec::new()),
            },
        }
    }

    /// Record for a stage whose response reported success.
    pub fn for_stage(execution_id: &str, stage: Stage, response: &WorkflowResponse) -> Self {
        let data = response.data.as_ref();
        let (pages_scraped, total_pages) = match stage {
            Stage::EvidenceExtraction => (
                data_count(data, "pages_scraped"),
                data_count(data, "total_pages"),
            ),
            _ => (0, 0),
        };
        Self {
            execution_id: execution_id.to_string(),
            current_node: stage.id().to_string(),
            status: ProgressStatus::Running,
            progress_percentage: progress_percentage(stage.position()),
            details: ProgressDetails {
                pages_scraped: Some(pages_scraped),
                total_pages: Some(total_pages),
                current_operation: Some(stage.operation().to_string()),
                extracted_data: response.data.clone(),
                errors: Some(data_errors(data)),
            },
        }
    }
}

/// `round(100 * (index + 1) / stage count)`, capped at 100.
pub fn progress_percentage(index: usize) -> u8 {
    let total = STAGE_SEQUENCE.len() as f64;
    let done = (index + 1) as f64;
    (100.0 * done / total).round().min(100.0) as u8
}

/// Non-negative whole number at `key`; JSON floats such as `3.0` count too.
fn data_count(data: Option<&Value>, key: &str) -> u64 {
    data.and_then(|data| data.get(key))
        .and_then(|value| value.as_u64().or_else(|| whole_number(value.as_f64()?)))
        .unwrap_or(0)
}

fn whole_number(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract().abs() < f64::EPSILON)
        .then_some(value as u64)
}

fn data_errors(data: Option<&Value>) -> Vec<String> {
    data.and_then(|data| data.get("errors"))
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
