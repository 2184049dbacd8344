//! Text rendering of progress updates and final research results.
use crate::transport::WorkflowResponse;
use crate::util::truncate_string;
use crate::workflow::{
    stage_status, Stage, StageStatus, WorkflowProgress, STAGE_SEQUENCE, STARTING_NODE,
};
use serde::Serialize;
use serde_json::Value;

const PREVIEW_LIMIT: usize = 5;
const FIELD_MAX_BYTES: usize = 400;

/// One line per update, plus indented lines for any reported errors.
pub fn format_progress(progress: &WorkflowProgress) -> String {
    let title = match Stage::from_id(&progress.current_node) {
        Some(stage) => stage.title(),
        None if progress.current_node == STARTING_NODE => "Starting",
        None => progress.current_node.as_str(),
    };
    let details = &progress.details;
    let mut line = format!("[{:>3}%] {title}", progress.progress_percentage);
    if let Some(operation) = &details.current_operation {
        line.push_str(&format!(": {operation}"));
    }
    if let (Some(scraped), Some(total)) = (details.pages_scraped, details.total_pages) {
        if total > 0 {
            line.push_str(&format!(" ({scraped}/{total} pages)"));
        }
    }
    for error in details.errors.iter().flatten() {
        line.push_str(&format!("\n       ! {error}"));
    }
    line
}

/// One marker per stage: `[x]` completed, `[>]` current, `[ ]` pending.
pub fn format_stage_board(current_node: &str) -> String {
    let marks: Vec<String> = STAGE_SEQUENCE
        .iter()
        .map(|stage| {
            let mark = match stage_status(current_node, *stage) {
                StageStatus::Completed => 'x',
                StageStatus::Current => '>',
                StageStatus::Pending => ' ',
            };
            format!("[{mark}] {}", stage.id())
        })
        .collect();
    format!("       {}", marks.join(" "))
}

/// The parts of a results payload worth showing to a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchSummary {
    pub execution_id: Option<String>,
    pub status: String,
    pub message: String,
    pub tone_adjectives: Vec<String>,
    pub audience_insights: Vec<String>,
    pub competitors: Vec<String>,
    pub key_insights: Vec<String>,
    pub positioning_statement: Option<String>,
    pub messaging_framework: Option<String>,
    pub hooks: Vec<String>,
    pub ctas: Vec<String>,
}

impl ResearchSummary {
    pub fn from_response(response: &WorkflowResponse) -> Self {
        let data = response.data.as_ref().unwrap_or(&Value::Null);
        let evidence = &data["extracted_evidence"];
        let insights = &data["research_insights"];
        let refined = &data["refined_insights"];
        Self {
            execution_id: data["execution_id"].as_str().map(str::to_string),
            status: data["status"].as_str().unwrap_or("completed").to_string(),
            message: response.message.clone(),
            tone_adjectives: text_list(&evidence["tone_adjectives"], usize::MAX),
            audience_insights: text_list(&evidence["audience_insights"], PREVIEW_LIMIT),
            competitors: competitor_names(&data["competitors"]),
            key_insights: text_list(&insights["key_insights"], usize::MAX),
            positioning_statement: text(&insights["positioning_statement"]),
            messaging_framework: text(&refined["messaging_framework_smp_text"]),
            hooks: text_list(&refined["hook_bank"], PREVIEW_LIMIT),
            ctas: text_list(&refined["cta_set"], usize::MAX),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Execution: {}\nStatus: {}\n",
            self.execution_id.as_deref().unwrap_or("N/A"),
            self.status
        ));
        if !self.message.is_empty() {
            out.push_str(&format!("{}\n", self.message));
        }
        push_list(&mut out, "Tone", &self.tone_adjectives);
        push_list(&mut out, "Audience insights", &self.audience_insights);
        push_list(&mut out, "Competitors", &self.competitors);
        push_list(&mut out, "Key insights", &self.key_insights);
        if let Some(statement) = &self.positioning_statement {
            out.push_str(&format!("\nPositioning statement:\n  {statement}\n"));
        }
        if let Some(framework) = &self.messaging_framework {
            out.push_str(&format!("\nMessaging framework:\n  {framework}\n"));
        }
        push_list(&mut out, "Hooks", &self.hooks);
        push_list(&mut out, "Calls to action", &self.ctas);
        out
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{heading}:\n"));
    for item in items {
        out.push_str(&format!("  - {item}\n"));
    }
}

/// Strings stay as they are; anything else is shown as compact JSON.
fn text(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Some(truncate_string(&rendered, FIELD_MAX_BYTES))
}

fn text_list(value: &Value, limit: usize) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().take(limit).filter_map(text).collect())
        .unwrap_or_default()
}

fn competitor_names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(PREVIEW_LIMIT)
                .filter_map(|item| match item.get("name") {
                    Some(name) => text(name),
                    None => text(item),
                })
                .collect()
        })
        .unwrap_or_default()
}
