//! The fixed research pipeline: six stages, always executed in this order.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    EvidenceExtraction,
    DataMerge,
    CompetitorAnalysis,
    CompetitorAdAnalysis,
    InsightGeneration,
    StrategyRefinement,
}

/// Execution order. Stages never run in parallel, out of order, or skipped.
pub const STAGE_SEQUENCE: [Stage; 6] = [
    Stage::EvidenceExtraction,
    Stage::DataMerge,
    Stage::CompetitorAnalysis,
    Stage::CompetitorAdAnalysis,
    Stage::InsightGeneration,
    Stage::StrategyRefinement,
];

impl Stage {
    /// Node name used on the wire.
    pub fn id(self) -> &'static str {
        match self {
            Stage::EvidenceExtraction => "node_a",
            Stage::DataMerge => "node_a_plus",
            Stage::CompetitorAnalysis => "node_b",
            Stage::CompetitorAdAnalysis => "node_e",
            Stage::InsightGeneration => "node_c",
            Stage::StrategyRefinement => "node_d",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::EvidenceExtraction => "Evidence Extraction",
            Stage::DataMerge => "Data Merging",
            Stage::CompetitorAnalysis => "Competitor Analysis",
            Stage::CompetitorAdAnalysis => "Competitor Ad Analysis",
            Stage::InsightGeneration => "Research Insights",
            Stage::StrategyRefinement => "Refined Strategy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::EvidenceExtraction => "Scraping and analyzing landing pages",
            Stage::DataMerge => "Combining and processing extracted data",
            Stage::CompetitorAnalysis => "Identifying and analyzing competitors",
            Stage::CompetitorAdAnalysis => "Fetching ads and analyzing video creatives",
            Stage::InsightGeneration => "Generating strategic insights",
            Stage::StrategyRefinement => "Finalizing creative strategy",
        }
    }

    /// Human-readable text shown while the stage is the latest one reported.
    pub fn operation(self) -> &'static str {
        match self {
            Stage::EvidenceExtraction => "Extracting evidence from landing pages...",
            Stage::DataMerge => "Merging and analyzing extracted data...",
            Stage::CompetitorAnalysis => "Identifying competitors and market analysis...",
            Stage::CompetitorAdAnalysis => "Fetching competitor ads and analyzing videos...",
            Stage::InsightGeneration => "Generating research insights...",
            Stage::StrategyRefinement => "Refining insights and finalizing strategy...",
        }
    }

    pub fn position(self) -> usize {
        STAGE_SEQUENCE
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or_default()
    }

    pub fn from_id(id: &str) -> Option<Stage> {
        STAGE_SEQUENCE.iter().copied().find(|stage| stage.id() == id)
    }
}

/// Where a stage stands relative to the latest progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Pending,
}

/// Status of `stage` given the node named by the latest progress record.
///
/// An unknown node (such as the synthetic `starting` record) leaves every
/// stage pending.
pub fn stage_status(current_node: &str, stage: Stage) -> StageStatus {
    let Some(current) = Stage::from_id(current_node) else {
        return StageStatus::Pending;
    };
    let (index, current_index) = (stage.position(), current.position());
    if index < current_index {
        StageStatus::Completed
    } else if index == current_index {
        StageStatus::Current
    } else {
        StageStatus::Pending
    }
}
