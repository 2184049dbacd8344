//! Campaign brief model and the research input derived from it.
//!
//! Every field defaults when absent so a partially filled brief still
//! loads. Section numbering follows the brief form; section 5 carries the
//! links the research service scrapes.
use crate::transport::{BrandResearchInput, LandingPageLink, SocialLink};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Checkbox group with a free-text "other" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSelect {
    pub selected: Vec<String>,
    pub options: Vec<String>,
    pub other_text: String,
}

/// Radio group with a free-text "other" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleSelect {
    pub selected: String,
    pub options: Vec<String>,
    pub other_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignStrategy {
    pub business_goal: MultiSelect,
    pub marketing_objective: String,
    pub primary_kpi_target: MultiSelect,
    pub cta: SingleSelect,
    pub reason_now: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audience {
    pub id: String,
    pub target_demographics: String,
    pub target_psychographics: String,
    pub geo_allow: String,
    pub geo_deny: String,
    pub familiarity_level: String,
    pub key_takeaway: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudiencePositioning {
    pub audiences: Vec<Audience>,
    pub differentiator: String,
    pub offers_promotions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voiceover {
    pub required: bool,
    pub style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeDelivery {
    pub channels_platforms: MultiSelect,
    pub video_duration: MultiSelect,
    pub voiceover: Voiceover,
    pub assets_to_use: Vec<String>,
    pub brand_guidelines: String,
    pub winning_ads: Vec<String>,
    pub reference_videos: Vec<String>,
    pub additional_links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneEmotion {
    pub desired_feelings: MultiSelect,
    pub message_style: String,
    pub brand_role: String,
    pub brand_tone_overall: String,
    pub creative_direction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandResearchLinks {
    pub landing_page_links: Vec<LandingPageLink>,
    pub social_media_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personalization {
    pub id: String,
    pub audience_id: String,
    pub languages: Vec<String>,
    pub lengths: Vec<String>,
    pub ratios: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationInputs {
    pub personalizations: Vec<Personalization>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignBrief {
    pub section_1_campaign_strategy_objective: CampaignStrategy,
    pub section_2_audience_positioning: AudiencePositioning,
    pub section_3_creative_delivery_context: CreativeDelivery,
    pub section_4_tone_emotion: ToneEmotion,
    pub section_5_brand_research: BrandResearchLinks,
    pub section_6_personalization_inputs: PersonalizationInputs,
}

impl CampaignBrief {
    /// Research request for this brief.
    ///
    /// The whole brief travels as `brand_brief`. Links come from section 5
    /// in their original order; blank entries are dropped and the rest are
    /// trimmed.
    pub fn research_input(&self) -> Result<BrandResearchInput> {
        let brand_brief = serde_json::to_value(self).context("serialize campaign brief")?;
        let links = &self.section_5_brand_research;
        let lp_links = links
            .landing_page_links
            .iter()
            .filter_map(|link| {
                let url = link.url.trim();
                (!url.is_empty()).then(|| LandingPageLink {
                    url: url.to_string(),
                })
            })
            .collect();
        let social_links = links
            .social_media_links
            .iter()
            .filter_map(|link| {
                let handle = link.handle_or_url.trim();
                (!handle.is_empty()).then(|| SocialLink {
                    platform: link.platform.trim().to_string(),
                    handle_or_url: handle.to_string(),
                })
            })
            .collect();
        Ok(BrandResearchInput {
            brand_brief,
            lp_links,
            social_links,
        })
    }
}

pub fn load_brief(path: &Path) -> Result<CampaignBrief> {
    let bytes = fs::read(path).with_context(|| format!("read brief {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse brief JSON {}", path.display()))
}

/// Load a ready-made research input (the raw start request body).
pub fn load_research_input(path: &Path) -> Result<BrandResearchInput> {
    let bytes =
        fs::read(path).with_context(|| format!("read research input {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parse research input JSON {}", path.display()))
}
