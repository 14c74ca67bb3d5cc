//! Education dataset: the immutable document driving an onboarding session.

use serde::{Deserialize, Serialize};

/// Envelope returned by the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationResponse {
    pub data: EducationPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    pub manual_buy_education_data: EducationDataset,
}

impl EducationResponse {
    pub fn into_dataset(self) -> EducationDataset {
        self.data.manual_buy_education_data
    }
}

/// Everything the onboarding flow needs: intro copy, the ordered cards, the
/// call-to-action and the two timing knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationDataset {
    #[serde(default)]
    pub intro_title: String,
    #[serde(default)]
    pub intro_subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_subtitle_icon: Option<String>,
    #[serde(rename = "toolBarText", default)]
    pub toolbar_title: String,
    #[serde(rename = "toolBarIcon", default, skip_serializing_if = "Option::is_none")]
    pub toolbar_icon: Option<String>,
    #[serde(rename = "educationCardList")]
    pub cards: Vec<EducationCard>,
    #[serde(rename = "saveButtonCta", default)]
    pub save_button: SaveButtonCta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_lottie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
    /// Intro hold before the card sequence starts, in milliseconds.
    #[serde(default)]
    pub collapse_expand_intro_interval: u64,
    /// How long each card stays expanded and centered, in milliseconds.
    #[serde(default)]
    pub expand_card_stay_interval: u64,
    /// Carried for completeness; the session ignores it.
    #[serde(default)]
    pub should_show_before_navigating: bool,
}

impl EducationDataset {
    /// Index of the final card, if there are any cards.
    pub fn last_index(&self) -> Option<usize> {
        self.cards.len().checked_sub(1)
    }
}

/// One education slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationCard {
    #[serde(rename = "backGroundColor", default)]
    pub background_color: String,
    #[serde(default)]
    pub start_gradient: String,
    #[serde(default)]
    pub end_gradient: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "expandStateText", default)]
    pub expanded_text: String,
    #[serde(rename = "collapsedStateText", default)]
    pub collapsed_text: String,
}

/// Descriptor of the floating save button shown once the sequence finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveButtonCta {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
}
