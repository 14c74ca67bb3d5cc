//! Onboarding state: the phase state machine's phases and the session
//! snapshot the presentation layer renders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::education::EducationDataset;

/// The phases of an onboarding session.
///
/// Progresses Splash → CardsSequence → LandingPage, with one reverse edge
/// LandingPage → CardsSequence for back navigation. Save reaches the landing
/// page from any other phase, Splash included. `FinalCta` is reserved:
/// nothing currently transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPhase {
    Splash,
    CardsSequence,
    FinalCta,
    LandingPage,
}

impl AnimationPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: AnimationPhase) -> bool {
        use AnimationPhase::*;
        matches!(
            (self, target),
            (Splash, CardsSequence)
                | (Splash, LandingPage)
                | (CardsSequence, LandingPage)
                | (FinalCta, LandingPage)
                | (LandingPage, CardsSequence)
        )
    }

    /// Whether the phase shows a back affordance at all.
    pub fn shows_back_button(&self) -> bool {
        !matches!(self, Self::Splash)
    }
}

impl Default for AnimationPhase {
    fn default() -> Self {
        Self::Splash
    }
}

impl std::fmt::Display for AnimationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Splash => "splash",
            Self::CardsSequence => "cards_sequence",
            Self::FinalCta => "final_cta",
            Self::LandingPage => "landing_page",
        };
        write!(f, "{s}")
    }
}

/// Per-card visual snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardAnimationState {
    pub card_index: usize,
    pub is_expanded: bool,
    /// Vertical offset from the resting position; positive is below.
    pub offset_y: f32,
    pub is_visible: bool,
    pub stack_position: usize,
    /// Degrees, positive is clockwise.
    pub tilt_angle: f32,
}

impl CardAnimationState {
    /// Resting state before a card's choreography runs: hidden, collapsed,
    /// untilted, stacked at its own index.
    pub fn hidden(card_index: usize) -> Self {
        Self {
            card_index,
            is_expanded: false,
            offset_y: 0.0,
            is_visible: false,
            stack_position: card_index,
            tilt_angle: 0.0,
        }
    }
}

/// Toolbar content taken from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBar {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Everything the presentation layer needs to render one frame.
///
/// Cloning is cheap: the dataset and the card sequence sit behind `Arc`s and
/// are replaced wholesale, never mutated in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Arc<EducationDataset>>,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub phase: AnimationPhase,
    pub card_states: Arc<[CardAnimationState]>,
    /// `None` when no card is highlighted.
    pub current_expanded_card: Option<usize>,
    pub background_card_index: usize,
    pub animation_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_bar: Option<TopBar>,
}

impl SessionState {
    /// Loading and loaded are exclusive, and an error means no data.
    pub fn is_consistent(&self) -> bool {
        !(self.is_loading && self.data.is_some()) && (self.error.is_none() || self.data.is_none())
    }

    pub fn card_count(&self) -> usize {
        self.data.as_ref().map(|d| d.cards.len()).unwrap_or(0)
    }
}
