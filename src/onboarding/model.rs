//! Intents coming in from the presentation layer and events going out to it.

use serde::{Deserialize, Serialize};

use super::state::{AnimationPhase, CardAnimationState};

/// A user action sent by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// A card in the list was tapped.
    CardTapped { index: usize },
    /// The floating save button was tapped.
    SaveTapped,
    /// Toolbar or system back.
    BackTapped,
}

impl Intent {
    /// Parse the CLI shorthand: `tap <n>`, `save` or `back`.
    pub fn parse_command(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        match parts.next()? {
            "tap" => {
                let index = parts.next()?.parse().ok()?;
                Some(Self::CardTapped { index })
            }
            "save" => Some(Self::SaveTapped),
            "back" => Some(Self::BackTapped),
            _ => None,
        }
    }
}

/// What handling an intent did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentOutcome {
    /// State changed.
    Applied,
    /// Guards rejected the intent; state is unchanged.
    Ignored,
    /// The host should end the session.
    ExitRequested,
}

/// Fine-grained change notifications, broadcast alongside snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    LoadStarted,
    DataLoaded { card_count: usize },
    LoadFailed { message: String },
    PhaseChanged { from: AnimationPhase, to: AnimationPhase },
    /// One card's state was replaced. `at` is milliseconds since the session
    /// store was created.
    CardUpdated { state: CardAnimationState, at: u64 },
    ExpandedCardChanged { index: Option<usize> },
    BackgroundCardChanged { index: usize },
    AnimationCompleted,
    ExitRequested,
}
