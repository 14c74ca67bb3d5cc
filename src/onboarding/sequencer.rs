//! Card animation sequencer: walks one card through its fixed reveal
//! choreography, emitting a snapshot at each step and holding in between.
//!
//! Choreography for card `i`:
//!
//! 1. enter below the viewport, expanded; hold 200 ms
//! 2. slide to center; hold the dataset's stay interval
//! 3. collapse while tilting ±10° (even `i` positive); hold 1200 ms
//! 4. straighten; hold 500 ms
//!
//! The last card skips 3 and 4 and holds 2500 ms expanded instead.

use std::time::Duration;

use tracing::debug;

use crate::education::EducationDataset;

use super::state::CardAnimationState;

/// Offset a card starts from, below the viewport.
pub const ENTER_OFFSET_Y: f32 = 1000.0;

/// Tilt magnitude during the collapse step, in degrees.
pub const COLLAPSE_TILT_DEGREES: f32 = 10.0;

pub const ENTER_HOLD: Duration = Duration::from_millis(200);
pub const COLLAPSE_HOLD: Duration = Duration::from_millis(1200);
pub const STRAIGHTEN_HOLD: Duration = Duration::from_millis(500);
pub const LAST_CARD_HOLD: Duration = Duration::from_millis(2500);

/// One instruction of a card's choreography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Emit(CardAnimationState),
    Hold(Duration),
}

/// Tilt applied while collapsing: even cards lean right, odd cards left.
pub fn collapse_tilt(card_index: usize) -> f32 {
    if card_index % 2 == 0 {
        COLLAPSE_TILT_DEGREES
    } else {
        -COLLAPSE_TILT_DEGREES
    }
}

/// The full step list for one card.
pub fn choreography(card_index: usize, is_last_card: bool, stay: Duration) -> Vec<Step> {
    let at = |is_expanded: bool, offset_y: f32, tilt_angle: f32| CardAnimationState {
        card_index,
        is_expanded,
        offset_y,
        is_visible: true,
        stack_position: card_index,
        tilt_angle,
    };

    let mut steps = vec![
        Step::Emit(at(true, ENTER_OFFSET_Y, 0.0)),
        Step::Hold(ENTER_HOLD),
        Step::Emit(at(true, 0.0, 0.0)),
        Step::Hold(stay),
    ];

    if is_last_card {
        steps.push(Step::Hold(LAST_CARD_HOLD));
    } else {
        steps.extend([
            Step::Emit(at(false, 0.0, collapse_tilt(card_index))),
            Step::Hold(COLLAPSE_HOLD),
            Step::Emit(at(false, 0.0, 0.0)),
            Step::Hold(STRAIGHTEN_HOLD),
        ]);
    }
    steps
}

/// Total time one card's choreography takes.
pub fn card_duration(is_last_card: bool, stay: Duration) -> Duration {
    choreography(0, is_last_card, stay)
        .iter()
        .map(|step| match step {
            Step::Hold(d) => *d,
            Step::Emit(_) => Duration::ZERO,
        })
        .sum()
}

/// Runs card choreographies. Has no failure mode: it only emits and waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardSequencer;

impl CardSequencer {
    pub fn new() -> Self {
        Self
    }

    /// Animate one card, returning only once every hold has elapsed.
    ///
    /// Dropping the future (e.g. aborting the owning task) stops both
    /// emission and waiting; the last emitted state is the last one
    /// observers see.
    pub async fn animate_card<F>(
        &self,
        card_index: usize,
        dataset: &EducationDataset,
        is_last_card: bool,
        mut emit: F,
    ) where
        F: FnMut(CardAnimationState),
    {
        let stay = Duration::from_millis(dataset.expand_card_stay_interval);
        debug!(card_index, is_last_card, stay_ms = dataset.expand_card_stay_interval, "Animating card");

        for step in choreography(card_index, is_last_card, stay) {
            match step {
                Step::Emit(state) => emit(state),
                Step::Hold(duration) => tokio::time::sleep(duration).await,
            }
        }
    }
}
