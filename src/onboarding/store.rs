//! Session state store: the single source of truth the presentation layer
//! observes.
//!
//! Snapshots go out over a `watch` channel (latest value wins), change events
//! over a `broadcast` channel. Every setter replaces whole sub-fields so a
//! snapshot never aliases a container that is still being written.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::education::EducationDataset;

use super::model::SessionEvent;
use super::state::{AnimationPhase, CardAnimationState, SessionState, TopBar};

/// Default broadcast channel capacity.
const DEFAULT_EVENT_CAPACITY: usize = 256;

pub struct SessionStore {
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    started: Instant,
}

impl SessionStore {
    /// Create a store holding the default (Splash, nothing loaded) state.
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(event_capacity: usize) -> Arc<Self> {
        let (state, _rx) = watch::channel(SessionState::default());
        let (events, _rx) = broadcast::channel(event_capacity);
        Arc::new(Self {
            state,
            events,
            started: Instant::now(),
        })
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Milliseconds since the store was created, on the tokio clock.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn publish(&self, event: SessionEvent) {
        // Ok if nobody is listening
        let _ = self.events.send(event);
    }

    pub fn phase(&self) -> AnimationPhase {
        self.state.borrow().phase
    }

    pub fn current_expanded_card(&self) -> Option<usize> {
        self.state.borrow().current_expanded_card
    }

    pub fn is_animation_complete(&self) -> bool {
        self.state.borrow().animation_complete
    }

    pub fn card_count(&self) -> usize {
        self.state.borrow().card_count()
    }

    /// Enter the loading state. Clears any previous data or error.
    pub fn begin_loading(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.data = None;
            s.error = None;
        });
        self.publish(SessionEvent::LoadStarted);
    }

    /// Install a freshly loaded dataset and the toolbar derived from it.
    pub fn load_succeeded(&self, dataset: EducationDataset) -> Arc<EducationDataset> {
        let dataset = Arc::new(dataset);
        let card_count = dataset.cards.len();
        let top_bar = TopBar {
            title: dataset.toolbar_title.clone(),
            icon_url: dataset.toolbar_icon.clone(),
        };

        self.state.send_modify(|s| {
            s.data = Some(Arc::clone(&dataset));
            s.is_loading = false;
            s.error = None;
            s.top_bar = Some(top_bar);
        });

        info!(cards = card_count, "Education dataset loaded");
        self.publish(SessionEvent::DataLoaded { card_count });
        dataset
    }

    /// Record a load failure. Data is dropped so the error invariant holds.
    pub fn load_failed(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| {
            s.data = None;
            s.is_loading = false;
            s.error = Some(message.clone());
        });

        info!(error = %message, "Education dataset failed to load");
        self.publish(SessionEvent::LoadFailed { message });
    }

    /// Overwrite the phase. Returns the previous phase.
    pub fn set_phase(&self, phase: AnimationPhase) -> AnimationPhase {
        let mut previous = phase;
        self.state.send_modify(|s| {
            previous = s.phase;
            s.phase = phase;
        });

        if previous != phase {
            info!(from = %previous, to = %phase, "Onboarding phase changed");
            self.publish(SessionEvent::PhaseChanged {
                from: previous,
                to: phase,
            });
        }
        previous
    }

    /// Replace the card sequence with `count` hidden cards.
    pub fn reset_cards(&self, count: usize) {
        let cards: Arc<[CardAnimationState]> = (0..count).map(CardAnimationState::hidden).collect();
        self.state.send_modify(|s| s.card_states = cards);
    }

    /// Replace one card's state. Out-of-range indices are dropped and
    /// `false` is returned.
    pub fn update_card(&self, card: CardAnimationState) -> bool {
        let updated = self.state.send_if_modified(|s| {
            if card.card_index >= s.card_states.len() {
                return false;
            }
            let cards: Arc<[CardAnimationState]> = s
                .card_states
                .iter()
                .map(|existing| {
                    if existing.card_index == card.card_index {
                        card
                    } else {
                        *existing
                    }
                })
                .collect();
            s.card_states = cards;
            true
        });

        if updated {
            let at = self.elapsed_ms();
            debug!(
                card_index = card.card_index,
                expanded = card.is_expanded,
                offset_y = card.offset_y,
                tilt = card.tilt_angle,
                at,
                "Card state updated"
            );
            self.publish(SessionEvent::CardUpdated { state: card, at });
        }
        updated
    }

    pub fn set_expanded_card(&self, index: Option<usize>) {
        self.state.send_modify(|s| s.current_expanded_card = index);
        self.publish(SessionEvent::ExpandedCardChanged { index });
    }

    pub fn set_background_card(&self, index: usize) {
        self.state.send_modify(|s| s.background_card_index = index);
        self.publish(SessionEvent::BackgroundCardChanged { index });
    }

    /// Point both the highlight and the background at `index` in a single
    /// snapshot.
    pub fn focus_card(&self, index: usize) {
        self.state.send_modify(|s| {
            s.background_card_index = index;
            s.current_expanded_card = Some(index);
        });
        self.publish(SessionEvent::BackgroundCardChanged { index });
        self.publish(SessionEvent::ExpandedCardChanged { index: Some(index) });
    }

    pub fn mark_animation_complete(&self) {
        self.state.send_modify(|s| s.animation_complete = true);
        self.publish(SessionEvent::AnimationCompleted);
    }

    /// Tell observers the host should end the session. State is untouched.
    pub fn request_exit(&self) {
        self.publish(SessionEvent::ExitRequested);
    }
}
