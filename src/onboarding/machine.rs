//! Phase state machine: drives the session from splash through the card
//! sequence and reacts to user intents.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::education::{EducationDataset, EducationSource};

use super::model::{Intent, IntentOutcome};
use super::sequencer::CardSequencer;
use super::state::AnimationPhase;
use super::store::SessionStore;

/// Owns the phase and mutates the store. The sequencing half (`run`) is
/// meant to live on one task; the intent half only touches indices and the
/// phase, and only when the guards allow it.
pub struct PhaseMachine {
    store: Arc<SessionStore>,
    sequencer: CardSequencer,
}

impl PhaseMachine {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            sequencer: CardSequencer::new(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Load the dataset and, if that works, play the whole card sequence.
    ///
    /// On failure the error lands in the store and the phase stays at
    /// Splash. There is no retry.
    pub async fn run(&self, source: &dyn EducationSource) {
        if let Some(dataset) = self.load(source).await {
            self.play(dataset).await;
        }
    }

    /// Fetch the dataset once, recording the outcome in the store.
    pub async fn load(&self, source: &dyn EducationSource) -> Option<Arc<EducationDataset>> {
        self.store.begin_loading();
        match source.fetch().await {
            Ok(dataset) => Some(self.store.load_succeeded(dataset)),
            Err(e) => {
                warn!(error = %e, "Failed to load education dataset");
                self.store.load_failed(e.to_string());
                None
            }
        }
    }

    /// Intro hold, then every card in order, strictly one after another.
    ///
    /// `should_show_before_navigating` is deliberately not consulted.
    pub async fn play(&self, dataset: Arc<EducationDataset>) {
        tokio::time::sleep(Duration::from_millis(dataset.collapse_expand_intro_interval)).await;

        if !self.transition(AnimationPhase::CardsSequence) {
            return;
        }

        let card_count = dataset.cards.len();
        self.store.reset_cards(card_count);

        for index in 0..card_count {
            let is_last_card = index + 1 == card_count;
            self.store.focus_card(index);

            let store = &self.store;
            self.sequencer
                .animate_card(index, &dataset, is_last_card, |state| {
                    store.update_card(state);
                })
                .await;

            if !is_last_card {
                self.store.set_expanded_card(None);
            }
        }

        if let Some(last) = dataset.last_index() {
            self.store.focus_card(last);
        }
        self.store.mark_animation_complete();
        info!(cards = card_count, "Card sequence complete");
    }

    /// Move to `target` if the phase graph allows it.
    fn transition(&self, target: AnimationPhase) -> bool {
        let current = self.store.phase();
        if !current.can_transition_to(target) {
            warn!(from = %current, to = %target, "Ignoring invalid phase transition");
            return false;
        }
        self.store.set_phase(target);
        true
    }

    pub fn handle_intent(&self, intent: Intent) -> IntentOutcome {
        debug!(?intent, phase = %self.store.phase(), "Handling intent");
        match intent {
            Intent::CardTapped { index } => self.on_card_tapped(index),
            Intent::SaveTapped => self.on_save_tapped(),
            Intent::BackTapped => self.on_back_tapped(),
        }
    }

    /// Highlight a different card. Ignored while the sequence is still
    /// running, for the card already highlighted, and for unknown indices.
    pub fn on_card_tapped(&self, index: usize) -> IntentOutcome {
        if !self.store.is_animation_complete() {
            return IntentOutcome::Ignored;
        }
        if self.store.current_expanded_card() == Some(index) {
            return IntentOutcome::Ignored;
        }
        if index >= self.store.card_count() {
            warn!(index, "Tap on unknown card");
            return IntentOutcome::Ignored;
        }
        self.store.focus_card(index);
        IntentOutcome::Applied
    }

    /// Open the landing page from any other phase.
    pub fn on_save_tapped(&self) -> IntentOutcome {
        if self.transition(AnimationPhase::LandingPage) {
            IntentOutcome::Applied
        } else {
            IntentOutcome::Ignored
        }
    }

    /// Back from the landing page returns to the cards with their last
    /// known states; anywhere else it ends the session.
    pub fn on_back_tapped(&self) -> IntentOutcome {
        if self.store.phase() == AnimationPhase::LandingPage {
            self.transition(AnimationPhase::CardsSequence);
            return IntentOutcome::Applied;
        }
        info!(phase = %self.store.phase(), "Back pressed, exit requested");
        self.store.request_exit();
        IntentOutcome::ExitRequested
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::education::EducationCard;
    use crate::error::LoadError;

    struct Fixed(EducationDataset);

    #[async_trait]
    impl EducationSource for Fixed {
        async fn fetch(&self) -> Result<EducationDataset, LoadError> {
            Ok(self.0.clone())
        }
    }

    fn dataset(cards: usize, stay_ms: u64, intro_ms: u64) -> EducationDataset {
        EducationDataset {
            intro_title: "Intro".into(),
            intro_subtitle: String::new(),
            intro_subtitle_icon: None,
            toolbar_title: "Savings".into(),
            toolbar_icon: None,
            cards: (0..cards)
                .map(|i| EducationCard {
                    background_color: format!("#10101{i}"),
                    start_gradient: String::new(),
                    end_gradient: String::new(),
                    image: String::new(),
                    expanded_text: format!("expanded {i}"),
                    collapsed_text: format!("collapsed {i}"),
                })
                .collect(),
            save_button: Default::default(),
            cta_lottie: None,
            action_text: None,
            collapse_expand_intro_interval: intro_ms,
            expand_card_stay_interval: stay_ms,
            should_show_before_navigating: false,
        }
    }

    async fn completed_machine(cards: usize) -> PhaseMachine {
        let machine = PhaseMachine::new(SessionStore::new());
        machine.run(&Fixed(dataset(cards, 0, 0))).await;
        assert!(machine.store().is_animation_complete());
        machine
    }

    #[tokio::test(start_paused = true)]
    async fn run_plays_every_card_then_completes() {
        let machine = PhaseMachine::new(SessionStore::new());
        let start = Instant::now();
        machine.run(&Fixed(dataset(3, 300, 100))).await;

        assert_eq!(start.elapsed(), Duration::from_millis(7500));
        let snap = machine.store().snapshot();
        assert_eq!(snap.phase, AnimationPhase::CardsSequence);
        assert!(snap.animation_complete);
        assert_eq!(snap.current_expanded_card, Some(2));
        assert_eq!(snap.background_card_index, 2);
        assert!(!snap.card_states[0].is_expanded);
        assert!(!snap.card_states[1].is_expanded);
        assert!(snap.card_states[2].is_expanded);
    }

    #[tokio::test(start_paused = true)]
    async fn should_show_before_navigating_is_inert() {
        let mut data = dataset(1, 0, 0);
        data.should_show_before_navigating = true;
        let machine = PhaseMachine::new(SessionStore::new());
        machine.run(&Fixed(data)).await;
        assert_eq!(machine.store().phase(), AnimationPhase::CardsSequence);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_dataset_completes_without_highlight() {
        let machine = completed_machine(0).await;
        let snap = machine.store().snapshot();
        assert_eq!(snap.phase, AnimationPhase::CardsSequence);
        assert_eq!(snap.current_expanded_card, None);
        assert!(snap.card_states.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn play_twice_does_not_restart() {
        let machine = completed_machine(2).await;
        let data = machine.store().snapshot().data.unwrap();
        machine.play(data).await;
        // Already past Splash, so the second play bails before touching cards.
        assert_eq!(machine.store().current_expanded_card(), Some(1));
    }

    #[tokio::test]
    async fn tap_before_completion_is_ignored() {
        let machine = PhaseMachine::new(SessionStore::new());
        machine.store().reset_cards(3);
        machine.store().focus_card(0);

        assert_eq!(machine.on_card_tapped(2), IntentOutcome::Ignored);
        assert_eq!(machine.store().current_expanded_card(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn tap_after_completion_moves_highlight() {
        let machine = completed_machine(3).await;
        assert_eq!(machine.handle_intent(Intent::CardTapped { index: 0 }), IntentOutcome::Applied);

        let snap = machine.store().snapshot();
        assert_eq!(snap.current_expanded_card, Some(0));
        assert_eq!(snap.background_card_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tap_on_current_or_unknown_card_is_noop() {
        let machine = completed_machine(3).await;
        let before = machine.store().snapshot();

        assert_eq!(machine.on_card_tapped(2), IntentOutcome::Ignored);
        assert_eq!(machine.on_card_tapped(9), IntentOutcome::Ignored);

        let after = machine.store().snapshot();
        assert_eq!(after.current_expanded_card, before.current_expanded_card);
        assert_eq!(after.background_card_index, before.background_card_index);
    }

    #[tokio::test(start_paused = true)]
    async fn save_then_back_restores_cards() {
        let machine = completed_machine(3).await;
        machine.on_card_tapped(1);
        let before = machine.store().snapshot();

        assert_eq!(machine.handle_intent(Intent::SaveTapped), IntentOutcome::Applied);
        assert_eq!(machine.store().phase(), AnimationPhase::LandingPage);

        assert_eq!(machine.handle_intent(Intent::BackTapped), IntentOutcome::Applied);
        let after = machine.store().snapshot();
        assert_eq!(after.phase, AnimationPhase::CardsSequence);
        assert_eq!(after.card_states, before.card_states);
        assert_eq!(after.current_expanded_card, Some(1));
        assert!(after.animation_complete);
    }

    #[tokio::test(start_paused = true)]
    async fn save_during_splash_opens_landing_page() {
        let machine = Arc::new(PhaseMachine::new(SessionStore::new()));
        let data = machine.load(&Fixed(dataset(2, 0, 1000))).await.unwrap();

        let player = {
            let machine = Arc::clone(&machine);
            tokio::spawn(async move { machine.play(data).await })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(machine.store().phase(), AnimationPhase::Splash);
        assert_eq!(machine.on_save_tapped(), IntentOutcome::Applied);
        assert_eq!(machine.store().phase(), AnimationPhase::LandingPage);

        // The intro hold ends and the sequence takes over the phase.
        player.await.unwrap();
        let snap = machine.store().snapshot();
        assert_eq!(snap.phase, AnimationPhase::CardsSequence);
        assert!(snap.animation_complete);
    }

    #[tokio::test(start_paused = true)]
    async fn save_on_landing_page_is_ignored() {
        let machine = completed_machine(1).await;
        assert_eq!(machine.on_save_tapped(), IntentOutcome::Applied);
        assert_eq!(machine.on_save_tapped(), IntentOutcome::Ignored);
        assert_eq!(machine.store().phase(), AnimationPhase::LandingPage);
    }

    #[tokio::test(start_paused = true)]
    async fn back_outside_landing_requests_exit() {
        let machine = completed_machine(2).await;
        let mut events = machine.store().subscribe();

        assert_eq!(machine.on_back_tapped(), IntentOutcome::ExitRequested);
        assert_eq!(machine.store().phase(), AnimationPhase::CardsSequence);
        assert_eq!(
            events.recv().await.unwrap(),
            crate::onboarding::SessionEvent::ExitRequested
        );
    }
}
