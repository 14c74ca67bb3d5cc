//! What the presentation layer should show for a given snapshot.
//!
//! Pure functions of `SessionState`; nothing here mutates the session.

use serde::Serialize;

use super::state::{AnimationPhase, CardAnimationState, SessionState};

/// Background used while nothing is loaded or the index points nowhere.
pub const FALLBACK_BACKGROUND: &str = "#6B46C1";

/// Toolbar title used before the dataset arrives.
pub const FALLBACK_TITLE: &str = "Onboarding";

/// Which screen to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Error,
    Splash,
    Cards,
    Landing,
    /// No data, not loading, no error: the very first frame.
    Blank,
}

/// Per-card rendering hints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardView {
    pub state: CardAnimationState,
    pub is_current: bool,
    pub is_clickable: bool,
}

/// Everything a renderer needs besides the raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub screen: Screen,
    pub title: String,
    pub icon_url: Option<String>,
    pub show_back_button: bool,
    pub background_color: String,
    pub show_save_button: bool,
    pub cards: Vec<CardView>,
}

pub fn screen(state: &SessionState) -> Screen {
    if state.is_loading {
        return Screen::Loading;
    }
    if state.error.is_some() {
        return Screen::Error;
    }
    if state.data.is_none() {
        return Screen::Blank;
    }
    match state.phase {
        AnimationPhase::Splash => Screen::Splash,
        // FinalCta renders the same interactive list as the finished sequence.
        AnimationPhase::CardsSequence | AnimationPhase::FinalCta => Screen::Cards,
        AnimationPhase::LandingPage => Screen::Landing,
    }
}

/// Color string of the card the background follows.
pub fn background_color(state: &SessionState) -> &str {
    state
        .data
        .as_ref()
        .and_then(|d| d.cards.get(state.background_card_index))
        .map(|card| card.background_color.as_str())
        .unwrap_or(FALLBACK_BACKGROUND)
}

pub fn build(state: &SessionState) -> ViewModel {
    let screen = screen(state);
    let (title, icon_url) = match &state.top_bar {
        Some(bar) => (bar.title.clone(), bar.icon_url.clone()),
        None => (FALLBACK_TITLE.to_string(), None),
    };

    // Only cards with a known animation state are rendered.
    let rendered = state.card_count().min(state.card_states.len());
    let cards = state.card_states[..rendered]
        .iter()
        .map(|card| CardView {
            state: *card,
            is_current: state.current_expanded_card == Some(card.card_index),
            is_clickable: state.animation_complete,
        })
        .collect();

    ViewModel {
        screen,
        title,
        icon_url,
        show_back_button: state.phase.shows_back_button(),
        background_color: background_color(state).to_string(),
        show_save_button: screen == Screen::Cards && state.animation_complete,
        cards,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::education::{EducationCard, EducationDataset};
    use crate::onboarding::state::TopBar;

    fn dataset() -> Arc<EducationDataset> {
        Arc::new(EducationDataset {
            intro_title: String::new(),
            intro_subtitle: String::new(),
            intro_subtitle_icon: None,
            toolbar_title: "Gold".into(),
            toolbar_icon: None,
            cards: ["#111111", "#222222"]
                .iter()
                .map(|color| EducationCard {
                    background_color: color.to_string(),
                    start_gradient: String::new(),
                    end_gradient: String::new(),
                    image: String::new(),
                    expanded_text: String::new(),
                    collapsed_text: String::new(),
                })
                .collect(),
            save_button: Default::default(),
            cta_lottie: None,
            action_text: None,
            collapse_expand_intro_interval: 0,
            expand_card_stay_interval: 0,
            should_show_before_navigating: false,
        })
    }

    fn loaded(phase: AnimationPhase) -> SessionState {
        SessionState {
            data: Some(dataset()),
            phase,
            card_states: (0..2).map(CardAnimationState::hidden).collect(),
            top_bar: Some(TopBar {
                title: "Gold".into(),
                icon_url: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn screen_selection() {
        let loading = SessionState {
            is_loading: true,
            ..Default::default()
        };
        assert_eq!(screen(&loading), Screen::Loading);

        let failed = SessionState {
            error: Some("boom".into()),
            ..Default::default()
        };
        assert_eq!(screen(&failed), Screen::Error);
        assert_eq!(screen(&SessionState::default()), Screen::Blank);

        assert_eq!(screen(&loaded(AnimationPhase::Splash)), Screen::Splash);
        assert_eq!(screen(&loaded(AnimationPhase::CardsSequence)), Screen::Cards);
        assert_eq!(screen(&loaded(AnimationPhase::FinalCta)), Screen::Cards);
        assert_eq!(screen(&loaded(AnimationPhase::LandingPage)), Screen::Landing);
    }

    #[test]
    fn background_falls_back() {
        assert_eq!(background_color(&SessionState::default()), FALLBACK_BACKGROUND);

        let mut state = loaded(AnimationPhase::CardsSequence);
        state.background_card_index = 1;
        assert_eq!(background_color(&state), "#222222");

        state.background_card_index = 7;
        assert_eq!(background_color(&state), FALLBACK_BACKGROUND);
    }

    #[test]
    fn title_falls_back_before_load() {
        let view = build(&SessionState::default());
        assert_eq!(view.title, FALLBACK_TITLE);
        assert!(!view.show_back_button);
        assert!(view.cards.is_empty());
    }

    #[test]
    fn save_button_only_after_completion() {
        let mut state = loaded(AnimationPhase::CardsSequence);
        state.current_expanded_card = Some(1);
        let view = build(&state);
        assert!(!view.show_save_button);
        assert!(view.cards.iter().all(|c| !c.is_clickable));

        state.animation_complete = true;
        let view = build(&state);
        assert!(view.show_save_button);
        assert!(view.show_back_button);
        assert_eq!(view.title, "Gold");
        assert!(view.cards[1].is_current);
        assert!(!view.cards[0].is_current);
        assert!(view.cards.iter().all(|c| c.is_clickable));
    }

    #[test]
    fn landing_hides_save_button() {
        let mut state = loaded(AnimationPhase::LandingPage);
        state.animation_complete = true;
        assert!(!build(&state).show_save_button);
    }
}
