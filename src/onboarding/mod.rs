//! Onboarding session: the card-reveal flow shown on first launch.
//!
//! A session fetches the education dataset, holds on the splash for the
//! dataset's intro interval, then reveals every card one at a time through a
//! fixed choreography. Once the last card settles the list becomes
//! interactive: taps move the highlight, save opens the landing page, back
//! returns from it or ends the session.

pub mod machine;
pub mod model;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod store;
pub mod view;

pub use machine::PhaseMachine;
pub use model::{Intent, IntentOutcome, SessionEvent};
pub use sequencer::CardSequencer;
pub use session::SessionHandle;
pub use state::{AnimationPhase, CardAnimationState, SessionState, TopBar};
pub use store::SessionStore;
pub use view::{Screen, ViewModel};
