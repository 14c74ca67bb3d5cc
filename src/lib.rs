//! Card Onboarding: scripted card-reveal onboarding session engine.

pub mod config;
pub mod education;
pub mod error;
pub mod onboarding;
