//! Chat Onboard — conversational onboarding form.

pub mod channels;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod picker;
pub mod store;
