//! Channels that host the onboarding conversation.

pub mod cli;

pub use cli::CliChannel;
