//! Onboarding state machine — tracks where the user is in the flow.

use serde::{Deserialize, Serialize};

use super::field::FieldKey;

/// The mode of the onboarding flow.
///
/// `Collecting` walks the fields in order; once the last field is accepted
/// the flow moves to `Review`. From `Review` the user can enter `Editing`,
/// pick a field, and return straight to `Review` after a valid answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlowMode {
    Collecting { step: usize },
    Editing { key: Option<FieldKey> },
    Review,
}

impl FlowMode {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: FlowMode) -> bool {
        use FlowMode::*;
        match (self, target) {
            (Collecting { step: from }, Collecting { step: to }) => to == from + 1,
            (Collecting { .. }, Review) => true,
            (Review, Editing { key: None }) => true,
            (Editing { key: None }, Editing { key: Some(_) }) => true,
            (Editing { key: Some(_) }, Review) => true,
            _ => false,
        }
    }

    /// Short name of the mode, independent of its payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Collecting { .. } => "collecting",
            Self::Editing { .. } => "editing",
            Self::Review => "review",
        }
    }

    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review)
    }
}

impl Default for FlowMode {
    fn default() -> Self {
        Self::Collecting { step: 0 }
    }
}

impl std::fmt::Display for FlowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collecting { step } => write!(f, "collecting (step {step})"),
            Self::Editing { key: Some(key) } => write!(f, "editing {key}"),
            Self::Editing { key: None } => write!(f, "choosing a field to edit"),
            Self::Review => write!(f, "reviewing"),
        }
    }
}

/// Where the flow is and what went wrong last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(flatten)]
    pub mode: FlowMode,
    /// Corrective message from the most recent rejected input, cleared on
    /// the next accepted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl SessionState {
    /// Index of the field being collected, or `field_count` (one past the
    /// end) outside of `Collecting`.
    pub fn current_step_index(&self, field_count: usize) -> usize {
        match self.mode {
            FlowMode::Collecting { step } => step,
            _ => field_count,
        }
    }

    pub fn editing_key(&self) -> Option<FieldKey> {
        match self.mode {
            FlowMode::Editing { key } => key,
            _ => None,
        }
    }

    /// Move to `target`. Returns an error naming both modes if the transition
    /// is not part of the flow.
    pub fn transition(&mut self, target: FlowMode) -> Result<(), String> {
        if !self.mode.can_transition_to(target) {
            return Err(format!("Cannot transition from {} to {}", self.mode, target));
        }
        self.mode = target;
        Ok(())
    }
}
