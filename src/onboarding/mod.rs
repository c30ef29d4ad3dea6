//! Onboarding system — a chat-style, step-by-step form.
//!
//! The flow asks one question at a time, validates each answer, and shows the
//! collected profile for review once every field is filled. From review the
//! user can edit a single field, start over, or save. Hosts (the terminal and
//! the REST/WebSocket routes) drive it through `OnboardingManager`.

pub mod field;
pub mod flow;
pub mod manager;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod state;
pub mod transcript;

pub use field::{FieldKey, FieldKind, FieldSchema, FieldSpec, FileFilter, Submission, Validator};
pub use flow::{Affordance, FlowSnapshot, OnboardingFlow, StepOutcome, TextAction};
pub use manager::{FlowEvent, OnboardingManager, UploadOutcome};
pub use model::{FieldValue, FileReference, FormRecord};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{FlowMode, SessionState};
pub use transcript::{EntryContent, Origin, Transcript, TranscriptEntry};
