//! OnboardingFlow — the step-indexed form state machine.
//!
//! The flow owns the session state, the collected answers, and the chat
//! transcript. Every operation runs to completion synchronously and either
//! moves the state machine or leaves it untouched with a corrective message
//! in the transcript. Hosts observe the result through [`FlowSnapshot`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::FlowError;

use super::field::{FieldKey, FieldKind, FieldSchema, FieldSpec, FileFilter, Submission};
use super::model::{FileReference, FormRecord};
use super::prompts::{self, MenuOption};
use super::state::{FlowMode, SessionState};
use super::transcript::{EntryContent, Transcript, TranscriptEntry};

/// Default text input that restarts the flow.
pub const DEFAULT_RESET_SENTINEL: &str = "1";

/// What happened to a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stored; the next field has been prompted.
    Advanced { key: FieldKey },
    /// Stored the last field; the flow is now in review.
    Completed { key: FieldKey },
    /// Stored an edited field; back in review.
    Edited { key: FieldKey },
    /// Not stored; the corrective message was appended to the transcript.
    Rejected { message: String },
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Result of routing one line of chat text through [`OnboardingFlow::handle_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    /// The flow was restarted.
    Reset,
    /// The text was submitted as an answer.
    Step(StepOutcome),
    /// The edit menu is showing.
    EditStarted,
    /// A field was picked from the edit menu.
    EditFieldSelected(FieldKey),
    /// The user asked to save; the caller owns the save itself.
    SaveRequested,
    /// Nothing changed; a corrective message was appended.
    Corrected(String),
}

/// What kind of input the host should offer next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Affordance {
    Text { placeholder: String },
    Choice { options: Vec<String> },
    Upload {
        field: FieldKey,
        filter: FileFilter,
        label: String,
    },
    EditMenu { options: Vec<MenuOption> },
    Review {
        summary: String,
        actions: Vec<String>,
    },
}

/// Immutable view of the flow after an operation.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub state: SessionState,
    pub current_step_index: usize,
    pub total_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing_key: Option<FieldKey>,
    pub affordance: Affordance,
    pub record: FormRecord,
    pub transcript: Vec<TranscriptEntry>,
}

/// The onboarding state machine.
#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    schema: FieldSchema,
    state: SessionState,
    record: FormRecord,
    transcript: Transcript,
    reset_sentinel: String,
    generation: u64,
}

impl OnboardingFlow {
    /// Start a flow at the first field, with its prompt already in the transcript.
    pub fn new(schema: FieldSchema) -> Self {
        let mut flow = Self {
            schema,
            state: SessionState::default(),
            record: FormRecord::new(),
            transcript: Transcript::new(),
            reset_sentinel: DEFAULT_RESET_SENTINEL.to_string(),
            generation: 0,
        };
        flow.transcript.push_system(flow.schema.first().prompt.clone());
        flow
    }

    pub fn with_reset_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.reset_sentinel = sentinel.into();
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> FlowMode {
        self.state.mode
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Bumped by every reset. Work that spans an await compares it to tell
    /// whether it still belongs to the same session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_step_index(&self) -> usize {
        self.state.current_step_index(self.schema.len())
    }

    /// The field the next answer is for, if the flow is waiting for one.
    pub fn awaiting(&self) -> Option<&FieldSpec> {
        match self.state.mode {
            FlowMode::Collecting { step } => self.schema.get(step),
            FlowMode::Editing { key: Some(key) } => self.schema.find(key),
            _ => None,
        }
    }

    /// Submit an answer for the awaited field.
    ///
    /// Empty text and answers that fail the field's check are rejected with
    /// a corrective transcript entry and leave the state where it was.
    pub fn submit(&mut self, submission: Submission) -> Result<StepOutcome, FlowError> {
        let Some(key) = self.awaiting().map(|f| f.key) else {
            return Err(FlowError::InvalidOperation {
                operation: "submit an answer",
                mode: self.state.mode,
            });
        };

        if let Submission::Text(text) = &submission {
            if text.trim().is_empty() {
                debug!(field = %key, "Rejected empty input");
                return Ok(self.reject(prompts::FILL_THE_FIELD.to_string()));
            }
        }

        self.transcript
            .push_user(EntryContent::from(submission.clone()));

        let Some(spec) = self.schema.find(key) else {
            return Err(FlowError::UnknownField(key.to_string()));
        };
        if let Err(message) = spec.check(&submission) {
            debug!(field = %key, reason = %message, "Rejected input");
            return Ok(self.reject(message));
        }

        self.record.set(key, submission.into());
        self.state.last_error = None;

        let outcome = match self.state.mode {
            FlowMode::Collecting { step } => {
                let next = step + 1;
                match self.schema.get(next).map(|f| f.prompt.clone()) {
                    Some(prompt) => {
                        self.move_to(FlowMode::Collecting { step: next });
                        self.transcript.push_system(prompt);
                        info!(field = %key, step = next, "Field accepted");
                        StepOutcome::Advanced { key }
                    }
                    None => {
                        self.move_to(FlowMode::Review);
                        self.transcript.push_system(prompts::COMPLETED);
                        info!(field = %key, "All fields collected, entering review");
                        StepOutcome::Completed { key }
                    }
                }
            }
            _ => {
                self.move_to(FlowMode::Review);
                self.transcript.push_system(prompts::UPDATED);
                info!(field = %key, "Field edited, back to review");
                StepOutcome::Edited { key }
            }
        };
        Ok(outcome)
    }

    pub fn submit_text(&mut self, text: &str) -> Result<StepOutcome, FlowError> {
        self.submit(Submission::Text(text.to_string()))
    }

    /// Deliver a file from the picker for `key`.
    ///
    /// The key must be the field currently awaited; a result arriving after
    /// the flow has moved on is refused without touching the state.
    pub fn complete_file_selection(
        &mut self,
        key: FieldKey,
        file: FileReference,
    ) -> Result<StepOutcome, FlowError> {
        match self.awaiting().map(|f| f.key) {
            Some(awaited) if awaited == key => self.submit(Submission::File(file)),
            awaited => {
                warn!(field = %key, mode = %self.state.mode, "File selection for a field that is not awaited");
                Err(FlowError::FieldNotAwaited {
                    expected: awaited
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| self.state.mode.name().to_string()),
                    got: key,
                })
            }
        }
    }

    /// Leave review and show the edit menu.
    pub fn begin_edit(&mut self) -> Result<(), FlowError> {
        if !self.state.mode.is_review() {
            return Err(FlowError::InvalidOperation {
                operation: "begin editing",
                mode: self.state.mode,
            });
        }
        self.move_to(FlowMode::Editing { key: None });
        self.state.last_error = None;
        self.transcript.push_system(prompts::edit_menu_prompt());
        info!("Edit menu opened");
        Ok(())
    }

    /// Pick the field to re-collect and prompt for it.
    pub fn select_edit_field(&mut self, key: FieldKey) -> Result<(), FlowError> {
        if self.state.mode != (FlowMode::Editing { key: None }) {
            return Err(FlowError::InvalidOperation {
                operation: "select a field to edit",
                mode: self.state.mode,
            });
        }
        let Some(prompt) = self.schema.find(key).map(|f| f.edit_prompt.clone()) else {
            return Err(FlowError::UnknownField(key.to_string()));
        };
        self.move_to(FlowMode::Editing { key: Some(key) });
        self.state.last_error = None;
        self.transcript.push_system(prompt);
        info!(field = %key, "Editing field");
        Ok(())
    }

    /// Pick the field to edit from a typed menu answer.
    ///
    /// An answer that names no field appends the "invalid option" message
    /// and returns `Ok(None)`.
    pub fn select_edit_option(&mut self, input: &str) -> Result<Option<FieldKey>, FlowError> {
        if self.state.mode != (FlowMode::Editing { key: None }) {
            return Err(FlowError::InvalidOperation {
                operation: "select a field to edit",
                mode: self.state.mode,
            });
        }
        match prompts::parse_edit_choice(input).filter(|k| self.schema.find(*k).is_some()) {
            Some(key) => {
                self.select_edit_field(key)?;
                Ok(Some(key))
            }
            None => {
                debug!(input = %input, "Invalid edit option");
                self.reject(prompts::invalid_edit_option());
                Ok(None)
            }
        }
    }

    /// Clear every answer and the transcript and start again at the first field.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.record.clear();
        self.transcript.clear();
        self.transcript.push_system(self.schema.first().prompt.clone());
        self.generation += 1;
        info!(generation = self.generation, "Onboarding flow reset");
    }

    /// The answers to hand to the save capability. Only available in review.
    pub fn save_snapshot(&self) -> Result<FormRecord, FlowError> {
        if !self.state.mode.is_review() {
            return Err(FlowError::InvalidOperation {
                operation: "save",
                mode: self.state.mode,
            });
        }
        Ok(self.record.clone())
    }

    /// Acknowledge the outcome of a save in the transcript. The state is unchanged.
    pub fn note_save_result(&mut self, saved: bool) {
        if saved {
            self.transcript.push_system(prompts::SAVED);
        } else {
            self.transcript.push_system(prompts::SAVE_FAILED);
        }
    }

    /// Route one line of chat text.
    ///
    /// The reset sentinel restarts the flow from any mode. In review the text
    /// is read as a button press, in the edit menu as a menu choice, and
    /// otherwise it is submitted as an answer.
    pub fn handle_text(&mut self, text: &str) -> Result<TextAction, FlowError> {
        let trimmed = text.trim();
        let mode = self.state.mode;
        let start_over = trimmed == self.reset_sentinel
            || (mode == (FlowMode::Editing { key: None }) && trimmed == "1");
        if start_over {
            self.reset();
            return Ok(TextAction::Reset);
        }

        match mode {
            FlowMode::Review | FlowMode::Editing { key: None } if trimmed.is_empty() => {
                self.reject(prompts::FILL_THE_FIELD.to_string());
                Ok(TextAction::Corrected(prompts::FILL_THE_FIELD.to_string()))
            }
            FlowMode::Review => {
                self.transcript
                    .push_user(EntryContent::Text(text.to_string()));
                if trimmed.eq_ignore_ascii_case(prompts::EDIT_INFORMATION)
                    || trimmed.eq_ignore_ascii_case("edit")
                {
                    self.begin_edit()?;
                    Ok(TextAction::EditStarted)
                } else if trimmed.eq_ignore_ascii_case(prompts::SAVE_INFORMATION)
                    || trimmed.eq_ignore_ascii_case("save")
                {
                    Ok(TextAction::SaveRequested)
                } else {
                    self.reject(prompts::REVIEW_CHOICE.to_string());
                    Ok(TextAction::Corrected(prompts::REVIEW_CHOICE.to_string()))
                }
            }
            FlowMode::Editing { key: None } => {
                self.transcript
                    .push_user(EntryContent::Text(text.to_string()));
                match self.select_edit_option(trimmed)? {
                    Some(key) => Ok(TextAction::EditFieldSelected(key)),
                    None => Ok(TextAction::Corrected(prompts::invalid_edit_option())),
                }
            }
            _ => Ok(TextAction::Step(self.submit_text(text)?)),
        }
    }

    /// What the host should render as the input control.
    pub fn affordance(&self) -> Affordance {
        match self.state.mode {
            FlowMode::Review => Affordance::Review {
                summary: self.record.to_review_summary(),
                actions: vec![
                    prompts::EDIT_INFORMATION.to_string(),
                    prompts::SAVE_INFORMATION.to_string(),
                ],
            },
            FlowMode::Editing { key: None } => Affordance::EditMenu {
                options: prompts::edit_menu_options()
                    .into_iter()
                    .filter(|o| o.key.is_none_or(|k| self.schema.find(k).is_some()))
                    .collect(),
            },
            mode => match self.awaiting() {
                Some(spec) => match &spec.kind {
                    FieldKind::Text => Affordance::Text {
                        placeholder: match mode {
                            FlowMode::Editing { key: Some(key) } => format!("Update {key}"),
                            _ => "Type your response...".to_string(),
                        },
                    },
                    FieldKind::Choice(options) => Affordance::Choice {
                        options: options.clone(),
                    },
                    FieldKind::File(filter) => Affordance::Upload {
                        field: spec.key,
                        filter: *filter,
                        label: prompts::upload_label(*filter).to_string(),
                    },
                },
                None => Affordance::Text {
                    placeholder: "Type your response...".to_string(),
                },
            },
        }
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state.clone(),
            current_step_index: self.current_step_index(),
            total_steps: self.schema.len(),
            editing_key: self.state.editing_key(),
            affordance: self.affordance(),
            record: self.record.clone(),
            transcript: self.transcript.entries().to_vec(),
        }
    }

    fn reject(&mut self, message: String) -> StepOutcome {
        self.transcript.push_system(message.clone());
        self.state.last_error = Some(message.clone());
        StepOutcome::Rejected { message }
    }

    fn move_to(&mut self, target: FlowMode) {
        if let Err(e) = self.state.transition(target) {
            warn!("{}", e);
        }
    }
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new(FieldSchema::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::transcript::Origin;

    fn photo() -> FileReference {
        FileReference::new("file:///sdcard/DCIM/me.jpg")
    }

    fn resume() -> FileReference {
        FileReference::new("file:///sdcard/Download/resume.pdf")
    }

    fn system_entries(flow: &OnboardingFlow) -> usize {
        flow.transcript()
            .entries()
            .iter()
            .filter(|e| e.origin == Origin::System)
            .count()
    }

    /// Walk a fresh flow through every field into review.
    fn completed_flow() -> OnboardingFlow {
        let mut flow = OnboardingFlow::default();
        for answer in ["Bob", "B.Tech", "9876543210", "I like Rust", "Rust, Go"] {
            assert!(flow.submit_text(answer).unwrap().is_accepted(), "{answer}");
        }
        flow.complete_file_selection(FieldKey::ProfilePhoto, photo())
            .unwrap();
        flow.complete_file_selection(FieldKey::Document, resume())
            .unwrap();
        assert_eq!(flow.mode(), FlowMode::Review);
        flow
    }

    #[test]
    fn new_flow_prompts_for_name() {
        let flow = OnboardingFlow::default();
        assert_eq!(flow.current_step_index(), 0);
        assert_eq!(flow.mode(), FlowMode::Collecting { step: 0 });
        assert_eq!(flow.transcript().len(), 1);
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Welcome! Please tell me your name."
        );
    }

    #[test]
    fn empty_input_is_rejected_without_state_change() {
        let mut flow = OnboardingFlow::default();
        for input in ["", "   ", "\t\n"] {
            let before_len = flow.transcript().len();
            let before_system = system_entries(&flow);
            let outcome = flow.submit_text(input).unwrap();
            assert_eq!(
                outcome,
                StepOutcome::Rejected {
                    message: "Please fill the field.".into()
                }
            );
            assert_eq!(flow.current_step_index(), 0);
            assert_eq!(flow.mode(), FlowMode::Collecting { step: 0 });
            assert!(flow.record().is_empty());
            assert_eq!(flow.transcript().len(), before_len + 1);
            assert_eq!(system_entries(&flow), before_system + 1);
        }
    }

    #[test]
    fn phone_validation_gate() {
        let mut flow = OnboardingFlow::default();
        flow.submit_text("Bob").unwrap();
        flow.submit_text("B.E").unwrap();
        assert_eq!(flow.current_step_index(), 2);

        let system_before = system_entries(&flow);
        let outcome = flow.submit_text("12345").unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(flow.current_step_index(), 2);
        assert!(flow.record().text(FieldKey::Phone).is_none());
        assert_eq!(system_entries(&flow), system_before + 1);
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Please enter a valid 10-digit phone number."
        );
        assert_eq!(
            flow.state().last_error.as_deref(),
            Some("Please enter a valid 10-digit phone number.")
        );

        let outcome = flow.submit_text("9876543210").unwrap();
        assert_eq!(outcome, StepOutcome::Advanced { key: FieldKey::Phone });
        assert_eq!(flow.current_step_index(), 3);
        assert_eq!(flow.record().text(FieldKey::Phone), Some("9876543210"));
        assert!(flow.state().last_error.is_none());
    }

    #[test]
    fn qualification_choice_is_exact() {
        let mut flow = OnboardingFlow::default();
        flow.submit_text("Bob").unwrap();

        assert!(!flow.submit_text("btech").unwrap().is_accepted());
        assert_eq!(flow.current_step_index(), 1);

        assert!(flow.submit_text("B.Tech").unwrap().is_accepted());
        assert_eq!(flow.record().text(FieldKey::Qualification), Some("B.Tech"));
        assert_eq!(flow.current_step_index(), 2);
    }

    #[test]
    fn name_must_be_letters() {
        let mut flow = OnboardingFlow::default();
        let outcome = flow.submit_text("R2D2").unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Rejected {
                message: "Name must contain only letters.".into()
            }
        );
        // The rejected answer still shows in the chat.
        let entries = flow.transcript().entries();
        assert_eq!(entries[entries.len() - 2].origin, Origin::User);
        assert_eq!(entries[entries.len() - 2].text(), "R2D2");
    }

    #[test]
    fn upload_steps_reject_free_text() {
        let mut flow = OnboardingFlow::default();
        for answer in ["Bob", "B.Tech", "9876543210", "about", "skills"] {
            flow.submit_text(answer).unwrap();
        }
        assert_eq!(flow.current_step_index(), 5);
        let outcome = flow.submit_text("me.jpg").unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(flow.current_step_index(), 5);
        assert!(flow.record().file(FieldKey::ProfilePhoto).is_none());
    }

    #[test]
    fn upload_rejects_wrong_file_type() {
        let mut flow = OnboardingFlow::default();
        for answer in ["Bob", "B.Tech", "9876543210", "about", "skills"] {
            flow.submit_text(answer).unwrap();
        }
        let outcome = flow
            .complete_file_selection(FieldKey::ProfilePhoto, resume())
            .unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(flow.current_step_index(), 5);
    }

    #[test]
    fn stale_file_selection_is_refused() {
        let mut flow = OnboardingFlow::default();
        let before = flow.transcript().len();
        let err = flow
            .complete_file_selection(FieldKey::Document, resume())
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::FieldNotAwaited {
                expected: "name".into(),
                got: FieldKey::Document
            }
        );
        assert_eq!(flow.transcript().len(), before);
        assert_eq!(flow.current_step_index(), 0);
    }

    #[test]
    fn full_walk_reaches_review() {
        let flow = completed_flow();
        let record = flow.record();
        assert_eq!(record.len(), 7);
        assert_eq!(record.text(FieldKey::Name), Some("Bob"));
        assert_eq!(record.text(FieldKey::Qualification), Some("B.Tech"));
        assert_eq!(record.text(FieldKey::Phone), Some("9876543210"));
        assert_eq!(record.text(FieldKey::About), Some("I like Rust"));
        assert_eq!(record.text(FieldKey::Skills), Some("Rust, Go"));
        assert_eq!(record.file(FieldKey::ProfilePhoto), Some(&photo()));
        assert_eq!(record.file(FieldKey::Document), Some(&resume()));
        assert_eq!(flow.current_step_index(), 7);
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Thank you! You can now review and save your information."
        );
        assert!(matches!(flow.affordance(), Affordance::Review { .. }));
    }

    #[test]
    fn edit_returns_directly_to_review() {
        let mut flow = completed_flow();
        flow.begin_edit().unwrap();
        assert_eq!(flow.mode(), FlowMode::Editing { key: None });

        flow.select_edit_field(FieldKey::Name).unwrap();
        assert_eq!(flow.state().editing_key(), Some(FieldKey::Name));
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Please enter your new name:"
        );

        let outcome = flow.submit_text("Alice").unwrap();
        assert_eq!(outcome, StepOutcome::Edited { key: FieldKey::Name });
        assert_eq!(flow.mode(), FlowMode::Review);
        assert_eq!(flow.state().editing_key(), None);
        assert_eq!(flow.record().text(FieldKey::Name), Some("Alice"));
        // Later answers are untouched and not re-prompted.
        assert_eq!(flow.record().text(FieldKey::Qualification), Some("B.Tech"));
        assert!(
            !flow
                .transcript()
                .entries()
                .iter()
                .rev()
                .take(3)
                .any(|e| e.text() == "What is your qualification?")
        );
    }

    #[test]
    fn invalid_edit_answer_stays_in_editing() {
        let mut flow = completed_flow();
        flow.begin_edit().unwrap();
        flow.select_edit_field(FieldKey::Phone).unwrap();
        assert!(!flow.submit_text("123").unwrap().is_accepted());
        assert_eq!(
            flow.mode(),
            FlowMode::Editing {
                key: Some(FieldKey::Phone)
            }
        );
        assert_eq!(flow.record().text(FieldKey::Phone), Some("9876543210"));
    }

    #[test]
    fn edit_file_field() {
        let mut flow = completed_flow();
        flow.begin_edit().unwrap();
        flow.select_edit_field(FieldKey::ProfilePhoto).unwrap();
        let new_photo = FileReference::new("content://media/7").with_mime("image/png");
        let outcome = flow
            .complete_file_selection(FieldKey::ProfilePhoto, new_photo.clone())
            .unwrap();
        assert_eq!(outcome, StepOutcome::Edited { key: FieldKey::ProfilePhoto });
        assert_eq!(flow.record().file(FieldKey::ProfilePhoto), Some(&new_photo));
    }

    #[test]
    fn operations_outside_their_mode_are_refused() {
        let mut flow = OnboardingFlow::default();
        assert!(matches!(
            flow.begin_edit(),
            Err(FlowError::InvalidOperation { .. })
        ));
        assert!(flow.select_edit_field(FieldKey::Name).is_err());
        assert!(flow.save_snapshot().is_err());

        let mut flow = completed_flow();
        let before = flow.transcript().len();
        assert!(flow.submit_text("hello").is_err());
        assert!(flow.select_edit_field(FieldKey::Name).is_err());
        assert_eq!(flow.transcript().len(), before);

        flow.begin_edit().unwrap();
        assert!(flow.begin_edit().is_err());
        assert!(flow.submit_text("Alice").is_err());
    }

    #[test]
    fn reset_clears_everything() {
        let mut flow = completed_flow();
        flow.begin_edit().unwrap();
        flow.reset();
        assert!(flow.record().is_empty());
        assert_eq!(flow.current_step_index(), 0);
        assert_eq!(flow.mode(), FlowMode::Collecting { step: 0 });
        assert_eq!(flow.transcript().len(), 1);
        assert_eq!(flow.transcript().entries()[0].origin, Origin::System);
        assert!(flow.state().last_error.is_none());
    }

    #[test]
    fn reset_starts_a_new_generation() {
        let mut flow = OnboardingFlow::default();
        assert_eq!(flow.generation(), 0);
        flow.submit_text("Alice").unwrap();
        assert_eq!(flow.generation(), 0);
        flow.reset();
        flow.reset();
        assert_eq!(flow.generation(), 2);
    }

    #[test]
    fn handle_text_routes_review_buttons() {
        let mut flow = completed_flow();
        assert_eq!(
            flow.handle_text("Save Information").unwrap(),
            TextAction::SaveRequested
        );
        assert_eq!(flow.mode(), FlowMode::Review);

        assert!(matches!(
            flow.handle_text("maybe").unwrap(),
            TextAction::Corrected(_)
        ));
        assert_eq!(flow.mode(), FlowMode::Review);

        assert_eq!(
            flow.handle_text("Edit Information").unwrap(),
            TextAction::EditStarted
        );
        assert_eq!(
            flow.handle_text("4").unwrap(),
            TextAction::EditFieldSelected(FieldKey::Phone)
        );
        assert_eq!(
            flow.handle_text("1234567890").unwrap(),
            TextAction::Step(StepOutcome::Edited { key: FieldKey::Phone })
        );
        assert_eq!(flow.record().text(FieldKey::Phone), Some("1234567890"));
    }

    #[test]
    fn handle_text_invalid_menu_option() {
        let mut flow = completed_flow();
        flow.begin_edit().unwrap();
        let action = flow.handle_text("42").unwrap();
        assert_eq!(
            action,
            TextAction::Corrected("Invalid option. Please choose a number from 1 to 8.".into())
        );
        assert_eq!(flow.mode(), FlowMode::Editing { key: None });
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Invalid option. Please choose a number from 1 to 8."
        );
    }

    #[test]
    fn handle_text_sentinel_resets() {
        let mut flow = OnboardingFlow::default();
        flow.handle_text("Bob").unwrap();
        assert_eq!(flow.handle_text("1").unwrap(), TextAction::Reset);
        assert!(flow.record().is_empty());
        assert_eq!(flow.transcript().len(), 1);
    }

    #[test]
    fn menu_start_over_resets_with_custom_sentinel() {
        let mut flow = completed_flow().with_reset_sentinel("/restart");
        flow.begin_edit().unwrap();
        assert_eq!(flow.handle_text("1").unwrap(), TextAction::Reset);
        assert_eq!(flow.mode(), FlowMode::Collecting { step: 0 });

        flow.handle_text("Bob").unwrap();
        assert_eq!(flow.handle_text("/restart").unwrap(), TextAction::Reset);
        assert!(flow.record().is_empty());
    }

    #[test]
    fn affordance_follows_the_step() {
        let mut flow = OnboardingFlow::default();
        assert!(matches!(flow.affordance(), Affordance::Text { .. }));
        flow.submit_text("Bob").unwrap();
        match flow.affordance() {
            Affordance::Choice { options } => assert_eq!(options[0], "B.Tech"),
            other => panic!("expected choice, got {other:?}"),
        }
        for answer in ["B.Tech", "9876543210", "about", "skills"] {
            flow.submit_text(answer).unwrap();
        }
        assert_eq!(
            flow.affordance(),
            Affordance::Upload {
                field: FieldKey::ProfilePhoto,
                filter: FileFilter::Image,
                label: "Upload Profile Photo".into()
            }
        );
    }

    #[test]
    fn save_snapshot_and_acknowledgement() {
        let mut flow = completed_flow();
        let record = flow.save_snapshot().unwrap();
        assert_eq!(&record, flow.record());
        flow.note_save_result(true);
        assert_eq!(flow.mode(), FlowMode::Review);
        assert_eq!(
            flow.transcript().last().unwrap().text(),
            "Your details are saved successfully."
        );
    }

    #[test]
    fn snapshot_serializes_for_hosts() {
        let flow = OnboardingFlow::default();
        let json = serde_json::to_value(flow.snapshot()).unwrap();
        assert_eq!(json["state"]["mode"], "collecting");
        assert_eq!(json["state"]["step"], 0);
        assert_eq!(json["current_step_index"], 0);
        assert_eq!(json["total_steps"], 7);
        assert_eq!(json["affordance"]["type"], "text");
        assert_eq!(json["transcript"][0]["origin"], "system");
    }
}
