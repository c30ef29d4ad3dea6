//! OnboardingManager — owns the flow for a hosting view, publishes snapshots
//! after every change, and drives the file picker and profile store.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info, warn};

use crate::error::{Error, FlowError};
use crate::picker::{FilePicker, PickOutcome};
use crate::store::{ProfileStore, SavedProfile};

use super::field::{FieldKey, FieldKind};
use super::flow::{FlowSnapshot, OnboardingFlow, StepOutcome, TextAction};
use super::model::{FileReference, FormRecord};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Event pushed to subscribers (WebSocket clients, the terminal).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    Snapshot { snapshot: FlowSnapshot },
}

/// How an upload request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The picker returned a file and the flow judged it.
    Completed(StepOutcome),
    /// The user dismissed the picker. Nothing changed.
    Cancelled,
    /// The picker failed. Nothing changed; the user can try again.
    Failed(String),
}

/// Coordinates one onboarding session for its hosts.
pub struct OnboardingManager {
    flow: RwLock<OnboardingFlow>,
    store: Arc<dyn ProfileStore>,
    tx: broadcast::Sender<FlowEvent>,
}

impl OnboardingManager {
    pub fn new(flow: OnboardingFlow, store: Arc<dyn ProfileStore>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            flow: RwLock::new(flow),
            store,
            tx,
        })
    }

    /// Subscribe to snapshots published after each change.
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.tx.subscribe()
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.flow.read().await.snapshot()
    }

    /// Current answers, for the review screen or an external save.
    pub async fn profile(&self) -> FormRecord {
        self.flow.read().await.record().clone()
    }

    /// The last profile the store accepted.
    pub async fn latest_saved(&self) -> Result<Option<SavedProfile>, Error> {
        Ok(self.store.latest().await?)
    }

    /// Route one line of chat text. A save request is carried out here; if
    /// the store refuses it the failure is noted in the transcript and the
    /// store error is returned.
    pub async fn handle_text(&self, text: &str) -> Result<TextAction, Error> {
        let action = {
            let mut flow = self.flow.write().await;
            let action = flow.handle_text(text);
            self.publish(&flow);
            action?
        };

        if action == TextAction::SaveRequested {
            self.save().await?;
        }
        Ok(action)
    }

    pub async fn submit_text(&self, text: &str) -> Result<StepOutcome, FlowError> {
        self.mutate(|flow| flow.submit_text(text)).await
    }

    pub async fn begin_edit(&self) -> Result<(), FlowError> {
        self.mutate(|flow| flow.begin_edit()).await
    }

    pub async fn select_edit_field(&self, key: FieldKey) -> Result<(), FlowError> {
        self.mutate(|flow| flow.select_edit_field(key)).await
    }

    pub async fn reset(&self) {
        self.mutate(|flow| {
            flow.reset();
        })
        .await
    }

    pub async fn complete_file_selection(
        &self,
        key: FieldKey,
        file: FileReference,
    ) -> Result<StepOutcome, FlowError> {
        self.mutate(|flow| flow.complete_file_selection(key, file))
            .await
    }

    /// Ask `picker` for a file for `key` and apply the result.
    ///
    /// The lock is released while the picker runs, so a slow or abandoned
    /// pick never blocks other operations. A file arriving after the flow
    /// has moved on is refused by [`OnboardingFlow::complete_file_selection`].
    pub async fn upload(
        &self,
        key: FieldKey,
        picker: &dyn FilePicker,
    ) -> Result<UploadOutcome, FlowError> {
        let filter = {
            let flow = self.flow.read().await;
            match flow.awaiting() {
                Some(spec) if spec.key == key => match spec.kind {
                    FieldKind::File(filter) => filter,
                    _ => {
                        return Err(FlowError::InvalidOperation {
                            operation: "upload a file",
                            mode: flow.mode(),
                        });
                    }
                },
                awaited => {
                    return Err(FlowError::FieldNotAwaited {
                        expected: awaited
                            .map(|s| s.key.to_string())
                            .unwrap_or_else(|| flow.mode().name().to_string()),
                        got: key,
                    });
                }
            }
        };

        debug!(field = %key, picker = picker.name(), %filter, "Requesting file");
        match picker.pick(filter).await {
            Ok(PickOutcome::Picked(file)) => {
                let outcome = self.complete_file_selection(key, file).await?;
                Ok(UploadOutcome::Completed(outcome))
            }
            Ok(PickOutcome::Cancelled) => {
                debug!(field = %key, "File selection cancelled");
                Ok(UploadOutcome::Cancelled)
            }
            Err(e) => {
                error!(field = %key, picker = picker.name(), "File selection failed: {}", e);
                Ok(UploadOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Hand the answers to the profile store. Only valid in review.
    ///
    /// The session state does not change; the transcript records whether the
    /// save went through. The store runs without the lock held, so the note is
    /// only added if the session was not reset and is still in review.
    pub async fn save(&self) -> Result<SavedProfile, Error> {
        let (record, generation) = {
            let flow = self.flow.read().await;
            (flow.save_snapshot()?, flow.generation())
        };

        let result = self.store.save(&record).await;
        match &result {
            Ok(profile) => info!(profile_id = %profile.id, "Onboarding information saved"),
            Err(e) => warn!("Failed to save onboarding information: {}", e),
        }

        let mut flow = self.flow.write().await;
        if flow.generation() == generation && flow.mode().is_review() {
            flow.note_save_result(result.is_ok());
            self.publish(&flow);
        } else {
            debug!(
                generation,
                current = flow.generation(),
                "Session moved on during save, not noting result"
            );
        }
        Ok(result?)
    }

    async fn mutate<T>(&self, op: impl FnOnce(&mut OnboardingFlow) -> T) -> T {
        let mut flow = self.flow.write().await;
        let result = op(&mut flow);
        self.publish(&flow);
        result
    }

    fn publish(&self, flow: &OnboardingFlow) {
        if self.tx.receiver_count() == 0 {
            return;
        }
        // Ok if every receiver dropped in the meantime
        let _ = self.tx.send(FlowEvent::Snapshot {
            snapshot: flow.snapshot(),
        });
    }
}
