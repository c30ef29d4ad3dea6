//! In-memory `ProfileStore` — acknowledges saves and keeps them for the
//! lifetime of the process.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::traits::{ProfileStore, SavedProfile};
use crate::error::StoreError;
use crate::onboarding::field::FieldKey;
use crate::onboarding::model::FormRecord;

/// Keeps every saved profile in memory, oldest first.
pub struct MemoryProfileStore {
    saved: RwLock<Vec<SavedProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            saved: RwLock::new(Vec::new()),
        }
    }

    pub async fn count(&self) -> usize {
        self.saved.read().await.len()
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn save(&self, record: &FormRecord) -> Result<SavedProfile, StoreError> {
        if let Some(missing) = record.first_missing() {
            return Err(StoreError::Incomplete(missing));
        }

        let profile = SavedProfile::new(record.clone());
        info!(
            profile_id = %profile.id,
            name = record.text(FieldKey::Name).unwrap_or_default(),
            "Profile saved"
        );
        self.saved.write().await.push(profile.clone());
        Ok(profile)
    }

    async fn latest(&self) -> Result<Option<SavedProfile>, StoreError> {
        Ok(self.saved.read().await.last().cloned())
    }
}
