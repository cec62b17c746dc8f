//! In-process store for wizard drafts.
//!
//! Drafts belong to the user that started them; another user's draft is
//! reported as not found. Drafts idle for longer than the TTL are dropped
//! the next time the store is touched, including drafts whose submit never
//! settled. Each owner may hold a limited number of live drafts.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::error::WizardError;
use super::models::ReportDraft;
use crate::core::error::{AppError, Result};
use crate::shared::constants::MAX_DRAFTS_PER_OWNER;

pub struct DraftStore {
    drafts: RwLock<HashMap<Uuid, ReportDraft>>,
    ttl: Duration,
}

impl DraftStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, draft: &ReportDraft) -> bool {
        let idle = Utc::now().signed_duration_since(draft.updated_at);
        idle.to_std().map(|idle| idle > self.ttl).unwrap_or(false)
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Draft {} not found", id))
    }

    async fn sweep(&self) {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, draft| !self.is_expired(draft));
        let removed = before - drafts.len();
        if removed > 0 {
            debug!("Swept {} expired drafts", removed);
        }
    }

    /// Store a new draft, refusing it when the owner already holds
    /// `MAX_DRAFTS_PER_OWNER` live drafts
    pub async fn insert(&self, draft: ReportDraft) -> Result<ReportDraft> {
        self.sweep().await;

        let mut drafts = self.drafts.write().await;
        let open = drafts.values().filter(|d| d.owner == draft.owner).count();
        if open >= MAX_DRAFTS_PER_OWNER {
            return Err(WizardError::TooManyDrafts {
                max: MAX_DRAFTS_PER_OWNER,
            }
            .into());
        }

        drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    /// Snapshot of a draft owned by `owner`
    pub async fn get(&self, owner: &str, id: Uuid) -> Result<ReportDraft> {
        let drafts = self.drafts.read().await;
        drafts
            .get(&id)
            .filter(|d| d.owner == owner && !self.is_expired(d))
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn remove(&self, owner: &str, id: Uuid) -> Result<()> {
        let mut drafts = self.drafts.write().await;
        match drafts.get(&id) {
            Some(d) if d.owner == owner && self.is_expired(d) => {
                drafts.remove(&id);
                Err(Self::not_found(id))
            }
            Some(d) if d.owner == owner && d.submitting => {
                Err(WizardError::SubmissionInProgress.into())
            }
            Some(d) if d.owner == owner => {
                drafts.remove(&id);
                Ok(())
            }
            _ => Err(Self::not_found(id)),
        }
    }

    /// Apply `f` to the owner's draft under the write lock.
    /// The draft is left untouched when `f` fails.
    pub async fn update<T, F>(&self, owner: &str, id: Uuid, f: F) -> Result<(ReportDraft, T)>
    where
        F: FnOnce(&mut ReportDraft) -> std::result::Result<T, WizardError>,
    {
        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .get_mut(&id)
            .filter(|d| d.owner == owner && !self.is_expired(d))
            .ok_or_else(|| Self::not_found(id))?;

        let mut working = draft.clone();
        let value = f(&mut working)?;
        *draft = working;
        Ok((draft.clone(), value))
    }

    /// Like `update`, but a failing `f` still keeps its side effects on the
    /// draft (used for recording `last_error`).
    pub async fn update_recording<T, F>(
        &self,
        owner: &str,
        id: Uuid,
        f: F,
    ) -> Result<(ReportDraft, std::result::Result<T, WizardError>)>
    where
        F: FnOnce(&mut ReportDraft) -> std::result::Result<T, WizardError>,
    {
        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .get_mut(&id)
            .filter(|d| d.owner == owner && !self.is_expired(d))
            .ok_or_else(|| Self::not_found(id))?;

        let outcome = f(draft);
        Ok((draft.clone(), outcome))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::submissions::models::WizardStep;

    #[tokio::test]
    async fn test_drafts_are_isolated_per_owner() {
        let store = DraftStore::new(Duration::from_secs(60));
        let draft = store.insert(ReportDraft::new("alice")).await.unwrap();

        assert!(store.get("alice", draft.id).await.is_ok());
        assert!(matches!(
            store.get("bob", draft.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.remove("bob", draft.id).await.is_err());
        assert!(store.remove("alice", draft.id).await.is_ok());
        assert!(store.get("alice", draft.id).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_draft_unchanged() {
        let store = DraftStore::new(Duration::from_secs(60));
        let draft = store.insert(ReportDraft::new("alice")).await.unwrap();

        let result = store.update("alice", draft.id, |d| d.advance()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let current = store.get("alice", draft.id).await.unwrap();
        assert_eq!(current.step, WizardStep::CategorySelect);
    }

    #[tokio::test]
    async fn test_expired_drafts_are_not_found_and_swept() {
        let store = DraftStore::new(Duration::from_secs(60));
        let mut stale = ReportDraft::new("alice");
        stale.updated_at = Utc::now() - chrono::Duration::seconds(120);
        let stale = store.insert(stale).await.unwrap();

        assert!(store.get("alice", stale.id).await.is_err());
        assert!(store.update("alice", stale.id, |d| d.back()).await.is_err());

        store.insert(ReportDraft::new("bob")).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_stale_submitting_draft_expires() {
        let store = DraftStore::new(Duration::from_secs(60));
        let mut stuck = ReportDraft::new("alice");
        stuck.submitting = true;
        stuck.updated_at = Utc::now() - chrono::Duration::seconds(120);
        let stuck = store.insert(stuck).await.unwrap();

        assert!(store.get("alice", stuck.id).await.is_err());
        assert!(matches!(
            store.remove("alice", stuck.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_live_drafts_per_owner_are_capped() {
        let store = DraftStore::new(Duration::from_secs(60));
        let mut ids = Vec::new();
        for _ in 0..MAX_DRAFTS_PER_OWNER {
            ids.push(store.insert(ReportDraft::new("alice")).await.unwrap().id);
        }

        let err = store.insert(ReportDraft::new("alice")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // other owners are unaffected
        assert!(store.insert(ReportDraft::new("bob")).await.is_ok());

        // discarding one frees a slot
        store.remove("alice", ids[0]).await.unwrap();
        assert!(store.insert(ReportDraft::new("alice")).await.is_ok());
        assert_eq!(store.len().await, MAX_DRAFTS_PER_OWNER + 1);
    }
}
