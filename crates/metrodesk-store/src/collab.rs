//! Collaborative draft store with append-only version history.
//!
//! Every save appends a [`VersionSnapshot`] numbered `previous + 1`; the live
//! draft always reflects the highest snapshot. Restore re-applies historical
//! content through the same append path, so the version sequence only ever
//! grows and no past snapshot is mutated or deleted.
//!
//! Saves on one draft serialize on the store's write lock. Version numbers
//! therefore cannot collide; if the history ever disagrees with the live
//! version counter, the store fails loudly with `ConcurrentConflict` instead
//! of writing a corrupt sequence.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use metrodesk_core::{
    CollabDoc, CollabDocStatus, Error, EventBus, Result, SessionEvent, VersionSnapshot,
};

struct DraftEntry {
    doc: CollabDoc,
    /// Snapshots 1..=doc.version, index = version - 1.
    history: Vec<VersionSnapshot>,
}

/// Repository for collaborative drafts and their version history.
#[derive(Clone)]
pub struct CollabRepository {
    inner: Arc<RwLock<HashMap<Uuid, DraftEntry>>>,
    bus: Arc<EventBus>,
}

impl CollabRepository {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            bus,
        }
    }

    /// Create a new draft at version 1 with its initial snapshot recorded.
    ///
    /// Duplicate collaborator names are dropped, first occurrence wins.
    pub async fn create(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        collaborators: Vec<String>,
    ) -> CollabDoc {
        let content = content.into();
        let now = Utc::now();

        let mut unique = Vec::new();
        for name in collaborators {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let doc = CollabDoc {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.clone(),
            collaborators: unique,
            last_modified: now,
            version: 1,
            status: CollabDocStatus::Draft,
        };

        let entry = DraftEntry {
            doc: doc.clone(),
            history: vec![VersionSnapshot {
                version: 1,
                content,
                created_at: now,
            }],
        };

        let mut drafts = self.inner.write().await;
        drafts.insert(doc.id, entry);
        info!(draft_id = %doc.id, title = %doc.title, "draft created");
        doc
    }

    /// Snapshot of the live draft for the caller to edit locally.
    pub async fn open(&self, id: Uuid) -> Result<CollabDoc> {
        let drafts = self.inner.read().await;
        drafts
            .get(&id)
            .map(|e| e.doc.clone())
            .ok_or(Error::DraftNotFound(id))
    }

    /// Record new content as the next version and return its snapshot.
    pub async fn save(&self, id: Uuid, new_content: impl Into<String>) -> Result<VersionSnapshot> {
        let snapshot = {
            let mut drafts = self.inner.write().await;
            let entry = drafts.get_mut(&id).ok_or(Error::DraftNotFound(id))?;
            Self::append_version(entry, new_content.into())?
        };

        debug!(draft_id = %id, version = snapshot.version, "draft saved");
        self.bus.emit(SessionEvent::DraftSaved {
            draft_id: id,
            version: snapshot.version,
        });
        Ok(snapshot)
    }

    /// Version history, highest version first.
    pub async fn list_versions(&self, id: Uuid) -> Result<Vec<VersionSnapshot>> {
        let drafts = self.inner.read().await;
        let entry = drafts.get(&id).ok_or(Error::DraftNotFound(id))?;
        let mut versions = entry.history.clone();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    /// Fetch a single historical snapshot.
    pub async fn get_version(&self, id: Uuid, version: i32) -> Result<VersionSnapshot> {
        let drafts = self.inner.read().await;
        let entry = drafts.get(&id).ok_or(Error::DraftNotFound(id))?;
        entry
            .history
            .iter()
            .find(|s| s.version == version)
            .cloned()
            .ok_or(Error::VersionNotFound {
                draft_id: id,
                version,
            })
    }

    /// Re-apply a historical version's content as a new version.
    ///
    /// Restoring is an append, never a rollback: the sequence keeps growing
    /// and the restored-from snapshot stays untouched.
    pub async fn restore(&self, id: Uuid, version: i32) -> Result<CollabDoc> {
        let (doc, new_version) = {
            let mut drafts = self.inner.write().await;
            let entry = drafts.get_mut(&id).ok_or(Error::DraftNotFound(id))?;

            let content = entry
                .history
                .iter()
                .find(|s| s.version == version)
                .map(|s| s.content.clone())
                .ok_or(Error::VersionNotFound {
                    draft_id: id,
                    version,
                })?;

            let snapshot = Self::append_version(entry, content)?;
            (entry.doc.clone(), snapshot.version)
        };

        info!(draft_id = %id, from_version = version, new_version, "draft restored");
        self.bus.emit(SessionEvent::DraftRestored {
            draft_id: id,
            from_version: version,
            new_version,
        });
        Ok(doc)
    }

    /// Add a collaborator. Duplicates are rejected silently; returns whether
    /// the set changed.
    pub async fn add_collaborator(&self, id: Uuid, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        let mut drafts = self.inner.write().await;
        let entry = drafts.get_mut(&id).ok_or(Error::DraftNotFound(id))?;

        if entry.doc.collaborators.contains(&name) {
            return Ok(false);
        }
        entry.doc.collaborators.push(name);
        Ok(true)
    }

    /// Move a draft through its workflow phase (draft / review / published).
    pub async fn set_status(&self, id: Uuid, status: CollabDocStatus) -> Result<CollabDoc> {
        let mut drafts = self.inner.write().await;
        let entry = drafts.get_mut(&id).ok_or(Error::DraftNotFound(id))?;
        entry.doc.status = status;
        Ok(entry.doc.clone())
    }

    /// All drafts, most recently modified first.
    pub async fn list(&self) -> Vec<CollabDoc> {
        let drafts = self.inner.read().await;
        let mut docs: Vec<CollabDoc> = drafts.values().map(|e| e.doc.clone()).collect();
        docs.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        docs
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Append the next snapshot under an already-held write guard.
    fn append_version(entry: &mut DraftEntry, content: String) -> Result<VersionSnapshot> {
        // The history must hold exactly versions 1..=version. Anything else
        // means two writers raced past the lock, which is a contract
        // violation, not a state to paper over.
        if entry.history.len() as i32 != entry.doc.version {
            return Err(Error::ConcurrentConflict(format!(
                "draft {} history holds {} snapshots but live version is {}",
                entry.doc.id,
                entry.history.len(),
                entry.doc.version
            )));
        }

        let now = Utc::now();
        let snapshot = VersionSnapshot {
            version: entry.doc.version + 1,
            content: content.clone(),
            created_at: now,
        };

        entry.history.push(snapshot.clone());
        entry.doc.version = snapshot.version;
        entry.doc.content = content;
        entry.doc.last_modified = now;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus() -> Arc<EventBus> {
        Arc::new(EventBus::new(32))
    }

    #[tokio::test]
    async fn test_create_starts_at_version_one() {
        let repo = CollabRepository::new(bus());
        let doc = repo
            .create("Safety Protocol Update", "Initial draft...", vec![])
            .await;

        assert_eq!(doc.version, 1);
        assert_eq!(doc.status, CollabDocStatus::Draft);

        let versions = repo.list_versions(doc.id).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, 1);
        assert_eq!(versions[0].content, "Initial draft...");
    }

    #[tokio::test]
    async fn test_create_dedupes_collaborators() {
        let repo = CollabRepository::new(bus());
        let doc = repo
            .create(
                "Doc",
                "c",
                vec![
                    "Rajesh Kumar".to_string(),
                    "Priya Menon".to_string(),
                    "Rajesh Kumar".to_string(),
                ],
            )
            .await;
        assert_eq!(doc.collaborators, vec!["Rajesh Kumar", "Priya Menon"]);
    }

    #[tokio::test]
    async fn test_sequential_saves_are_gap_free() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "v1", vec![]).await;

        for i in 2..=6 {
            let snapshot = repo.save(doc.id, format!("v{}", i)).await.unwrap();
            assert_eq!(snapshot.version, i);
        }

        let versions = repo.list_versions(doc.id).await.unwrap();
        let numbers: Vec<i32> = versions.iter().map(|s| s.version).collect();
        assert_eq!(numbers, vec![6, 5, 4, 3, 2, 1]);

        let live = repo.open(doc.id).await.unwrap();
        assert_eq!(live.version, 6);
        assert_eq!(live.content, "v6");
    }

    #[tokio::test]
    async fn test_save_updates_last_modified() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "v1", vec![]).await;
        let created = doc.last_modified;

        repo.save(doc.id, "v2").await.unwrap();
        let live = repo.open(doc.id).await.unwrap();
        assert!(live.last_modified >= created);
    }

    #[tokio::test]
    async fn test_open_unknown_draft() {
        let repo = CollabRepository::new(bus());
        let err = repo.open(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::DraftNotFound(_)));
    }

    #[tokio::test]
    async fn test_restore_appends_rather_than_rewrites() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "original content", vec![]).await;
        repo.save(doc.id, "revised content").await.unwrap();

        let restored = repo.restore(doc.id, 1).await.unwrap();
        assert_eq!(restored.version, 3);
        assert_eq!(restored.content, "original content");

        let versions = repo.list_versions(doc.id).await.unwrap();
        let numbers: Vec<i32> = versions.iter().map(|s| s.version).collect();
        assert_eq!(numbers, vec![3, 2, 1]);

        // The restored-from snapshot is untouched
        let v1 = repo.get_version(doc.id, 1).await.unwrap();
        assert_eq!(v1.content, "original content");
        let v2 = repo.get_version(doc.id, 2).await.unwrap();
        assert_eq!(v2.content, "revised content");
        let v3 = repo.get_version(doc.id, 3).await.unwrap();
        assert_eq!(v3.content, v1.content);
    }

    #[tokio::test]
    async fn test_restore_unknown_version_is_distinct_error() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "c", vec![]).await;

        let err = repo.restore(doc.id, 9).await.unwrap_err();
        assert!(matches!(err, Error::VersionNotFound { version: 9, .. }));

        let err = repo.restore(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, Error::DraftNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_collaborator_set_semantics() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "c", vec!["Arjun Pillai".to_string()]).await;

        assert!(repo.add_collaborator(doc.id, "Kavitha Nair").await.unwrap());
        assert!(!repo.add_collaborator(doc.id, "Arjun Pillai").await.unwrap());
        assert!(!repo.add_collaborator(doc.id, "Kavitha Nair").await.unwrap());

        let live = repo.open(doc.id).await.unwrap();
        assert_eq!(live.collaborators, vec!["Arjun Pillai", "Kavitha Nair"]);
    }

    #[tokio::test]
    async fn test_set_status_workflow() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "c", vec![]).await;

        let doc = repo.set_status(doc.id, CollabDocStatus::Review).await.unwrap();
        assert_eq!(doc.status, CollabDocStatus::Review);
        let doc = repo
            .set_status(doc.id, CollabDocStatus::Published)
            .await
            .unwrap();
        assert_eq!(doc.status, CollabDocStatus::Published);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let repo = CollabRepository::new(bus());
        let a = repo.create("A", "c", vec![]).await;
        let b = repo.create("B", "c", vec![]).await;

        // Touch A so it becomes the most recently modified
        repo.save(a.id, "c2").await.unwrap();

        let docs = repo.list().await;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, a.id);
        assert_eq!(docs[1].id, b.id);
    }

    #[tokio::test]
    async fn test_save_emits_event() {
        let bus = bus();
        let mut rx = bus.subscribe();
        let repo = CollabRepository::new(bus);
        let doc = repo.create("Doc", "c", vec![]).await;
        repo.save(doc.id, "c2").await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::DraftSaved { version: 2, .. }));
    }

    #[tokio::test]
    async fn test_corrupted_history_surfaces_concurrent_conflict() {
        let repo = CollabRepository::new(bus());
        let doc = repo.create("Doc", "c", vec![]).await;

        // Force the invariant violation the lock normally makes impossible.
        repo.inner
            .write()
            .await
            .get_mut(&doc.id)
            .unwrap()
            .history
            .pop();

        let err = repo.save(doc.id, "c2").await.unwrap_err();
        assert!(matches!(err, Error::ConcurrentConflict(_)));
    }
}
