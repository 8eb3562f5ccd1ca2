use crate::domain::group::Group;
use crate::domain::ids::{GroupId, MemberId, PaymentId};
use crate::domain::ports::{Directory, DirectoryEntry, GroupEdit, GroupStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for groups.
///
/// Clones share the same underlying map and id sequences.
#[derive(Default, Clone)]
pub struct InMemoryGroupStore {
    groups: Arc<RwLock<HashMap<GroupId, Group>>>,
    group_seq: Arc<AtomicU64>,
    payment_seq: Arc<AtomicU64>,
}

impl InMemoryGroupStore {
    /// Creates a new, empty in-memory group store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn store(&self, group: Group) -> Result<()> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id, group);
        Ok(())
    }

    async fn get(&self, group_id: GroupId) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.get(&group_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.values().find(|group| group.name == name).cloned())
    }

    async fn modify(&self, group_id: GroupId, edit: GroupEdit) -> Result<Option<Group>> {
        let mut groups = self.groups.write().await;
        let Some(stored) = groups.get_mut(&group_id) else {
            return Ok(None);
        };

        let mut edited = stored.clone();
        edit(&mut edited)?;
        *stored = edited.clone();
        Ok(Some(edited))
    }

    async fn delete(&self, group_id: GroupId) -> Result<bool> {
        let mut groups = self.groups.write().await;
        Ok(groups.remove(&group_id).is_some())
    }

    async fn next_group_id(&self) -> Result<GroupId> {
        Ok(GroupId(self.group_seq.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn next_payment_id(&self) -> Result<PaymentId> {
        Ok(PaymentId(self.payment_seq.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// A fixed user directory held in memory.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    names: Arc<HashMap<MemberId, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (MemberId, S)>,
        S: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(id, name)| (id, name.into()))
            .collect();
        Self {
            names: Arc::new(names),
        }
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn lookup(&self, ids: &[MemberId]) -> Result<Vec<DirectoryEntry>> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.names.get(id).map(|name| DirectoryEntry {
                    id: *id,
                    name: name.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::{Currency, GroupDraft};
    use crate::error::LedgerError;

    fn group(id: u64, name: &str) -> Group {
        Group::new(
            GroupId(id),
            GroupDraft {
                name: name.to_string(),
                currency: Currency::Usd,
                members: vec![MemberId(1)],
            },
        )
    }

    #[tokio::test]
    async fn test_in_memory_group_store() {
        let store = InMemoryGroupStore::new();
        let trip = group(1, "Trip");

        store.store(trip.clone()).await.unwrap();
        assert_eq!(store.get(GroupId(1)).await.unwrap(), Some(trip.clone()));
        assert_eq!(store.find_by_name("Trip").await.unwrap(), Some(trip));
        assert!(store.get(GroupId(2)).await.unwrap().is_none());
        assert!(store.find_by_name("Flat").await.unwrap().is_none());

        assert!(store.delete(GroupId(1)).await.unwrap());
        assert!(!store.delete(GroupId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_modify_applies_edit_atomically() {
        let store = InMemoryGroupStore::new();
        store.store(group(1, "Trip")).await.unwrap();

        let edited = store
            .modify(
                GroupId(1),
                Box::new(|group: &mut Group| -> Result<()> {
                    group.members.push(MemberId(2));
                    Ok(())
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.members, vec![MemberId(1), MemberId(2)]);
        assert_eq!(store.get(GroupId(1)).await.unwrap(), Some(edited));

        let missing = store
            .modify(GroupId(9), Box::new(|_: &mut Group| -> Result<()> { Ok(()) }))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_failed_modify_leaves_group_untouched() {
        let store = InMemoryGroupStore::new();
        let trip = group(1, "Trip");
        store.store(trip.clone()).await.unwrap();

        let result = store
            .modify(
                GroupId(1),
                Box::new(|group: &mut Group| -> Result<()> {
                    group.name = "Renamed".to_string();
                    Err(LedgerError::InvalidRequest("rejected".to_string()))
                }),
            )
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
        assert_eq!(store.get(GroupId(1)).await.unwrap(), Some(trip));
    }

    #[tokio::test]
    async fn test_id_sequences_are_shared_between_clones() {
        let store = InMemoryGroupStore::new();
        let clone = store.clone();

        assert_eq!(store.next_group_id().await.unwrap(), GroupId(1));
        assert_eq!(clone.next_group_id().await.unwrap(), GroupId(2));
        assert_eq!(clone.next_payment_id().await.unwrap(), PaymentId(1));
        assert_eq!(store.next_payment_id().await.unwrap(), PaymentId(2));
    }

    #[tokio::test]
    async fn test_directory_omits_unknown_ids() {
        let directory = InMemoryDirectory::from_entries([(MemberId(1), "alice")]);
        let entries = directory.lookup(&[MemberId(1), MemberId(2)]).await.unwrap();
        assert_eq!(
            entries,
            vec![DirectoryEntry {
                id: MemberId(1),
                name: "alice".to_string()
            }]
        );
    }
}
