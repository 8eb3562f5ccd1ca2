use super::group::Group;
use super::ids::{GroupId, MemberId, PaymentId};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persistence for groups, their rosters and their payments.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Inserts or replaces the group stored under `group.id`.
    async fn store(&self, group: Group) -> Result<()>;
    async fn get(&self, group_id: GroupId) -> Result<Option<Group>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>>;
    /// Applies `edit` to the stored group and saves the result as one atomic
    /// step with respect to other writers of the same store.
    ///
    /// Returns `Ok(None)` when the group does not exist. When `edit` fails the
    /// stored group is left untouched and the error is returned.
    async fn modify(&self, group_id: GroupId, edit: GroupEdit) -> Result<Option<Group>>;
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, group_id: GroupId) -> Result<bool>;
    async fn next_group_id(&self) -> Result<GroupId>;
    async fn next_payment_id(&self) -> Result<PaymentId>;
}

/// A member as known to the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: MemberId,
    pub name: String,
}

/// Resolves member ids to display names.
///
/// Ids the directory does not know are left out of the response; that is not
/// an error.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn lookup(&self, ids: &[MemberId]) -> Result<Vec<DirectoryEntry>>;
}

pub type GroupEdit = Box<dyn FnOnce(&mut Group) -> Result<()> + Send>;
pub type GroupStoreBox = Box<dyn GroupStore>;
pub type DirectoryBox = Box<dyn Directory>;
pub type GroupStoreFactory = Box<dyn Fn() -> GroupStoreBox + Send + Sync>;
