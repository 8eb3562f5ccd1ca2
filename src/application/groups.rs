use crate::domain::group::{Group, GroupDraft};
use crate::domain::ids::{GroupId, MemberId};
use crate::domain::ports::{DirectoryBox, GroupStoreBox};
use crate::error::{LedgerError, Result};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Creates, reads, updates and deletes groups.
///
/// Every roster change is checked against the directory: a group can only
/// contain members the directory knows about.
pub struct GroupService {
    store: GroupStoreBox,
    directory: DirectoryBox,
}

impl GroupService {
    pub fn new(store: GroupStoreBox, directory: DirectoryBox) -> Self {
        Self { store, directory }
    }

    pub async fn create_group(&self, draft: GroupDraft) -> Result<Group> {
        draft.validate()?;

        if self.store.find_by_name(&draft.name).await?.is_some() {
            return Err(LedgerError::InvalidRequest(
                "Group name should be unique".to_string(),
            ));
        }
        self.ensure_members_known(&draft.members).await?;

        let group = Group::new(self.store.next_group_id().await?, draft);
        self.store.store(group.clone()).await?;

        info!(group = %group.id, name = %group.name, "created group");
        Ok(group)
    }

    pub async fn retrieve_group(&self, group_id: GroupId) -> Result<Group> {
        self.store
            .get(group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))
    }

    pub async fn find_group_by_name(&self, name: &str) -> Result<Group> {
        self.store.find_by_name(name).await?.ok_or_else(|| {
            LedgerError::NotFound(format!("Group entity with name {} doesn't exist", name))
        })
    }

    /// Replaces name, currency and roster. Recorded payments are kept.
    pub async fn update_group(&self, group_id: GroupId, draft: GroupDraft) -> Result<Group> {
        self.retrieve_group(group_id).await?;
        draft.validate()?;

        if let Some(existing) = self.store.find_by_name(&draft.name).await?
            && existing.id != group_id
        {
            return Err(LedgerError::InvalidRequest(
                "Group name should be unique".to_string(),
            ));
        }
        self.ensure_members_known(&draft.members).await?;

        // Payments recorded since the lookup above stay on the group.
        let GroupDraft {
            name,
            currency,
            members,
        } = draft;
        let group = self
            .store
            .modify(
                group_id,
                Box::new(move |group: &mut Group| -> Result<()> {
                    group.name = name;
                    group.currency = currency;
                    group.members = members;
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        info!(group = %group.id, "updated group");
        Ok(group)
    }

    pub async fn delete_group(&self, group_id: GroupId) -> Result<()> {
        if self.store.delete(group_id).await? {
            info!(group = %group_id, "deleted group");
            Ok(())
        } else {
            Err(group_not_found(group_id))
        }
    }

    async fn ensure_members_known(&self, members: &[MemberId]) -> Result<()> {
        let requested: BTreeSet<MemberId> = members.iter().copied().collect();
        let ids: Vec<MemberId> = requested.iter().copied().collect();

        let entries = self.directory.lookup(&ids).await.map_err(|e| {
            warn!(error = %e, "directory lookup failed while validating members");
            LedgerError::DependencyFailure(e.to_string())
        })?;

        let found: BTreeSet<MemberId> = entries.into_iter().map(|entry| entry.id).collect();
        if requested.is_subset(&found) {
            Ok(())
        } else {
            let listed: Vec<String> = members.iter().map(ToString::to_string).collect();
            Err(LedgerError::InvalidRequest(format!(
                "Members ids [{}] are not valid",
                listed.join(", ")
            )))
        }
    }
}

pub(crate) fn group_not_found(group_id: GroupId) -> LedgerError {
    LedgerError::NotFound(format!(
        "Group entity with id {} doesn't exist",
        group_id
    ))
}
