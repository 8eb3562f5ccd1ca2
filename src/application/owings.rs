use super::groups::group_not_found;
use crate::domain::balance::Balance;
use crate::domain::ids::{GroupId, MemberId};
use crate::domain::owings::compute_owings;
use crate::domain::ports::{DirectoryBox, GroupStoreBox};
use crate::error::{LedgerError, Result};
use tracing::{debug, warn};

/// Answers "who owes me what" for a member of a group.
///
/// Loads the group, runs the owings computation and attaches display names
/// from the directory. A directory failure fails the whole request.
pub struct OwingsService {
    store: GroupStoreBox,
    directory: DirectoryBox,
}

impl OwingsService {
    pub fn new(store: GroupStoreBox, directory: DirectoryBox) -> Self {
        Self { store, directory }
    }

    pub async fn member_owings(&self, group_id: GroupId, member: MemberId) -> Result<Vec<Balance>> {
        let group = self
            .store
            .get(group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        let mut balances = compute_owings(&group, member)?;
        debug!(
            group = %group_id,
            member = %member,
            payments = group.payments.len(),
            "computed owings"
        );

        let ids: Vec<MemberId> = group.member_set().into_iter().collect();
        let entries = self.directory.lookup(&ids).await.map_err(|e| {
            warn!(group = %group_id, error = %e, "directory lookup failed");
            LedgerError::DependencyFailure(e.to_string())
        })?;

        for entry in entries {
            if let Some(balance) = balances.iter_mut().find(|b| b.member_id == entry.id) {
                balance.display_name = Some(entry.name);
            }
        }

        Ok(balances)
    }
}
