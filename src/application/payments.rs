use super::groups::group_not_found;
use crate::domain::group::Group;
use crate::domain::ids::{GroupId, MemberId, PaymentId};
use crate::domain::payment::{Payment, PaymentDraft};
use crate::domain::ports::GroupStoreBox;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use tracing::info;

/// Records and removes payments within a group.
pub struct PaymentService {
    store: GroupStoreBox,
}

impl PaymentService {
    pub fn new(store: GroupStoreBox) -> Self {
        Self { store }
    }

    /// Appends a payment made by `creator` to the group.
    ///
    /// All co-payers must belong to the group.
    pub async fn create_payment(
        &self,
        group_id: GroupId,
        draft: PaymentDraft,
        creator: MemberId,
    ) -> Result<Payment> {
        let co_payers = draft.validate()?;
        if self.store.get(group_id).await?.is_none() {
            return Err(group_not_found(group_id));
        }

        let payment = Payment {
            id: self.store.next_payment_id().await?,
            group_id,
            description: draft.description,
            price: draft.price,
            co_payers,
            creator,
            timestamp: Utc::now(),
        };

        // Membership is checked against the roster inside the same edit that
        // appends the payment.
        let recorded = payment.clone();
        self.store
            .modify(
                group_id,
                Box::new(move |group: &mut Group| -> Result<()> {
                    if !recorded.co_payers.iter().all(|id| group.is_member(*id)) {
                        return Err(LedgerError::InvalidRequest(format!(
                            "Co-payers ids are not members of group with id {}",
                            group_id
                        )));
                    }
                    group.payments.push(recorded);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        info!(group = %group_id, payment = %payment.id, price = %payment.price, "recorded payment");
        Ok(payment)
    }

    pub async fn retrieve_payments(&self, group_id: GroupId) -> Result<Vec<Payment>> {
        let group = self.load(group_id).await?;
        if group.payments.is_empty() {
            return Err(LedgerError::NotFound(format!(
                "Payments with group id {} don't exist",
                group_id
            )));
        }
        Ok(group.payments)
    }

    pub async fn retrieve_payment(&self, group_id: GroupId, payment_id: PaymentId) -> Result<Payment> {
        let group = self.load(group_id).await?;
        group
            .payments
            .into_iter()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| payment_not_found(payment_id))
    }

    pub async fn delete_payment(&self, group_id: GroupId, payment_id: PaymentId) -> Result<()> {
        self.store
            .modify(
                group_id,
                Box::new(move |group: &mut Group| -> Result<()> {
                    let before = group.payments.len();
                    group.payments.retain(|payment| payment.id != payment_id);
                    if group.payments.len() == before {
                        return Err(payment_not_found(payment_id));
                    }
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        info!(group = %group_id, payment = %payment_id, "deleted payment");
        Ok(())
    }

    async fn load(&self, group_id: GroupId) -> Result<Group> {
        self.store
            .get(group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))
    }
}

fn payment_not_found(payment_id: PaymentId) -> LedgerError {
    LedgerError::NotFound(format!(
        "Payment with {} payment id doesn't exist",
        payment_id
    ))
}
