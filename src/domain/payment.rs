use super::ids::{GroupId, MemberId, PaymentId};
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Rejects prices that are zero or negative.
pub fn ensure_positive_price(price: Decimal) -> Result<(), LedgerError> {
    if price > Decimal::ZERO {
        Ok(())
    } else {
        Err(LedgerError::InvalidRequest(
            "Price must be positive".to_string(),
        ))
    }
}

/// A single expense recorded against a group.
///
/// `co_payers` are the members who fronted the expense; everyone else in the
/// group owes them a share of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub group_id: GroupId,
    pub description: String,
    pub price: Decimal,
    pub co_payers: Vec<MemberId>,
    pub creator: MemberId,
    pub timestamp: DateTime<Utc>,
}

/// Create request for a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub description: String,
    pub price: Decimal,
    pub co_payers: Vec<MemberId>,
}

impl PaymentDraft {
    /// Checks the request and returns the co-payers with duplicates removed,
    /// in first-seen order.
    pub fn validate(&self) -> Result<Vec<MemberId>, LedgerError> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Payment description shouldn't be blank".to_string(),
            ));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(LedgerError::InvalidRequest(format!(
                "Payment description shouldn't be more than {} symbols",
                MAX_DESCRIPTION_LEN
            )));
        }
        ensure_positive_price(self.price)?;
        if self.co_payers.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Payment must have at least one co-payer".to_string(),
            ));
        }

        let mut co_payers = Vec::with_capacity(self.co_payers.len());
        for id in &self.co_payers {
            if !co_payers.contains(id) {
                co_payers.push(*id);
            }
        }
        Ok(co_payers)
    }
}
