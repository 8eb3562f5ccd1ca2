use crate::domain::group::{Currency, GroupDraft};
use crate::domain::ids::MemberId;
use crate::domain::payment::PaymentDraft;
use crate::domain::ports::DirectoryEntry;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// A ledger file: the user directory plus groups with their payments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerFile {
    #[serde(default)]
    pub users: Vec<DirectoryEntry>,
    #[serde(default)]
    pub groups: Vec<LedgerGroup>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerGroup {
    pub name: String,
    pub currency: Currency,
    pub members: Vec<MemberId>,
    #[serde(default)]
    pub payments: Vec<LedgerPayment>,
}

impl LedgerGroup {
    pub fn draft(&self) -> GroupDraft {
        GroupDraft {
            name: self.name.clone(),
            currency: self.currency,
            members: self.members.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerPayment {
    pub description: String,
    pub price: Decimal,
    pub co_payers: Vec<MemberId>,
    pub creator: MemberId,
}

impl LedgerPayment {
    pub fn draft(&self) -> PaymentDraft {
        PaymentDraft {
            description: self.description.clone(),
            price: self.price,
            co_payers: self.co_payers.clone(),
        }
    }
}

/// Reads a [`LedgerFile`] from any JSON source.
pub struct LedgerReader<R: Read> {
    source: R,
}

impl<R: Read> LedgerReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<LedgerFile> {
        Ok(serde_json::from_reader(self.source)?)
    }
}
