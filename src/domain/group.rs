use super::ids::{GroupId, MemberId};
use super::payment::Payment;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const MAX_GROUP_NAME_LEN: usize = 50;

/// Currencies a group may keep its books in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Ua,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ua => "UA",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UA" => Ok(Currency::Ua),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(LedgerError::InvalidRequest(
                "Supported currencies: UA, USD, EUR".to_string(),
            )),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

/// A shared-expense group together with its roster and payment history.
///
/// `members` keeps insertion order; duplicates carry no meaning and are
/// collapsed wherever the group is treated as a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub currency: Currency,
    pub members: Vec<MemberId>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Group {
    pub fn new(id: GroupId, draft: GroupDraft) -> Self {
        Self {
            id,
            name: draft.name,
            currency: draft.currency,
            members: draft.members,
            payments: Vec::new(),
        }
    }

    pub fn is_member(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// The distinct member ids of the group.
    pub fn member_set(&self) -> BTreeSet<MemberId> {
        self.members.iter().copied().collect()
    }
}

/// Create/update request for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDraft {
    pub name: String,
    pub currency: Currency,
    pub members: Vec<MemberId>,
}

impl GroupDraft {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Group name shouldn't be blank".to_string(),
            ));
        }
        if self.name.chars().count() > MAX_GROUP_NAME_LEN {
            return Err(LedgerError::InvalidRequest(format!(
                "Group name shouldn't be more than {} symbols",
                MAX_GROUP_NAME_LEN
            )));
        }
        if self.members.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Members size should be min 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, members: Vec<u64>) -> GroupDraft {
        GroupDraft {
            name: name.to_string(),
            currency: Currency::Usd,
            members: members.into_iter().map(MemberId).collect(),
        }
    }

    #[test]
    fn test_currency_parsing_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("Eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("UA".parse::<Currency>().unwrap(), Currency::Ua);
        assert!(matches!(
            "GBP".parse::<Currency>(),
            Err(LedgerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_currency_serde() {
        let currency: Currency = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(currency, Currency::Eur);
        assert_eq!(serde_json::to_string(&currency).unwrap(), "\"EUR\"");
        assert!(serde_json::from_str::<Currency>("\"JPY\"").is_err());
    }

    #[test]
    fn test_group_draft_validation() {
        assert!(draft("Trip", vec![1]).validate().is_ok());
        assert!(draft("   ", vec![1]).validate().is_err());
        assert!(draft(&"x".repeat(51), vec![1]).validate().is_err());
        assert!(draft(&"x".repeat(50), vec![1]).validate().is_ok());
        assert!(draft("Trip", vec![]).validate().is_err());
    }

    #[test]
    fn test_member_set_collapses_duplicates() {
        let group = Group::new(GroupId(1), draft("Trip", vec![3, 1, 3, 2]));
        let members: Vec<u64> = group.member_set().into_iter().map(|m| m.0).collect();
        assert_eq!(members, vec![1, 2, 3]);
        assert!(group.is_member(MemberId(3)));
        assert!(!group.is_member(MemberId(4)));
    }
}
