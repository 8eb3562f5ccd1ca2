use super::group::Currency;
use super::ids::MemberId;
use crate::error::{LedgerError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fractional digits every running balance is kept at.
pub const BALANCE_SCALE: u32 = 3;

/// Rounds a running balance to [`BALANCE_SCALE`] digits, half-up. The result
/// always carries exactly that scale, so `50.55` becomes `50.550`.
pub fn round_balance(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(BALANCE_SCALE);
    rounded
}

/// Net amount between one member and the requesting member.
///
/// A positive `value` means the member owes the requester; a negative one
/// means the requester owes the member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub member_id: MemberId,
    pub display_name: Option<String>,
    pub currency: Currency,
    pub value: Decimal,
}

impl Balance {
    pub fn zero(member_id: MemberId, currency: Currency) -> Self {
        Self {
            member_id,
            display_name: None,
            currency,
            value: Decimal::ZERO,
        }
    }

    pub fn credit(&mut self, amount: Decimal) -> Result<()> {
        let value = self
            .value
            .checked_add(amount)
            .ok_or_else(|| self.overflow())?;
        self.value = round_balance(value);
        Ok(())
    }

    pub fn debit(&mut self, amount: Decimal) -> Result<()> {
        let value = self
            .value
            .checked_sub(amount)
            .ok_or_else(|| self.overflow())?;
        self.value = round_balance(value);
        Ok(())
    }

    fn overflow(&self) -> LedgerError {
        LedgerError::DataIntegrity(format!(
            "Balance of member {} is out of range",
            self.member_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_balance(dec!(1.0005)), dec!(1.001));
        assert_eq!(round_balance(dec!(1.0004)), dec!(1.000));
        assert_eq!(round_balance(dec!(-1.0005)), dec!(-1.001));
        assert_eq!(round_balance(dec!(30.0166666)), dec!(30.017));
        assert_eq!(round_balance(dec!(50.55)).to_string(), "50.550");
        assert_eq!(round_balance(dec!(-25)).to_string(), "-25.000");
    }

    #[test]
    fn test_credit_and_debit_round_each_step() {
        let mut balance = Balance::zero(MemberId(1), Currency::Usd);
        balance.credit(dec!(0.0004)).unwrap();
        assert_eq!(balance.value, dec!(0.000));
        balance.credit(dec!(0.0004)).unwrap();
        assert_eq!(balance.value, dec!(0.000));

        balance.debit(dec!(1.2345)).unwrap();
        assert_eq!(balance.value, dec!(-1.235));
    }

    #[test]
    fn test_overflow_is_an_error_and_keeps_value() {
        let mut balance = Balance::zero(MemberId(2), Currency::Eur);
        balance.credit(Decimal::MAX).unwrap();
        let before = balance.value;

        assert!(matches!(
            balance.credit(Decimal::MAX),
            Err(LedgerError::DataIntegrity(_))
        ));
        assert_eq!(balance.value, before);

        let mut balance = Balance::zero(MemberId(2), Currency::Eur);
        balance.debit(Decimal::MAX).unwrap();
        assert!(matches!(
            balance.debit(Decimal::MAX),
            Err(LedgerError::DataIntegrity(_))
        ));
    }
}
