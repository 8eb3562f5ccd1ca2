//! Net balances between the members of a group.
//!
//! Every payment is split evenly across the whole group, and each member's
//! portion is then split evenly across the payment's co-payers. Members who
//! are not co-payers of a payment (the owers) owe those portions to the
//! co-payers. Balances are expressed relative to one requesting member.

use super::balance::Balance;
use super::group::Group;
use super::ids::MemberId;
use super::payment::Payment;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Computes what every other member of `group` owes `requester` (positive)
/// or is owed by them (negative).
///
/// Running balances are rounded to three digits after every payment that
/// touches them, so the result can differ from rounding the final sum.
/// Display names are left unset. The requester is never part of the result.
pub fn compute_owings(group: &Group, requester: MemberId) -> Result<Vec<Balance>> {
    if !group.is_member(requester) {
        return Err(LedgerError::NotFound(format!(
            "User with {} isn't member of group",
            requester
        )));
    }

    let members = group.member_set();
    let mut balances: BTreeMap<MemberId, Balance> = members
        .iter()
        .map(|&id| (id, Balance::zero(id, group.currency)))
        .collect();

    for payment in &group.payments {
        apply_payment(payment, &members, requester, &mut balances)?;
    }

    balances.remove(&requester);
    Ok(balances.into_values().collect())
}

fn apply_payment(
    payment: &Payment,
    members: &BTreeSet<MemberId>,
    requester: MemberId,
    balances: &mut BTreeMap<MemberId, Balance>,
) -> Result<()> {
    let co_payers: BTreeSet<MemberId> = payment.co_payers.iter().copied().collect();
    let owers: Vec<MemberId> = members
        .iter()
        .copied()
        .filter(|member| !co_payers.contains(member))
        .collect();

    if owers.is_empty() {
        return Ok(());
    }
    if co_payers.is_empty() {
        return Err(LedgerError::DataIntegrity(format!(
            "Payment {} has no co-payers",
            payment.id
        )));
    }

    let share = payment.price / Decimal::from(members.len()) / Decimal::from(co_payers.len());

    if co_payers.contains(&requester) {
        for ower in owers {
            if let Some(balance) = balances.get_mut(&ower) {
                balance.credit(share)?;
            }
        }
    } else {
        // Co-payers outside the roster have no balance to adjust.
        for co_payer in &co_payers {
            if let Some(balance) = balances.get_mut(co_payer) {
                balance.debit(share)?;
            }
        }
    }

    Ok(())
}
