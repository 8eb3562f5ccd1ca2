//! Domain model: identifiers, groups, payments, balances, the owings
//! computation and the ports the application layer talks through.

pub mod balance;
pub mod group;
pub mod ids;
pub mod owings;
pub mod payment;
pub mod ports;
