//! Application layer orchestrating stores, the directory and the owings
//! computation.
//!
//! Each service owns boxed ports so the same services run on top of the
//! in-memory adapters in tests and on the persistent store in production.

pub mod groups;
pub mod owings;
pub mod payments;
