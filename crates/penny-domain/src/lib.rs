//! penny-domain
//!
//! Pure domain models for Penny (users, transactions, bills, recurring
//! definitions) plus the calendar math they share. No I/O, no storage.

pub mod bill;
pub mod common;
pub mod money;
pub mod recurring;
pub mod transaction;
pub mod user;

pub use bill::*;
pub use common::*;
pub use money::*;
pub use recurring::*;
pub use transaction::*;
pub use user::*;
