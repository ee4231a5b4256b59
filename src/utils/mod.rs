//! Utilities Module
//!
//! Account validation, state serialization, upgrade-authority checks,
//! CPI snapshot protection and the account-backed collaborator adapters.

pub mod account_adapters;
pub mod program_authority;
pub mod reentrancy_protection;
pub mod serialization;
pub mod validation;
