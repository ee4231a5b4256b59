//! State Module
//!
//! Account-level state: the registry state PDA, the per-participant record
//! PDAs and the layouts of collaborator-owned accounts the registry reads.

pub mod external_accounts;
pub mod record_accounts;
pub mod registry_state;

pub use external_accounts::*;
pub use record_accounts::*;
pub use registry_state::*;
