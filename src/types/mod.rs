//! Types Module
//!
//! Instruction definitions for the relayer registry program.

pub mod instructions;

pub use instructions::*;
