/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # Common Test Utilities
//!
//! Shared helpers for the integration tests:
//!
//! - In-memory collaborator doubles and a ready-made registry fixture
//! - Program test environment setup for end-to-end instruction tests
//! - Token creation and minting helpers

pub mod doubles;
pub mod fixture;
pub mod setup;
pub mod tokens;

#[allow(unused_imports)]
pub use doubles::*;
#[allow(unused_imports)]
pub use fixture::*;
#[allow(unused_imports)]
pub use setup::*;
#[allow(unused_imports)]
pub use tokens::*;

#[allow(unused_imports)]
pub use relayer_registry::ID as PROGRAM_ID;
#[allow(unused_imports)]
pub use solana_program_test::BanksClientError;

/// Test result type alias for convenience
pub type TestResult = Result<(), BanksClientError>;
