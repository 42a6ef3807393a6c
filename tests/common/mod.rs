#![allow(dead_code, unused_imports)]
//! Shared test utilities for sheetmap integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fake_sheet_server;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
