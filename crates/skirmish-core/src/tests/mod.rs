//! Cross-module test suites.
//!
//! - `determinism.rs`: same inputs and seeds produce identical battles
//! - `integration.rs`: full battles through the public surface
//! - `properties.rs`: property tests over random creatures and moves
//! - `helpers.rs`: creature and squad factories

mod helpers;
mod properties;

pub use helpers::*;
