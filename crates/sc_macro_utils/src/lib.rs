//! Provide some tools for proc-macro crates.
#![allow(clippy::std_instead_of_core, reason = "proc-macro helper crate")]

// -----------------------------------------------------------------------------
// Modules

mod manifest;

// -----------------------------------------------------------------------------
// Exports

pub use manifest::Manifest;
