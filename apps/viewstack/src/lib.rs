//! # viewstack
//!
//! Command-line host for `viewstack-core`: validates graph documents and
//! replays navigation scripts against the in-memory render surface.
//!
//! The binary uses these modules through the `main.rs` entry point; tests
//! call the `cmd_*` functions directly.

pub mod cli;
pub mod demo;
pub mod error;
pub mod replay;
pub mod script;

// Re-export viewstack_core for convenience
pub use viewstack_core;
