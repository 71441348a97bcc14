//! # Family Rules
//!
//! The "family bible" crate - characters, families, player stats, and session
//! configuration for Kindred. This crate is the single source of truth for
//! who exists and what state the player carries; it contains no engine logic.

pub mod characters;
pub mod config;
pub mod stats;

pub use characters::*;
pub use config::*;
pub use stats::*;
