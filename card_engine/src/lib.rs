//! # Card Engine
//!
//! The narrative brain of Kindred. This crate interfaces with
//! `family_rules`, tracks relationships through a weighted social graph, and
//! sequences card-driven scenes with branching choices.
//!
//! ## Core Components
//!
//! - **social_graph**: Who knows whom, and how much, along independent
//!   positive and negative affinity axes
//! - **cards**: Immutable narrative content (templates, choices, modifiers)
//!   and bound card instances with role-substituted text
//! - **preconditions**: A small typed expression language evaluated against a
//!   bound card and game state
//! - **binder**: Exhaustive role-to-character binding for a template
//! - **session**: Sequencing of cards and application of choice effects
//! - **events**: Hooks for the presentation layer
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Card availability and choice consequences are
//!   functions of the social graph and player state
//! - **Event-Driven**: The engine announces card and choice transitions; it
//!   never controls presentation
//! - **Closed types**: Expression node kinds and stat discriminants are
//!   closed enums, so malformed content fails at load, not mid-session

pub mod binder;
pub mod cards;
pub mod events;
pub mod preconditions;
pub mod session;
pub mod social_graph;

pub use binder::*;
pub use cards::*;
pub use events::*;
pub use preconditions::*;
pub use session::*;
pub use social_graph::*;
