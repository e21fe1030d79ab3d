//! Core types for Nightfall: content tables, characters, actions, and game state.
//!
//! This crate is pure data. It defines the static tables the game is built
//! from, the immutable [`Character`] produced by character creation, the
//! tagged [`Action`] representation, and the [`GameState`] aggregate that the
//! engine transforms turn by turn.

/// Player-facing actions, classified once from their text label.
pub mod action;
/// Characters and their creation-time attributes.
pub mod character;
/// Static content tables: races, classes, backgrounds, locations, upgrades.
pub mod content;
/// Error types used throughout the crate.
pub mod error;
/// The mutable game-state aggregate and its bounds.
pub mod state;

/// Re-export the action types.
pub use action::{Action, ActionParseError};
/// Re-export character types.
pub use character::{Attributes, Character, Gender};
/// Re-export content tables.
pub use content::{Background, Discipline, HavenUpgrade, Location, Race, VampireClass};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export state types.
pub use state::{GameState, RivalArc, TimeOfDay};
