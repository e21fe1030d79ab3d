//! Game-state transition engine for Nightfall.
//!
//! Every transition is a function from a [`GameState`](nf_core::GameState)
//! and an input to a new state. The [`resolver`] derives the actions a state
//! offers, [`apply`] folds a narrative outcome into the state, [`rest`]
//! advances to the next night, and [`session`] dispatches player actions,
//! calling the [`oracle`] only for actions that need narration.

pub mod apply;
pub mod chronicle;
pub mod config;
pub mod creation;
pub mod error;
pub mod oracle;
pub mod outcome;
pub mod resolver;
pub mod rest;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use apply::{Ending, apply_outcome};
pub use chronicle::{export_markdown, export_text};
pub use config::{OracleConfig, SessionConfig};
pub use creation::roll_attributes;
pub use error::{EngineError, EngineResult};
pub use oracle::{ChatOracle, NarrativeOracle, OracleError, ScriptedOracle};
pub use outcome::{ActionOutcome, StorylineChange};
pub use resolver::resolve_actions;
pub use rest::sleep_through_day;
pub use session::{GameSession, Snapshot, initialize_game_state, process_action};
