//! The narrative oracle contract.
//!
//! The oracle is the external generator that narrates ordinary actions and
//! proposes numeric deltas, condenses outcomes into one-sentence memories,
//! and writes end-of-night chronicle entries. The engine treats it as
//! fallible: every failure is recovered one layer up, in the session.

pub mod chat;
pub mod decode;
pub mod prompt;
pub mod scripted;

use async_trait::async_trait;
use nf_core::{Action, Attributes, Background, GameState, Gender, Race, VampireClass};
use thiserror::Error;

use crate::outcome::ActionOutcome;

pub use chat::ChatOracle;
pub use decode::{decode_attributes, decode_outcome};
pub use scripted::ScriptedOracle;

/// Result type for oracle calls.
pub type OracleResult<T> = Result<T, OracleError>;

/// Ways the oracle can fail.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle could not be reached.
    #[error("oracle request failed: {0}")]
    Request(String),

    /// The oracle answered, but not with usable data.
    #[error("malformed oracle response: {0}")]
    Malformed(String),
}

/// Source of narration for the game.
#[async_trait]
pub trait NarrativeOracle: Send + Sync {
    /// Narrate `action` taken in `state` and propose its consequences.
    async fn generate_action_outcome(
        &self,
        state: &GameState,
        action: Action,
    ) -> OracleResult<ActionOutcome>;

    /// Condense an outcome into a single factual sentence.
    async fn generate_memory_summary(
        &self,
        action: Action,
        description: &str,
    ) -> OracleResult<String>;

    /// Write a first-person journal paragraph about the night in `state`.
    async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String>;

    /// Propose starting attributes fitting a character concept. A returned
    /// set always satisfies the creation rules.
    async fn generate_initial_attributes(
        &self,
        gender: Gender,
        race: Race,
        class: VampireClass,
        background: Background,
    ) -> OracleResult<Attributes>;
}

#[async_trait]
impl<T: NarrativeOracle + ?Sized> NarrativeOracle for Box<T> {
    async fn generate_action_outcome(
        &self,
        state: &GameState,
        action: Action,
    ) -> OracleResult<ActionOutcome> {
        (**self).generate_action_outcome(state, action).await
    }

    async fn generate_memory_summary(
        &self,
        action: Action,
        description: &str,
    ) -> OracleResult<String> {
        (**self).generate_memory_summary(action, description).await
    }

    async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String> {
        (**self).generate_chronicle_entry(state).await
    }

    async fn generate_initial_attributes(
        &self,
        gender: Gender,
        race: Race,
        class: VampireClass,
        background: Background,
    ) -> OracleResult<Attributes> {
        (**self)
            .generate_initial_attributes(gender, race, class, background)
            .await
    }
}
