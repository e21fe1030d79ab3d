//! Error types for the transition engine.

use nf_core::Action;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to the caller of a [`GameSession`](crate::GameSession).
///
/// Oracle failures never appear here: they degrade to logged fallbacks
/// inside the transition.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Another action is still awaiting the narrative oracle.
    #[error("an action is already being processed")]
    Busy,

    /// The game has reached a terminal state.
    #[error("the game is over")]
    GameOver,

    /// The action is not among the currently available actions.
    #[error("action not available: {0}")]
    ActionUnavailable(Action),

    /// The action label could not be classified.
    #[error(transparent)]
    Parse(#[from] nf_core::ActionParseError),

    /// There is no earlier snapshot to restore.
    #[error("nothing to undo")]
    NothingToUndo,
}
