//! Shared fixtures for engine tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use nf_core::{Action, Attributes, Background, Character, GameState, Gender, Race, VampireClass};

use crate::oracle::{NarrativeOracle, OracleError, OracleResult};
use crate::outcome::ActionOutcome;
use crate::session::initialize_game_state;

pub(crate) fn character() -> Character {
    Character::new(
        "Vesper",
        Gender::Female,
        Race::Sanguine,
        VampireClass::Siren,
        Background::ExiledNoble,
        Attributes::fallback(),
    )
    .unwrap()
}

pub(crate) fn new_state() -> GameState {
    initialize_game_state(character())
}

/// An outcome that changes nothing and passes no time.
pub(crate) fn quiet(description: &str) -> ActionOutcome {
    ActionOutcome::new(description, 0, 0, 0, false)
}

/// Oracle double: replays queued outcomes, fails when the queue is empty.
#[derive(Default)]
pub(crate) struct StubOracle {
    pub(crate) outcomes: Mutex<VecDeque<ActionOutcome>>,
    pub(crate) fail_summaries: bool,
    pub(crate) fail_chronicle: bool,
    pub(crate) attributes: Option<Attributes>,
    pub(crate) outcome_calls: AtomicUsize,
    pub(crate) chronicle_calls: AtomicUsize,
}

impl StubOracle {
    pub(crate) fn with_outcomes(outcomes: impl IntoIterator<Item = ActionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_summaries: true,
            fail_chronicle: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl NarrativeOracle for StubOracle {
    async fn generate_action_outcome(
        &self,
        _state: &GameState,
        _action: Action,
    ) -> OracleResult<ActionOutcome> {
        self.outcome_calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| OracleError::Request("no outcome queued".to_string()))
    }

    async fn generate_memory_summary(
        &self,
        action: Action,
        _description: &str,
    ) -> OracleResult<String> {
        if self.fail_summaries {
            return Err(OracleError::Request("summary unavailable".to_string()));
        }
        Ok(format!("Did {action}."))
    }

    async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String> {
        self.chronicle_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_chronicle {
            return Err(OracleError::Malformed("chronicle unavailable".to_string()));
        }
        Ok(format!("{} memories recalled.", state.memory.len()))
    }

    async fn generate_initial_attributes(
        &self,
        _gender: Gender,
        _race: Race,
        _class: VampireClass,
        _background: Background,
    ) -> OracleResult<Attributes> {
        self.attributes
            .ok_or_else(|| OracleError::Request("attributes unavailable".to_string()))
    }
}
