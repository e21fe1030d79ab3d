//! Session orchestration.
//!
//! [`process_action`] is the single dispatch point for player actions: menu
//! actions and travel are handled locally, sleeping goes to the rest
//! transition, and everything else is narrated by the oracle and applied.
//! [`GameSession`] wraps it with turn discipline (one action in flight),
//! availability checks and an undo history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use nf_core::{Action, Character, GameState, HavenUpgrade, Location};

use crate::apply::apply_outcome;
use crate::config::SessionConfig;
use crate::error::{EngineError, EngineResult};
use crate::oracle::NarrativeOracle;
use crate::resolver::{resolve_actions, travel_destinations};
use crate::rest::sleep_through_day;

/// Logged when the oracle fails to narrate an ordinary action.
pub const INTERFERENCE: &str = "A strange power interferes, and the outcome of your action is \
                                lost to the mists. The moment passes, unresolved.";

/// The opening state for `character`, with its actions resolved.
pub fn initialize_game_state(character: Character) -> GameState {
    let mut state = GameState::initial(character);
    state.available_actions = resolve_actions(state.location, &state, state.time);
    state
}

/// Apply one player action to `state`.
///
/// Never fails: oracle errors degrade to an unchanged state with an
/// interference line in the log.
pub async fn process_action<O>(oracle: &O, state: &GameState, action: Action) -> GameState
where
    O: NarrativeOracle + ?Sized,
{
    tracing::debug!(%action, day = state.day, time = %state.time, "processing action");
    match action {
        Action::Travel => travel_menu(state),
        Action::DevelopHaven => haven_menu(state),
        Action::Build(upgrade) if state.influence < upgrade.influence_cost() => {
            cannot_afford(state, upgrade)
        }
        Action::GoTo(location) => arrive(state, location),
        Action::SleepUntilDusk => sleep_through_day(oracle, state).await,
        _ => narrate(oracle, state, action).await,
    }
}

fn travel_menu(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.current_event = "The city stretches before you. Where will you go?".to_string();
    next.available_actions = travel_destinations(state.location);
    next
}

fn haven_menu(state: &GameState) -> GameState {
    let mut next = state.clone();
    let unowned = state.unowned_upgrades();
    if unowned.is_empty() {
        next.current_event = "Your Haven is fully developed for now.".to_string();
        next.available_actions = resolve_actions(state.location, state, state.time);
    } else {
        next.current_event = format!(
            "You contemplate improvements for your Haven. You have {} Influence to spend.",
            state.influence
        );
        next.available_actions = unowned.into_iter().map(Action::Build).collect();
        next.available_actions.push(Action::Travel);
    }
    next
}

fn cannot_afford(state: &GameState, upgrade: HavenUpgrade) -> GameState {
    let mut next = state.clone();
    next.log(format!(
        "> You attempt to build the {upgrade}, but lack the means."
    ));
    next.current_event = format!(
        "You lack the {} Influence required. You must accumulate more power and connections in the city.",
        upgrade.influence_cost()
    );
    next.trim_event_log();
    next
}

fn arrive(state: &GameState, location: Location) -> GameState {
    let mut next = state.clone();
    next.location = location;
    next.current_event = format!("You arrive at {}. {}", location.name(), location.description());
    next.available_actions = resolve_actions(location, &next, next.time);
    next
}

async fn narrate<O>(oracle: &O, state: &GameState, action: Action) -> GameState
where
    O: NarrativeOracle + ?Sized,
{
    let outcome = match oracle.generate_action_outcome(state, action).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, %action, "oracle failed to narrate action");
            let mut next = state.clone();
            next.log(INTERFERENCE);
            next.current_event = INTERFERENCE.to_string();
            next.trim_event_log();
            return next;
        }
    };

    let mut next = apply_outcome(state, action, &outcome);

    let summary = match oracle
        .generate_memory_summary(action, &outcome.description)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(%action, "oracle returned an empty memory summary");
            format!("Remembered the act of {action}.")
        }
        Err(e) => {
            tracing::warn!(error = %e, %action, "memory summary unavailable");
            format!("Remembered the act of {action}.")
        }
    };
    next.remember(summary);
    next
}

/// A state the session held before an action replaced it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The state before the action.
    pub state: GameState,
    /// The action that replaced it.
    pub action: Action,
    /// When the action was taken.
    pub taken_at: DateTime<Utc>,
}

/// A single playthrough: the current state, the oracle narrating it and the
/// snapshots needed to undo.
///
/// At most one action is in flight. A second [`perform`](Self::perform)
/// issued while the first awaits the oracle is rejected with
/// [`EngineError::Busy`]; the committed state only changes once a
/// transition completes.
pub struct GameSession<O> {
    oracle: O,
    config: SessionConfig,
    state: Mutex<GameState>,
    history: Mutex<Vec<Snapshot>>,
    processing: AtomicBool,
}

impl<O: NarrativeOracle> GameSession<O> {
    /// Start a session for `character`.
    pub fn new(character: Character, oracle: O, config: SessionConfig) -> Self {
        tracing::info!(name = %character.name, class = %character.class, "starting session");
        Self {
            oracle,
            config,
            state: Mutex::new(initialize_game_state(character)),
            history: Mutex::new(Vec::new()),
            processing: AtomicBool::new(false),
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> GameState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The narrating oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Earlier snapshots, oldest first.
    pub fn history(&self) -> Vec<Snapshot> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether an action is awaiting the oracle.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Perform `action` and return the new state.
    pub async fn perform(&self, action: Action) -> EngineResult<GameState> {
        let _turn = TurnGuard::acquire(&self.processing)?;

        let current = self.state();
        if current.is_game_over {
            return Err(EngineError::GameOver);
        }
        if !current.available_actions.contains(&action) {
            return Err(EngineError::ActionUnavailable(action));
        }

        let next = process_action(&self.oracle, &current, action).await;

        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            history.push(Snapshot {
                state: current,
                action,
                taken_at: Utc::now(),
            });
            nf_core::state::keep_most_recent(&mut history, self.config.history_limit);
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next.clone();

        if next.is_game_over {
            tracing::info!(message = %next.game_over_message, "session ended");
        }
        Ok(next)
    }

    /// Classify `label` and perform it.
    pub async fn perform_text(&self, label: &str) -> EngineResult<GameState> {
        let action = Action::parse(label)?;
        self.perform(action).await
    }

    /// Restore the state held before the most recent action.
    pub fn undo(&self) -> EngineResult<GameState> {
        let _turn = TurnGuard::acquire(&self.processing)?;
        let snapshot = self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or(EngineError::NothingToUndo)?;
        tracing::debug!(action = %snapshot.action, "undoing action");
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.state.clone();
        Ok(snapshot.state)
    }
}

/// Holds the processing flag for the duration of one turn.
struct TurnGuard<'a>(&'a AtomicBool);

impl<'a> TurnGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> EngineResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleResult, ScriptedOracle};
    use crate::outcome::ActionOutcome;
    use crate::test_support::{StubOracle, character, new_state, quiet};
    use async_trait::async_trait;
    use nf_core::state::MEMORY_LIMIT;
    use nf_core::{Attributes, Background, Gender, Race, RivalArc, TimeOfDay, VampireClass};
    use tokio::sync::Notify;

    #[test]
    fn initial_state_offers_haven_actions() {
        let s = new_state();
        assert_eq!(
            s.available_actions,
            vec![
                Action::RestAndMeditate,
                Action::StudyAncientTexts,
                Action::DevelopHaven,
                Action::Unleash(s.character.discipline()),
                Action::Travel,
            ]
        );
    }

    #[tokio::test]
    async fn travel_offers_other_locations() {
        let s = new_state();
        let oracle = StubOracle::default();
        let next = process_action(&oracle, &s, Action::Travel).await;
        assert_eq!(next.available_actions.len(), Location::ALL.len() - 1);
        assert!(!next.available_actions.contains(&Action::GoTo(Location::Haven)));
        assert_eq!(next.event_log, s.event_log);
        assert_eq!(next.blood, s.blood);

        let arrived = process_action(&oracle, &next, Action::GoTo(Location::Docks)).await;
        assert_eq!(arrived.location, Location::Docks);
        assert!(arrived.current_event.starts_with("You arrive at The Docks."));
        assert_eq!(arrived.available_actions[0], Action::FeedOnDockworker);
        assert_eq!(oracle.outcome_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn haven_menu_lists_unowned_upgrades() {
        let mut s = new_state();
        s.haven_upgrades.insert(HavenUpgrade::SecureCrypt);
        let next = process_action(&StubOracle::default(), &s, Action::DevelopHaven).await;
        assert_eq!(
            next.available_actions,
            vec![
                Action::Build(HavenUpgrade::Library),
                Action::Build(HavenUpgrade::BloodCellar),
                Action::Travel,
            ]
        );
        assert!(next.current_event.contains("5 Influence"));
    }

    #[tokio::test]
    async fn fully_developed_haven_keeps_location_actions() {
        let mut s = new_state();
        s.haven_upgrades.extend(HavenUpgrade::ALL);
        let next = process_action(&StubOracle::default(), &s, Action::DevelopHaven).await;
        assert_eq!(next.current_event, "Your Haven is fully developed for now.");
        assert_eq!(next.available_actions, s.available_actions);
    }

    #[tokio::test]
    async fn unaffordable_build_changes_nothing_but_the_log() {
        let mut s = new_state();
        s.influence = 10;
        let oracle = StubOracle::default();
        let next = process_action(&oracle, &s, Action::Build(HavenUpgrade::Library)).await;
        assert!(next.haven_upgrades.is_empty());
        assert_eq!(next.influence, 10);
        assert_eq!(next.event_log.len(), s.event_log.len() + 1);
        assert_eq!(
            next.event_log.last().unwrap(),
            "> You attempt to build the Library, but lack the means."
        );
        assert!(next.current_event.contains("15 Influence"));
        assert_eq!(oracle.outcome_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn affordable_build_is_narrated_and_finalized() {
        let mut s = new_state();
        s.influence = 15;
        let oracle = StubOracle::with_outcomes([quiet("Shelves rise.").with_upgrade(HavenUpgrade::Library)]);
        let next = process_action(&oracle, &s, Action::Build(HavenUpgrade::Library)).await;
        assert!(next.has_upgrade(HavenUpgrade::Library));
        assert_eq!(next.influence, 0);
        assert_eq!(next.memory, vec!["Did Build Library."]);
    }

    #[tokio::test]
    async fn oracle_failure_only_appends_interference() {
        let s = new_state();
        let next = process_action(&StubOracle::default(), &s, Action::RestAndMeditate).await;
        assert_eq!(next.event_log.len(), s.event_log.len() + 1);
        assert_eq!(next.event_log[..s.event_log.len()], s.event_log[..]);
        assert_eq!(next.event_log.last().unwrap(), INTERFERENCE);
        assert_eq!(
            (next.blood, next.humanity, next.hunger, next.location),
            (s.blood, s.humanity, s.hunger, s.location)
        );
        assert_eq!(next.available_actions, s.available_actions);
        assert!(next.memory.is_empty());
    }

    #[tokio::test]
    async fn summary_failure_keeps_outcome() {
        let s = new_state();
        let oracle = StubOracle {
            fail_summaries: true,
            ..StubOracle::with_outcomes([ActionOutcome::new("Calm.", 1, 0, 1, false)])
        };
        let next = process_action(&oracle, &s, Action::RestAndMeditate).await;
        assert_eq!(next.blood, 6);
        assert_eq!(next.memory, vec!["Remembered the act of Rest and Meditate."]);
    }

    #[tokio::test]
    async fn memory_is_bounded() {
        let mut s = new_state();
        let oracle = StubOracle::with_outcomes((0..MEMORY_LIMIT + 5).map(|_| quiet("Still.")));
        for _ in 0..MEMORY_LIMIT + 5 {
            s = process_action(&oracle, &s, Action::StudyAncientTexts).await;
        }
        assert_eq!(s.memory.len(), MEMORY_LIMIT);
    }

    fn session(outcomes: Vec<ActionOutcome>) -> GameSession<StubOracle> {
        GameSession::new(
            character(),
            StubOracle::with_outcomes(outcomes),
            SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn session_rejects_unavailable_actions() {
        let session = session(Vec::new());
        let err = session.perform(Action::HuntForBlood).await.unwrap_err();
        assert!(matches!(err, EngineError::ActionUnavailable(Action::HuntForBlood)));
        let err = session.perform_text("Dance wildly").await.unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[tokio::test]
    async fn session_travels_by_label() {
        let session = session(Vec::new());
        session.perform_text("travel...").await.unwrap();
        let state = session.perform_text("the neon strip").await.unwrap();
        assert_eq!(state.location, Location::NeonStrip);
        assert_eq!(session.state().location, Location::NeonStrip);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn session_rejects_after_game_over() {
        let session = session(vec![ActionOutcome::new("The Beast wins.", -10, 0, 0, false)]);
        let state = session.perform(Action::StudyAncientTexts).await.unwrap();
        assert!(state.is_game_over);
        let err = session.perform(Action::Travel).await.unwrap_err();
        assert!(matches!(err, EngineError::GameOver));
    }

    #[tokio::test]
    async fn undo_restores_previous_state() {
        let session = session(vec![ActionOutcome::new("Drained.", -2, 0, 0, false)]);
        assert!(matches!(session.undo(), Err(EngineError::NothingToUndo)));
        session.perform(Action::StudyAncientTexts).await.unwrap();
        assert_eq!(session.state().blood, 3);
        let restored = session.undo().unwrap();
        assert_eq!(restored.blood, 5);
        assert_eq!(session.state().blood, 5);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let session = GameSession::new(
            character(),
            StubOracle::default(),
            SessionConfig::default().with_history_limit(2),
        );
        for action in [
            Action::Travel,
            Action::GoTo(Location::Docks),
            Action::Travel,
            Action::GoTo(Location::Haven),
        ] {
            session.perform(action).await.unwrap();
        }
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, Action::GoTo(Location::Haven));
        assert!(history[0].taken_at <= history[1].taken_at);
    }

    /// Holds every outcome request until released.
    struct GatedOracle {
        gate: Notify,
        inner: StubOracle,
    }

    #[async_trait]
    impl NarrativeOracle for GatedOracle {
        async fn generate_action_outcome(
            &self,
            state: &GameState,
            action: Action,
        ) -> OracleResult<ActionOutcome> {
            self.gate.notified().await;
            self.inner.generate_action_outcome(state, action).await
        }

        async fn generate_memory_summary(
            &self,
            action: Action,
            description: &str,
        ) -> OracleResult<String> {
            self.inner.generate_memory_summary(action, description).await
        }

        async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String> {
            self.inner.generate_chronicle_entry(state).await
        }

        async fn generate_initial_attributes(
            &self,
            gender: Gender,
            race: Race,
            class: VampireClass,
            background: Background,
        ) -> OracleResult<Attributes> {
            self.inner
                .generate_initial_attributes(gender, race, class, background)
                .await
        }
    }

    #[tokio::test]
    async fn second_action_while_busy_is_rejected() {
        let oracle = GatedOracle {
            gate: Notify::new(),
            inner: StubOracle::with_outcomes([quiet("Pages turn.")]),
        };
        let session = GameSession::new(character(), oracle, SessionConfig::default());

        let (first, second) = tokio::join!(session.perform(Action::StudyAncientTexts), async {
            let rejected = session.perform(Action::RestAndMeditate).await;
            assert!(session.is_processing());
            assert!(matches!(session.undo(), Err(EngineError::Busy)));
            session.oracle().gate.notify_one();
            rejected
        });

        assert!(matches!(second, Err(EngineError::Busy)));
        assert_eq!(first.unwrap().current_event, "Pages turn.");
        assert!(!session.is_processing());
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn scripted_playthrough_reaches_the_next_night() {
        let session = GameSession::new(
            character(),
            ScriptedOracle::new(7),
            SessionConfig::default(),
        );
        let mut guard = 0;
        while session.state().time != TimeOfDay::Day && guard < 10 {
            session.perform(Action::StudyAncientTexts).await.unwrap();
            guard += 1;
        }
        let state = session.state();
        assert_eq!(state.time, TimeOfDay::Day);
        assert_eq!(state.available_actions, vec![Action::SleepUntilDusk]);

        let woke = session.perform(Action::SleepUntilDusk).await.unwrap();
        assert_eq!(woke.day, 2);
        assert_eq!(woke.time, TimeOfDay::Dusk);
        assert_eq!(woke.chronicle.len(), 1);
        assert_eq!(woke.rival_arc, RivalArc::None);
    }
}
