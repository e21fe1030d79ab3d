//! The mutable game-state aggregate.
//!
//! [`GameState`] is a plain value. Transitions in the engine take a state by
//! reference and return a new one; nothing here performs I/O or consults the
//! narrative oracle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::character::Character;
use crate::content::{HavenUpgrade, Location};

/// Upper bound for blood.
pub const BLOOD_MAX: i32 = 10;
/// Upper bound for humanity.
pub const HUMANITY_MAX: i32 = 7;
/// Upper bound for hunger; reaching it costs humanity.
pub const HUNGER_MAX: i32 = 5;
/// Upper bound for hunger tolerance.
pub const HUNGER_TOLERANCE_MAX: f64 = 5.0;
/// Number of event-log lines kept.
pub const EVENT_LOG_LIMIT: usize = 20;
/// Number of memory summaries kept.
pub const MEMORY_LIMIT: usize = 30;
/// Generation at or below which the game ends in apotheosis.
pub const APOTHEOSIS_GENERATION: i32 = 6;

/// Phase of the night. Advances Dusk → Midnight → Pre-Dawn → Day; only
/// resting returns to Dusk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Start of the night.
    Dusk,
    /// The deep of the night.
    Midnight,
    /// The last hours before sunrise.
    #[serde(rename = "Pre-Dawn")]
    PreDawn,
    /// Sunlight. Only sleeping is possible, and only at the haven.
    Day,
}

impl TimeOfDay {
    /// The phase after this one. Day does not wrap.
    pub fn next(self) -> Self {
        match self {
            Self::Dusk => Self::Midnight,
            Self::Midnight => Self::PreDawn,
            Self::PreDawn | Self::Day => Self::Day,
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dusk => write!(f, "Dusk"),
            Self::Midnight => write!(f, "Midnight"),
            Self::PreDawn => write!(f, "Pre-Dawn"),
            Self::Day => write!(f, "Day"),
        }
    }
}

/// Progress of the rival storyline. Exactly one stage holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RivalArc {
    /// No rival plot is active.
    #[default]
    None,
    /// A plot against the player has been uncovered.
    Intrigue,
    /// The rival awaits at the Docks.
    Confrontation,
    /// The rival lies defeated; diablerie is possible.
    DiablerieOpportunity,
}

/// Everything that changes during play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The player character (immutable).
    pub character: Character,
    /// Blood pool, 0..=10.
    pub blood: i32,
    /// Humanity, 0..=7.
    pub humanity: i32,
    /// Hunger, 0..=5.
    pub hunger: i32,
    /// Count of blood-gaining actions.
    pub feeds: u32,
    /// Resistance to hunger growth, 0.0..=5.0. Never decreases.
    pub hunger_tolerance: f64,
    /// Current location.
    pub location: Location,
    /// Current phase of the night.
    pub time: TimeOfDay,
    /// Night counter, starting at 1.
    pub day: u32,
    /// Recent narrative lines, oldest first.
    pub event_log: Vec<String>,
    /// Lines ever appended to the event log, including evicted ones.
    #[serde(default)]
    pub lines_logged: u64,
    /// The prompt currently shown to the player.
    pub current_event: String,
    /// Actions the player may choose next. Derived; recomputed on every transition.
    pub available_actions: Vec<Action>,
    /// Set once when a terminal condition is reached.
    pub is_game_over: bool,
    /// Ending text; empty until the game is over.
    pub game_over_message: String,
    /// An enthralled mortal can be fed from at the haven.
    pub has_enthralled_mortal: bool,
    /// Rival storyline stage.
    pub rival_arc: RivalArc,
    /// The discipline has been spent this night.
    pub discipline_used: bool,
    /// Current generation.
    pub generation: i32,
    /// Political capital, never negative.
    pub influence: i32,
    /// Mortals cultivated as a herd, never negative.
    pub herd_size: i32,
    /// Upgrades owned; each at most once.
    pub haven_upgrades: BTreeSet<HavenUpgrade>,
    /// One-sentence summaries fed back to the oracle, oldest first.
    pub memory: Vec<String>,
    /// End-of-night journal entries. Append-only.
    pub chronicle: Vec<String>,
}

impl GameState {
    /// The opening state for a new character: at the haven, Dusk of Day 1.
    ///
    /// `available_actions` is left empty; the engine fills it in.
    pub fn initial(character: Character) -> Self {
        let start = Location::ALL[0];
        Self {
            generation: character.generation,
            character,
            blood: 5,
            humanity: HUMANITY_MAX,
            hunger: 1,
            feeds: 0,
            hunger_tolerance: 0.0,
            location: start,
            time: TimeOfDay::Dusk,
            day: 1,
            event_log: vec!["Night falls on Day 1. The city awakens, and so do you.".to_string()],
            lines_logged: 1,
            current_event: format!("You are in {}. {}", start.name(), start.description()),
            available_actions: Vec::new(),
            is_game_over: false,
            game_over_message: String::new(),
            has_enthralled_mortal: false,
            rival_arc: RivalArc::None,
            discipline_used: false,
            influence: 5,
            herd_size: 0,
            haven_upgrades: BTreeSet::new(),
            memory: Vec::new(),
            chronicle: Vec::new(),
        }
    }

    /// A rival plot has been uncovered.
    pub fn has_rival_intrigue(&self) -> bool {
        self.rival_arc == RivalArc::Intrigue
    }

    /// The rival confrontation is pending.
    pub fn has_rival_confrontation(&self) -> bool {
        self.rival_arc == RivalArc::Confrontation
    }

    /// The defeated rival can be diablerized.
    pub fn has_diablerie_opportunity(&self) -> bool {
        self.rival_arc == RivalArc::DiablerieOpportunity
    }

    /// Whether the given upgrade is owned.
    pub fn has_upgrade(&self, upgrade: HavenUpgrade) -> bool {
        self.haven_upgrades.contains(&upgrade)
    }

    /// Upgrades not yet built, in menu order.
    pub fn unowned_upgrades(&self) -> Vec<HavenUpgrade> {
        HavenUpgrade::ALL
            .into_iter()
            .filter(|u| !self.has_upgrade(*u))
            .collect()
    }

    /// Append a line to the event log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.event_log.push(line.into());
        self.lines_logged += 1;
    }

    /// Clamp every bounded resource into range.
    pub fn clamp_resources(&mut self) {
        self.blood = self.blood.clamp(0, BLOOD_MAX);
        self.humanity = self.humanity.clamp(0, HUMANITY_MAX);
        self.hunger = self.hunger.clamp(0, HUNGER_MAX);
        self.influence = self.influence.max(0);
        self.herd_size = self.herd_size.max(0);
    }

    /// Raise hunger tolerance, capped.
    pub fn raise_hunger_tolerance(&mut self, amount: f64) {
        self.hunger_tolerance = (self.hunger_tolerance + amount).min(HUNGER_TOLERANCE_MAX);
    }

    /// Drop the oldest event-log lines beyond the limit.
    pub fn trim_event_log(&mut self) {
        keep_most_recent(&mut self.event_log, EVENT_LOG_LIMIT);
    }

    /// Append a memory summary, dropping the oldest beyond the limit.
    pub fn remember(&mut self, summary: impl Into<String>) {
        self.memory.push(summary.into());
        keep_most_recent(&mut self.memory, MEMORY_LIMIT);
    }

    /// Whether all bounded fields are in range.
    pub fn within_bounds(&self) -> bool {
        (0..=BLOOD_MAX).contains(&self.blood)
            && (0..=HUMANITY_MAX).contains(&self.humanity)
            && (0..=HUNGER_MAX).contains(&self.hunger)
            && (0.0..=HUNGER_TOLERANCE_MAX).contains(&self.hunger_tolerance)
            && self.influence >= 0
            && self.herd_size >= 0
            && self.event_log.len() <= EVENT_LOG_LIMIT
            && self.memory.len() <= MEMORY_LIMIT
    }
}

/// Keep only the last `limit` entries, evicting oldest first.
pub fn keep_most_recent<T>(entries: &mut Vec<T>, limit: usize) {
    if entries.len() > limit {
        let excess = entries.len() - limit;
        entries.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, Gender};
    use crate::content::{Background, Race, VampireClass};
    use proptest::prelude::*;

    fn state() -> GameState {
        let c = Character::new(
            "Mara",
            Gender::Female,
            Race::Nosferatu,
            VampireClass::Shadowmancer,
            Background::StreetUrchin,
            Attributes::fallback(),
        )
        .unwrap();
        GameState::initial(c)
    }

    #[test]
    fn initial_values() {
        let s = state();
        assert_eq!((s.blood, s.humanity, s.hunger), (5, 7, 1));
        assert_eq!(s.influence, 5);
        assert_eq!(s.generation, 13);
        assert_eq!(s.location, Location::Haven);
        assert_eq!(s.time, TimeOfDay::Dusk);
        assert_eq!(s.day, 1);
        assert_eq!(s.event_log.len(), 1);
        assert!(s.current_event.starts_with("You are in Your Haven."));
        assert!(s.within_bounds());
    }

    #[test]
    fn time_does_not_wrap() {
        assert_eq!(TimeOfDay::Dusk.next(), TimeOfDay::Midnight);
        assert_eq!(TimeOfDay::Midnight.next(), TimeOfDay::PreDawn);
        assert_eq!(TimeOfDay::PreDawn.next(), TimeOfDay::Day);
        assert_eq!(TimeOfDay::Day.next(), TimeOfDay::Day);
        assert_eq!(TimeOfDay::PreDawn.to_string(), "Pre-Dawn");
    }

    #[test]
    fn rival_arc_accessors_are_exclusive() {
        let mut s = state();
        s.rival_arc = RivalArc::Confrontation;
        assert!(!s.has_rival_intrigue());
        assert!(s.has_rival_confrontation());
        assert!(!s.has_diablerie_opportunity());
    }

    #[test]
    fn keep_most_recent_evicts_oldest() {
        let mut v: Vec<u32> = (0..25).collect();
        keep_most_recent(&mut v, 20);
        assert_eq!(v.len(), 20);
        assert_eq!(v[0], 5);
        assert_eq!(*v.last().unwrap(), 24);
    }

    #[test]
    fn logged_line_count_survives_eviction() {
        let mut s = state();
        for _ in 0..30 {
            s.log("The night is quiet.");
        }
        s.trim_event_log();
        assert_eq!(s.event_log.len(), EVENT_LOG_LIMIT);
        assert_eq!(s.lines_logged, 31);
    }

    #[test]
    fn remember_is_bounded() {
        let mut s = state();
        for i in 0..35 {
            s.remember(format!("memory {i}"));
        }
        assert_eq!(s.memory.len(), MEMORY_LIMIT);
        assert_eq!(s.memory[0], "memory 5");
    }

    #[test]
    fn tolerance_is_capped() {
        let mut s = state();
        s.hunger_tolerance = 4.9;
        s.raise_hunger_tolerance(0.2);
        assert!((s.hunger_tolerance - HUNGER_TOLERANCE_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn unowned_upgrades_in_menu_order() {
        let mut s = state();
        s.haven_upgrades.insert(HavenUpgrade::SecureCrypt);
        assert_eq!(
            s.unowned_upgrades(),
            vec![HavenUpgrade::Library, HavenUpgrade::BloodCellar]
        );
    }

    proptest! {
        #[test]
        fn clamp_always_lands_in_bounds(
            blood in -50i32..50,
            humanity in -50i32..50,
            hunger in -50i32..50,
            influence in -50i32..50,
            herd in -50i32..50,
        ) {
            let mut s = state();
            s.blood = blood;
            s.humanity = humanity;
            s.hunger = hunger;
            s.influence = influence;
            s.herd_size = herd;
            s.clamp_resources();
            prop_assert!(s.within_bounds());
        }
    }
}
