//! Outcome application.
//!
//! Folds an oracle outcome into a state, producing the next state. The
//! steps run in a fixed order: log, discipline, storyline, construction,
//! deltas, feeding, tolerance, hunger edge, clamp, time, actions, trim,
//! terminal check.

use nf_core::state::{APOTHEOSIS_GENERATION, HUNGER_MAX};
use nf_core::{Action, GameState, Location, RivalArc, TimeOfDay};

use crate::outcome::{ActionOutcome, StorylineChange};
use crate::resolver::resolve_actions;

/// Every this many feedings, hunger tolerance grows.
pub const FEEDS_PER_TOLERANCE_STEP: u32 = 10;
/// Tolerance gained per step.
pub const TOLERANCE_STEP: f64 = 0.2;

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Blood ran dry; the Beast took over.
    Frenzy,
    /// Humanity reached zero.
    LostHumanity,
    /// Generation fell to the apotheosis threshold.
    DarkApotheosis,
}

impl Ending {
    /// The first terminal condition that holds, in priority order.
    pub fn check(state: &GameState) -> Option<Self> {
        if state.blood <= 0 {
            Some(Self::Frenzy)
        } else if state.humanity <= 0 {
            Some(Self::LostHumanity)
        } else if state.generation <= APOTHEOSIS_GENERATION {
            Some(Self::DarkApotheosis)
        } else {
            None
        }
    }

    /// The closing text.
    pub fn message(self) -> &'static str {
        match self {
            Self::Frenzy => {
                "Your blood runs dry. The Beast within awakens, a feral, mindless thing. \
                 You are lost to the Hunger."
            }
            Self::LostHumanity => {
                "The last vestiges of your mortal self have withered away. You are no longer a \
                 person, merely a monster. Your story ends here."
            }
            Self::DarkApotheosis => {
                "You have consumed the heartsblood of the ancients. Your power is terrifying, \
                 legendary... but the thirst is now endless. This is not a life. It is an \
                 eternal, ravenous end."
            }
        }
    }

    /// The headline event shown in place of the current prompt.
    pub fn event(self) -> &'static str {
        match self {
            Self::Frenzy => "You have entered a state of frenzy!",
            Self::LostHumanity => "You have lost your humanity.",
            Self::DarkApotheosis => "You have achieved a dark apotheosis.",
        }
    }
}

/// Mark the state terminal if an ending condition holds. Returns the ending.
pub fn settle_game_over(state: &mut GameState) -> Option<Ending> {
    let ending = Ending::check(state)?;
    tracing::info!(?ending, day = state.day, "game over");
    state.is_game_over = true;
    state.game_over_message = ending.message().to_string();
    state.current_event = ending.event().to_string();
    state.available_actions.clear();
    Some(ending)
}

/// Apply `outcome` of `action` to `state`, returning the next state.
pub fn apply_outcome(state: &GameState, action: Action, outcome: &ActionOutcome) -> GameState {
    let mut next = state.clone();
    next.log(format!("> You chose to {action}."));
    next.log(outcome.description.clone());
    next.current_event = outcome.description.clone();

    if action.is_discipline() {
        next.discipline_used = true;
        next.log("Your powerful discipline is spent for the night.");
    }

    if let Some(change) = outcome.storyline_change {
        apply_storyline(&mut next, change);
    }

    let completed = match (action, outcome.new_haven_upgrade) {
        (Action::Build(requested), Some(built)) if built == requested => Some(requested),
        _ => None,
    };
    if let Some(requested) = completed.filter(|u| !state.has_upgrade(*u)) {
        next.haven_upgrades.insert(requested);
        next.influence = next.influence.saturating_sub(requested.influence_cost());
        next.log(format!(
            "Construction is complete. The {requested} is now a permanent part of your Haven."
        ));
    }

    let raw_hunger = state.hunger.saturating_add(outcome.hunger_change);
    next.blood = state.blood.saturating_add(outcome.blood_change);
    next.humanity = state.humanity.saturating_add(outcome.humanity_change);
    next.hunger = raw_hunger;
    next.influence = next.influence.saturating_add(outcome.influence_change);
    next.generation = next.generation.saturating_add(outcome.generation_change);
    next.herd_size = next.herd_size.saturating_add(outcome.herd_size_change);

    if outcome.blood_change > 0 {
        next.feeds = next.feeds.saturating_add(1);
        if next.feeds % FEEDS_PER_TOLERANCE_STEP == 0 {
            next.raise_hunger_tolerance(TOLERANCE_STEP);
            next.log("Your body adapts to the eternal thirst. Your hunger tolerance has increased.");
        }
    }

    if outcome.hunger_tolerance_change > 0.0 {
        next.raise_hunger_tolerance(outcome.hunger_tolerance_change);
        next.log(
            "This encounter has deeply affected you, hardening your resolve against the Beast. \
             Your hunger tolerance has increased significantly.",
        );
    }

    if raw_hunger >= HUNGER_MAX && state.hunger < HUNGER_MAX {
        next.humanity = next.humanity.saturating_sub(1);
        next.log(
            "A wave of insatiable hunger washes over you, momentarily eclipsing your reason. \
             Your grip on humanity slips.",
        );
    }

    next.clamp_resources();

    if outcome.time_passed {
        advance_time(&mut next);
    }

    next.available_actions = resolve_actions(next.location, &next, next.time);
    next.trim_event_log();
    settle_game_over(&mut next);

    tracing::debug!(
        %action,
        blood = next.blood,
        humanity = next.humanity,
        hunger = next.hunger,
        time = %next.time,
        "applied outcome"
    );
    debug_assert!(next.within_bounds(), "resources out of bounds after {action}");
    next
}

fn apply_storyline(state: &mut GameState, change: StorylineChange) {
    let line = match change {
        StorylineChange::AddInfatuatedMortal => {
            state.has_enthralled_mortal = true;
            "You feel a new, powerful connection to this mortal. They are now your thrall. \
             This may unlock new opportunities."
        }
        StorylineChange::RemoveInfatuatedMortal => {
            state.has_enthralled_mortal = false;
            "Your thrall departs, the connection severed for now, leaving you sated and in control."
        }
        StorylineChange::AddRivalIntrigue => {
            state.rival_arc = RivalArc::Intrigue;
            "You've uncovered the whispers of a plot against you. A new front has opened in \
             the eternal Jyhad."
        }
        StorylineChange::RemoveRivalIntrigue => return,
        StorylineChange::TriggerRivalConfrontation => {
            state.rival_arc = RivalArc::Confrontation;
            "The shadow war with your rival is over. Now, it is time for blood. Your rival \
             will be at the Docks."
        }
        StorylineChange::TriggerDiablerieOpportunity => {
            state.rival_arc = RivalArc::DiablerieOpportunity;
            "You have utterly defeated your rival. Their vitae lies helpless before you, a feast \
             for the taking. This is the ultimate taboo, but the power..."
        }
        StorylineChange::ConcludeRivalArc => {
            state.rival_arc = RivalArc::None;
            "You've struck a decisive blow against your rival, closing this chapter of the \
             shadow war. But the night is long, and enemies are everywhere."
        }
    };
    state.log(line);
}

/// Move one phase along the night. Entering Day outside the haven costs
/// blood and humanity and drags the player home.
fn advance_time(state: &mut GameState) {
    if state.time == TimeOfDay::Day {
        return;
    }
    state.time = state.time.next();
    if state.time != TimeOfDay::Day {
        state.log(format!("The night deepens. It is now {}.", state.time));
        return;
    }

    state.log(
        "The sun begins to rise, its harsh light banishing the shadows. The day is for mortals.",
    );
    if state.location == Location::Haven {
        state.current_event = "The sun rises, bathing the city in light. You are safe within \
                               your Haven, shielded from its deadly embrace."
            .to_string();
    } else {
        state.log(
            "Caught outside your sanctum, the sun's touch sears your ancient flesh. You flee in \
             pain and desperation back to your Haven.",
        );
        state.blood = state.blood.saturating_sub(1);
        state.humanity = state.humanity.saturating_sub(1);
        state.clamp_resources();
        state.location = Location::Haven;
        state.current_event = "You barely make it back to your Haven, the sun's unforgiving rays \
                               a painful memory. You must rest and wait for night to fall again."
            .to_string();
    }
}
