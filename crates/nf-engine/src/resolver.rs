//! Action availability.
//!
//! Derives the ordered list of actions a state offers. Pure: identical
//! inputs always give identical output.

use nf_core::{Action, GameState, Location, TimeOfDay};

/// The actions legally presentable at `location` and `time` given the
/// flags in `state`. First matching rule wins:
///
/// 1. A pending diablerie opportunity offers only the choice itself.
/// 2. During the day only the haven offers anything (sleep).
/// 3. Otherwise each location has a base list plus conditional extras,
///    with `Travel...` always last.
pub fn resolve_actions(location: Location, state: &GameState, time: TimeOfDay) -> Vec<Action> {
    if state.has_diablerie_opportunity() {
        return vec![Action::CommitDiablerie, Action::WalkAway];
    }

    if time == TimeOfDay::Day {
        return match location {
            Location::Haven => vec![Action::SleepUntilDusk],
            _ => Vec::new(),
        };
    }

    let mut actions = match location {
        Location::Haven => {
            let mut actions = vec![
                Action::RestAndMeditate,
                Action::StudyAncientTexts,
                Action::DevelopHaven,
            ];
            if state.has_enthralled_mortal {
                actions.push(Action::FeedFromThrall);
            }
            if state.herd_size > 0 {
                actions.push(Action::CultivateHerd);
            }
            if !state.discipline_used {
                actions.push(Action::Unleash(state.character.discipline()));
            }
            actions
        }
        Location::ElysianFields => vec![Action::ObserveCourt, Action::SchemeWithPrimogen],
        Location::IndustrialSlums => vec![
            Action::HuntForBlood,
            Action::IntimidateGang,
            Action::EstablishHiddenLair,
        ],
        Location::NeonStrip => vec![Action::HuntAmongstCrowds, Action::CharmMortal],
        Location::Docks => {
            let mut actions = vec![
                Action::FeedOnDockworker,
                Action::InterrogateSmuggler,
                Action::SabotageShipment,
            ];
            if state.has_rival_intrigue() {
                actions.push(Action::InvestigateRivalAssets);
            }
            if state.has_rival_confrontation() {
                actions.push(Action::ConfrontRival);
            }
            actions
        }
    };
    actions.push(Action::Travel);
    actions
}

/// Travel targets: every location except the current one.
pub fn travel_destinations(current: Location) -> Vec<Action> {
    Location::ALL
        .into_iter()
        .filter(|l| *l != current)
        .map(Action::GoTo)
        .collect()
}
