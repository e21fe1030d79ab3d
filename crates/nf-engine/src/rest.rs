//! The day-advancement transition.

use nf_core::state::HUNGER_MAX;
use nf_core::{GameState, HavenUpgrade, TimeOfDay};

use crate::apply::settle_game_over;
use crate::oracle::NarrativeOracle;
use crate::resolver::resolve_actions;

/// Chronicle text used when the oracle cannot summarize the night.
pub const CHRONICLE_FALLBACK: &str =
    "The events of this night are a blur, lost to the fog of ages.";

/// Sleep through the day and wake at dusk of the next night.
///
/// If the night left any memories, the oracle is asked for a chronicle
/// entry first; an oracle failure is replaced by [`CHRONICLE_FALLBACK`] and
/// never aborts the transition. Blood regenerates by one (two with a Secure
/// Crypt) and hunger grows by one (not at all with a Blood Cellar). The
/// terminal check of ordinary actions also runs here, since the hunger edge
/// can drain the last point of humanity.
pub async fn sleep_through_day<O>(oracle: &O, state: &GameState) -> GameState
where
    O: NarrativeOracle + ?Sized,
{
    let mut next = state.clone();

    if !state.memory.is_empty() {
        let entry = match oracle.generate_chronicle_entry(state).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, day = state.day, "chronicle entry unavailable");
                CHRONICLE_FALLBACK.to_string()
            }
        };
        next.chronicle
            .push(format!("Night of Day {}: {}", state.day, entry.trim()));
    }

    next.day += 1;
    next.time = TimeOfDay::Dusk;
    next.discipline_used = false;

    let blood_gain = if next.has_upgrade(HavenUpgrade::SecureCrypt) {
        next.log(
            "Your Secure Crypt shields you from the sun, granting a deeper, more restorative slumber.",
        );
        2
    } else {
        1
    };
    let hunger_gain = if next.has_upgrade(HavenUpgrade::BloodCellar) {
        next.log("Your Blood Cellar provides sustenance through your slumber, keeping the Beast at bay.");
        0
    } else {
        1
    };

    next.blood += blood_gain;
    next.hunger += hunger_gain;
    next.clamp_resources();

    if next.hunger >= HUNGER_MAX && state.hunger < HUNGER_MAX {
        next.humanity -= 1;
        next.clamp_resources();
        next.log(
            "You awaken from your day's slumber with a gnawing, desperate hunger that clouds \
             your thoughts. Your grip on humanity weakens.",
        );
    }

    next.log(format!(
        "You have slept through the day. Night falls on Day {}. You feel restored.",
        next.day
    ));
    next.log("Your inner power coalesces once more with the coming of the night.");
    next.current_event = format!(
        "The sun has set. You are in {}, ready for the new night.",
        next.location
    );

    next.available_actions = resolve_actions(next.location, &next, next.time);
    next.trim_event_log();
    settle_game_over(&mut next);

    tracing::debug!(
        day = next.day,
        blood = next.blood,
        hunger = next.hunger,
        "slept through the day"
    );
    next
}
