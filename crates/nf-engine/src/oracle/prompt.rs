//! Prompt construction for language-model oracles.

use nf_core::{Action, Background, GameState, Gender, Location, Race, VampireClass};

use crate::outcome::StorylineChange;

/// How many recent memories are included as context.
pub const MEMORY_CONTEXT: usize = 15;

fn recent_memories(state: &GameState) -> &[String] {
    let start = state.memory.len().saturating_sub(MEMORY_CONTEXT);
    &state.memory[start..]
}

/// Build the prompt asking for the outcome of `action`.
pub fn action_outcome_prompt(state: &GameState, action: Action) -> String {
    let c = &state.character;
    let a = &c.attributes;
    let upgrades = if state.haven_upgrades.is_empty() {
        "None".to_string()
    } else {
        state
            .haven_upgrades
            .iter()
            .map(|u| u.name())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = format!(
        "You are a dark fantasy RPG game master. The player character is {name}, a {gender} {race} {class} of the {generation}th Generation.\n\
         Their mortal background was \"{bg}\": \"{bg_desc}\". It grants a narrative bonus: \"{bonus}\". Factor it into your descriptions.\n\
         Attributes: Strength {st}, Dexterity {dx}, Charisma {ch}, Fortitude {fo}, Celerity {ce}, Dominate {dm}.\n\
         They have {blood}/10 Blood, {humanity}/7 Humanity, and {hunger}/5 Hunger. Hunger tolerance is {tolerance:.1}.\n\
         Influence: {influence}, Herd Size: {herd}, Haven Upgrades: {upgrades}.\n\
         The current time is {time} and they are at {location}.\n",
        name = c.name,
        gender = c.gender,
        race = c.race,
        class = c.class,
        generation = state.generation,
        bg = c.background,
        bg_desc = c.background.description(),
        bonus = c.background.bonus(),
        st = a.strength,
        dx = a.dexterity,
        ch = a.charisma,
        fo = a.fortitude,
        ce = a.celerity,
        dm = a.dominate,
        blood = state.blood,
        humanity = state.humanity,
        hunger = state.hunger,
        tolerance = state.hunger_tolerance,
        influence = state.influence,
        herd = state.herd_size,
        time = state.time,
        location = state.location,
    );

    let memories = recent_memories(state);
    if !memories.is_empty() {
        prompt.push_str("Long-term Memory (Significant Past Events):\n");
        for m in memories {
            prompt.push_str(&format!("- {m}\n"));
        }
    }

    prompt.push_str(&format!(
        "The player chooses to: \"{action}\".\n\n\
         Describe the outcome of this action in a single, dramatic paragraph. A high attribute relevant \
         to the action should lead to a better outcome. Then provide the numerical changes. Hunger runs \
         from 0 (sated) to 5 (ravenous). When time passes and the action did not involve feeding, hunger \
         should normally increase by 1, less often the higher their hunger tolerance. Feeding reduces hunger."
    ));

    if let Some(instruction) = special_instruction(state.location, action) {
        prompt.push_str("\n\nSPECIAL INSTRUCTION: ");
        prompt.push_str(&instruction);
    }

    prompt.push_str(
        "\n\nReturn ONLY a valid JSON object with the fields outcomeDescription (string), \
         bloodChange, humanityChange, hungerChange (integers), timePassed (boolean), and optionally \
         hungerToleranceChange (number), storylineChange, influenceChange, generationChange, \
         herdSizeChange (integers) and newHavenUpgrade.",
    );
    prompt
}

/// Extra direction for actions with fixed narrative consequences.
fn special_instruction(location: Location, action: Action) -> Option<String> {
    let text = match (location, action) {
        (_, Action::Unleash(_)) => "This is the character's unique, once-per-night Discipline. \
             The outcome must be significant and successful, a display of supernatural power. \
             Ensure timePassed is false for instantaneous effects."
            .to_string(),
        (_, Action::Build(upgrade)) => format!(
            "The player is building the \"{upgrade}\" for their Haven. Describe the process and the \
             result. You MUST include \"newHavenUpgrade\": \"{upgrade}\". This action should not pass time."
        ),
        (Location::NeonStrip, Action::CharmMortal) => format!(
            "If Charisma or Dominate is high (4+), the mortal may join the character's Herd; if so \
             include \"herdSizeChange\": 1. Consider \"storylineChange\": \"{}\" if they become a \
             particularly special thrall.",
            StorylineChange::AddInfatuatedMortal
        ),
        (Location::Haven, Action::FeedFromThrall) => format!(
            "A safe, controlled feeding from the enthralled mortal. Significant blood gain (+4), \
             hunger reduced by 3 or more, NO humanity cost, and time does NOT pass. You MUST include \
             \"storylineChange\": \"{}\".",
            StorylineChange::RemoveInfatuatedMortal
        ),
        (Location::Haven, Action::CultivateHerd) => "A careful, sustainable feeding from the herd. \
             Moderate blood gain (+2), hunger reduction (-2), no humanity cost, and a small chance to \
             grow the herd or gain influence. Time must pass."
            .to_string(),
        (Location::Haven, Action::RestAndMeditate) => "A safe action that NEVER passes time. Restore \
             1 Blood (if not max) and increase Hunger by 1. No negative outcome. A Library gives a \
             small chance of 1 Influence. timePassed must be false."
            .to_string(),
        (Location::ElysianFields, Action::SchemeWithPrimogen) => format!(
            "If Charisma or Dominate is high (4+), they may uncover a rival's plot. If so you MUST \
             include \"storylineChange\": \"{}\". This is a purely social victory.",
            StorylineChange::AddRivalIntrigue
        ),
        (Location::Docks, Action::InvestigateRivalAssets) => format!(
            "They find something significant about their rival. You MUST set \"storylineChange\": \"{}\".",
            StorylineChange::TriggerRivalConfrontation
        ),
        (_, Action::ConfrontRival) => format!(
            "The final confrontation. The player MUST win, at a cost (e.g. blood loss). You MUST set \
             \"storylineChange\": \"{}\".",
            StorylineChange::TriggerDiablerieOpportunity
        ),
        (_, Action::CommitDiablerie) => format!(
            "The ultimate taboo: consuming another vampire's soul. You MUST include \
             \"generationChange\": -1, \"humanityChange\": -3, \"influenceChange\": 10 and \
             \"storylineChange\": \"{}\".",
            StorylineChange::ConcludeRivalArc
        ),
        (_, Action::WalkAway) => format!(
            "The player spares their helpless rival. Include \"humanityChange\": 2 and \
             \"storylineChange\": \"{}\".",
            StorylineChange::ConcludeRivalArc
        ),
        _ => return None,
    };
    Some(text)
}

/// Build the prompt asking for a one-sentence memory.
pub fn memory_summary_prompt(action: Action, description: &str) -> String {
    format!(
        "Based on the action \"{action}\" and the outcome \"{description}\", write a very concise, \
         one-sentence memory summary in the third person. Example: \"Convinced a smuggler to reveal a \
         secret.\" State only what occurred. Return only the sentence."
    )
}

/// Build the prompt asking for the end-of-night chronicle entry.
pub fn chronicle_prompt(state: &GameState) -> String {
    let mut prompt = format!(
        "You are the vampire {}. Write a first-person journal entry reflecting on the past night in a \
         gothic, introspective, world-weary tone. Synthesize these memories into one paragraph:\n",
        state.character.name
    );
    for m in recent_memories(state) {
        prompt.push_str(&format!("- {m}\n"));
    }
    prompt.push_str(&format!(
        "Reflect on successes, failures, the Hunger (currently {}/5) and slipping Humanity \
         (currently {}/7). No date or salutation. Return only the entry text.",
        state.hunger, state.humanity
    ));
    prompt
}

/// Build the prompt asking for a starting attribute spread.
pub fn attributes_prompt(
    gender: Gender,
    race: Race,
    class: VampireClass,
    background: Background,
) -> String {
    format!(
        "Based on a {gender} {race} {class} vampire with a mortal background as a \"{background}\" \
         in a dark fantasy RPG, generate a balanced set of starting attributes: strength, dexterity, \
         charisma, fortitude, celerity, and dominate. The attributes should reflect their background. \
         The total points must sum to exactly 15, with no single attribute higher than 5 or lower \
         than 1. Return ONLY a JSON object with those six integer fields."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::new_state;
    use nf_core::HavenUpgrade;

    #[test]
    fn outcome_prompt_includes_sheet_and_action() {
        let s = new_state();
        let p = action_outcome_prompt(&s, Action::RestAndMeditate);
        assert!(p.contains("Vesper"));
        assert!(p.contains("5/10 Blood"));
        assert!(p.contains("Haven Upgrades: None"));
        assert!(p.contains("\"Rest and Meditate\""));
        assert!(p.contains("timePassed must be false"));
        assert!(!p.contains("Long-term Memory"));
    }

    #[test]
    fn build_prompt_names_the_upgrade() {
        let s = new_state();
        let p = action_outcome_prompt(&s, Action::Build(HavenUpgrade::BloodCellar));
        assert!(p.contains("\"newHavenUpgrade\": \"Blood Cellar\""));
    }

    #[test]
    fn only_recent_memories_are_sent() {
        let mut s = new_state();
        for i in 0..20 {
            s.remember(format!("event-{i:02}"));
        }
        let p = action_outcome_prompt(&s, Action::HuntForBlood);
        assert!(!p.contains("event-04"));
        assert!(p.contains("event-05"));
        assert!(p.contains("event-19"));
    }

    #[test]
    fn location_specific_instruction_requires_location() {
        assert!(special_instruction(Location::NeonStrip, Action::CharmMortal).is_some());
        assert!(special_instruction(Location::Docks, Action::CharmMortal).is_none());
        assert!(special_instruction(Location::Docks, Action::HuntForBlood).is_none());
    }

    #[test]
    fn attributes_prompt_names_the_concept() {
        let p = attributes_prompt(
            Gender::Male,
            Race::Nosferatu,
            VampireClass::BloodKnight,
            Background::StreetUrchin,
        );
        assert!(p.contains("Male Nosferatu Blood Knight"));
        assert!(p.contains("\"Street Urchin\""));
        assert!(p.contains("exactly 15"));
    }

    #[test]
    fn chronicle_prompt_mentions_vitals() {
        let mut s = new_state();
        s.remember("Fed on a dockworker.");
        let p = chronicle_prompt(&s);
        assert!(p.contains("- Fed on a dockworker."));
        assert!(p.contains("currently 1/5"));
    }
}
