//! The structured outcome record returned by the narrative oracle.

use nf_core::HavenUpgrade;
use serde::{Deserialize, Serialize};

/// A narrative-arc transition proposed by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorylineChange {
    /// A mortal becomes the player's thrall.
    AddInfatuatedMortal,
    /// The thrall departs.
    RemoveInfatuatedMortal,
    /// A rival plot is uncovered.
    AddRivalIntrigue,
    /// Accepted from the oracle, but carries no transition.
    RemoveRivalIntrigue,
    /// The intrigue escalates into a confrontation at the Docks.
    TriggerRivalConfrontation,
    /// The rival is defeated and lies helpless.
    TriggerDiablerieOpportunity,
    /// The rival storyline closes.
    ConcludeRivalArc,
}

impl StorylineChange {
    /// All tags, in wire order.
    pub const ALL: [StorylineChange; 7] = [
        StorylineChange::AddInfatuatedMortal,
        StorylineChange::RemoveInfatuatedMortal,
        StorylineChange::AddRivalIntrigue,
        StorylineChange::RemoveRivalIntrigue,
        StorylineChange::TriggerRivalConfrontation,
        StorylineChange::TriggerDiablerieOpportunity,
        StorylineChange::ConcludeRivalArc,
    ];

    /// The tag as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddInfatuatedMortal => "ADD_INFATUATED_MORTAL",
            Self::RemoveInfatuatedMortal => "REMOVE_INFATUATED_MORTAL",
            Self::AddRivalIntrigue => "ADD_RIVAL_INTRIGUE",
            Self::RemoveRivalIntrigue => "REMOVE_RIVAL_INTRIGUE",
            Self::TriggerRivalConfrontation => "TRIGGER_RIVAL_CONFRONTATION",
            Self::TriggerDiablerieOpportunity => "TRIGGER_DIABLERIE_OPPORTUNITY",
            Self::ConcludeRivalArc => "CONCLUDE_RIVAL_ARC",
        }
    }
}

impl std::fmt::Display for StorylineChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when the player acted, and the proposed numeric deltas.
///
/// Optional deltas default to zero here, at the deserialization boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    /// Narrative description shown to the player.
    #[serde(rename = "outcomeDescription")]
    pub description: String,
    /// Blood delta.
    pub blood_change: i32,
    /// Humanity delta.
    pub humanity_change: i32,
    /// Hunger delta.
    pub hunger_change: i32,
    /// Whether the night advances one phase.
    pub time_passed: bool,
    /// Extra hunger tolerance; only positive values apply.
    #[serde(default)]
    pub hunger_tolerance_change: f64,
    /// Narrative-arc transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyline_change: Option<StorylineChange>,
    /// Influence delta.
    #[serde(default)]
    pub influence_change: i32,
    /// Generation delta.
    #[serde(default)]
    pub generation_change: i32,
    /// Herd-size delta.
    #[serde(default)]
    pub herd_size_change: i32,
    /// Upgrade whose construction completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_haven_upgrade: Option<HavenUpgrade>,
}

impl ActionOutcome {
    /// An outcome with only the required fields set.
    pub fn new(
        description: impl Into<String>,
        blood_change: i32,
        humanity_change: i32,
        hunger_change: i32,
        time_passed: bool,
    ) -> Self {
        Self {
            description: description.into(),
            blood_change,
            humanity_change,
            hunger_change,
            time_passed,
            ..Self::default()
        }
    }

    /// Attach a storyline change.
    pub fn with_storyline(mut self, change: StorylineChange) -> Self {
        self.storyline_change = Some(change);
        self
    }

    /// Attach an influence delta.
    pub fn with_influence(mut self, delta: i32) -> Self {
        self.influence_change = delta;
        self
    }

    /// Attach a generation delta.
    pub fn with_generation(mut self, delta: i32) -> Self {
        self.generation_change = delta;
        self
    }

    /// Attach a herd-size delta.
    pub fn with_herd(mut self, delta: i32) -> Self {
        self.herd_size_change = delta;
        self
    }

    /// Attach a hunger-tolerance delta.
    pub fn with_hunger_tolerance(mut self, delta: f64) -> Self {
        self.hunger_tolerance_change = delta;
        self
    }

    /// Confirm construction of an upgrade.
    pub fn with_upgrade(mut self, upgrade: HavenUpgrade) -> Self {
        self.new_haven_upgrade = Some(upgrade);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storyline_wire_names_match_serde() {
        for change in StorylineChange::ALL {
            let json = serde_json::to_string(&change).unwrap();
            assert_eq!(json, format!("\"{}\"", change.as_str()));
        }
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let o: ActionOutcome = serde_json::from_str(
            r#"{"outcomeDescription":"x","bloodChange":1,"humanityChange":0,"hungerChange":-1,"timePassed":true}"#,
        )
        .unwrap();
        assert_eq!(o.influence_change, 0);
        assert_eq!(o.generation_change, 0);
        assert_eq!(o.herd_size_change, 0);
        assert!(o.storyline_change.is_none());
        assert!(o.new_haven_upgrade.is_none());
    }
}
