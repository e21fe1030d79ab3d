//! Player-facing actions.
//!
//! Action labels are classified into an [`Action`] once, at the boundary,
//! and dispatched on by variant everywhere else. [`std::fmt::Display`]
//! renders the label shown to the player and sent to the narrative oracle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::{Discipline, HavenUpgrade, Location};

/// Something the player can choose to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Open the travel menu.
    Travel,
    /// Go to a location (offered by the travel menu).
    GoTo(Location),
    /// Open the haven-upgrade menu.
    DevelopHaven,
    /// Construct a haven upgrade.
    Build(HavenUpgrade),
    /// Invoke the character's discipline (once per night).
    Unleash(Discipline),
    /// Rest through the day, advancing to the next night.
    SleepUntilDusk,
    /// Haven: safe recovery.
    RestAndMeditate,
    /// Haven: research.
    StudyAncientTexts,
    /// Haven: feed from an enthralled mortal.
    FeedFromThrall,
    /// Haven: tend the herd.
    CultivateHerd,
    /// Elysian Fields.
    ObserveCourt,
    /// Elysian Fields.
    SchemeWithPrimogen,
    /// Industrial Slums.
    HuntForBlood,
    /// Industrial Slums.
    IntimidateGang,
    /// Industrial Slums.
    EstablishHiddenLair,
    /// Neon Strip.
    HuntAmongstCrowds,
    /// Neon Strip.
    CharmMortal,
    /// Docks.
    FeedOnDockworker,
    /// Docks.
    InterrogateSmuggler,
    /// Docks.
    SabotageShipment,
    /// Docks, while the rival intrigue is open.
    InvestigateRivalAssets,
    /// Docks, once the rival confrontation is triggered.
    ConfrontRival,
    /// Consume the defeated rival.
    CommitDiablerie,
    /// Spare the defeated rival.
    WalkAway,
}

/// Labels for actions that carry no payload.
const FIXED_LABELS: &[(Action, &str)] = &[
    (Action::Travel, "Travel..."),
    (Action::DevelopHaven, "Develop your Haven"),
    (Action::SleepUntilDusk, "Sleep until Dusk"),
    (Action::RestAndMeditate, "Rest and Meditate"),
    (Action::StudyAncientTexts, "Study Ancient Texts"),
    (Action::FeedFromThrall, "Feed from your Thrall"),
    (Action::CultivateHerd, "Cultivate Herd"),
    (Action::ObserveCourt, "Observe the Court"),
    (Action::SchemeWithPrimogen, "Scheme with a Primogen"),
    (Action::HuntForBlood, "Hunt for Blood"),
    (Action::IntimidateGang, "Intimidate a Gang"),
    (Action::EstablishHiddenLair, "Establish a Hidden Lair"),
    (Action::HuntAmongstCrowds, "Hunt Amongst the Crowds"),
    (Action::CharmMortal, "Charm a Mortal"),
    (Action::FeedOnDockworker, "Feed on a Dockworker"),
    (Action::InterrogateSmuggler, "Interrogate a Smuggler"),
    (Action::SabotageShipment, "Sabotage a Rival's Shipment"),
    (Action::InvestigateRivalAssets, "Investigate your Rival's Assets"),
    (Action::ConfrontRival, "Confront Rival"),
    (Action::CommitDiablerie, "Commit Diablerie"),
    (Action::WalkAway, "Walk Away"),
];

const BUILD_PREFIX: &str = "Build ";
const UNLEASH_PREFIX: &str = "Unleash ";

/// Why an action label could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    /// `Build <name>` where the name is not a known upgrade.
    #[error("unknown haven upgrade: \"{0}\"")]
    UnknownUpgrade(String),

    /// `Unleash <name>` where the name is not a known discipline.
    #[error("unknown discipline: \"{0}\"")]
    UnknownDiscipline(String),

    /// The label matches no action at all.
    #[error("unknown action: \"{0}\"")]
    Unknown(String),
}

impl Action {
    /// Classify an action label (case-insensitive).
    pub fn parse(label: &str) -> Result<Self, ActionParseError> {
        let trimmed = label.trim();

        if let Some(&(action, _)) = FIXED_LABELS
            .iter()
            .find(|(_, l)| l.eq_ignore_ascii_case(trimmed))
        {
            return Ok(action);
        }
        if let Some(location) = Location::from_name(trimmed) {
            return Ok(Self::GoTo(location));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, BUILD_PREFIX) {
            return HavenUpgrade::from_name(rest)
                .map(Self::Build)
                .ok_or_else(|| ActionParseError::UnknownUpgrade(rest.to_string()));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, UNLEASH_PREFIX) {
            return Discipline::from_name(rest)
                .map(Self::Unleash)
                .ok_or_else(|| ActionParseError::UnknownDiscipline(rest.to_string()));
        }
        Err(ActionParseError::Unknown(trimmed.to_string()))
    }

    /// Whether this is a discipline invocation.
    pub fn is_discipline(&self) -> bool {
        matches!(self, Self::Unleash(_))
    }

    /// Whether this action is resolved locally, without the narrative oracle.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Travel | Self::GoTo(_) | Self::DevelopHaven | Self::SleepUntilDusk
        )
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(s[prefix.len()..].trim())
    } else {
        None
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoTo(location) => write!(f, "{location}"),
            Self::Build(upgrade) => write!(f, "{BUILD_PREFIX}{upgrade}"),
            Self::Unleash(discipline) => write!(f, "{UNLEASH_PREFIX}{discipline}"),
            other => {
                let label = FIXED_LABELS
                    .iter()
                    .find(|(a, _)| a == other)
                    .map(|(_, l)| *l)
                    .unwrap_or("Unknown Action");
                f.write_str(label)
            }
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
