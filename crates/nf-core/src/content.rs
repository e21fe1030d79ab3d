//! Static content tables.
//!
//! Every table is a closed enum: races, vampire classes (each bound to one
//! discipline), mortal backgrounds, city locations, and haven upgrades. The
//! tables carry descriptive text and, for upgrades, an influence cost. They
//! have no behavior beyond lookup.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn find_by_name<T: Copy>(all: &[T], name: &str, name_of: fn(T) -> &'static str) -> Option<T> {
    let needle = name.trim();
    all.iter()
        .copied()
        .find(|item| name_of(*item).eq_ignore_ascii_case(needle))
}

/// A vampiric bloodline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    /// Elegant, aristocratic predators.
    Sanguine,
    /// Monstrous information brokers of the sewers.
    Nosferatu,
    /// Feral hunters close to the Beast.
    Strigoi,
}

impl Race {
    /// All races in presentation order.
    pub const ALL: [Race; 3] = [Race::Sanguine, Race::Nosferatu, Race::Strigoi];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sanguine => "Sanguine",
            Self::Nosferatu => "Nosferatu",
            Self::Strigoi => "Strigoi",
        }
    }

    /// Flavor description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Sanguine => {
                "Elegant and aristocratic, the Sanguine move through mortal society with ease, \
                 their charm and beauty a dangerous mask for the predator within."
            }
            Self::Nosferatu => {
                "Cursed with monstrous forms, the Nosferatu lurk in the shadows and sewers, \
                 gathering secrets from the forgotten places of the city."
            }
            Self::Strigoi => {
                "Feral and bestial, the Strigoi are closer to the Beast than any other kin. \
                 They are terrifying hunters, their bodies twisted into weapons of primal fury."
            }
        }
    }

    /// Look up a race by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }

    /// Like [`Race::from_name`], but reports the failure as an error.
    pub fn lookup(name: &str) -> CoreResult<Self> {
        Self::from_name(name).ok_or_else(|| CoreError::UnknownContent {
            table: "race",
            name: name.to_string(),
        })
    }
}

/// A once-per-night supernatural power, bound to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    /// Blood Knight discipline.
    AegisOfCaine,
    /// Shadowmancer discipline.
    Obtenebration,
    /// Siren discipline.
    Presence,
    /// Beastmaster discipline.
    Animalism,
    /// Alchemist discipline.
    Thaumaturgy,
    /// Revenant discipline.
    FortitudesEmbrace,
}

impl Discipline {
    /// All disciplines, in class order.
    pub const ALL: [Discipline; 6] = [
        Discipline::AegisOfCaine,
        Discipline::Obtenebration,
        Discipline::Presence,
        Discipline::Animalism,
        Discipline::Thaumaturgy,
        Discipline::FortitudesEmbrace,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::AegisOfCaine => "Aegis of Caine",
            Self::Obtenebration => "Obtenebration",
            Self::Presence => "Presence",
            Self::Animalism => "Animalism",
            Self::Thaumaturgy => "Thaumaturgy",
            Self::FortitudesEmbrace => "Fortitude's Embrace",
        }
    }

    /// What the discipline does.
    pub fn description(self) -> &'static str {
        match self {
            Self::AegisOfCaine => {
                "Instantly harden your flesh into a stone-like carapace, granting immense \
                 resilience against physical harm for a short duration."
            }
            Self::Obtenebration => {
                "Coalesce the very shadows around you into a tangible, suffocating darkness \
                 that can terrify mortals and obscure you from sight."
            }
            Self::Presence => {
                "Channel your supernatural allure to overwhelm the senses of all mortals in \
                 your immediate vicinity, leaving them in a state of stunned adoration."
            }
            Self::Animalism => {
                "Assert your dominance over the lesser creatures of the city, summoning a \
                 swarm of vermin to reveal secrets, create diversions, or attack your foes."
            }
            Self::Thaumaturgy => {
                "Transmute a portion of your own vitae into a potent elixir that can \
                 temporarily heighten one of your core attributes to a superhuman level."
            }
            Self::FortitudesEmbrace => {
                "Enter a death-like trance, focusing your will to mend grievous wounds and \
                 purge physical frailties, restoring your body to an unholy wholeness."
            }
        }
    }

    /// Look up a discipline by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }
}

/// A vampire class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VampireClass {
    /// Warriors of the eternal night.
    BloodKnight,
    /// Commanders of darkness.
    Shadowmancer,
    /// Masters of irresistible allure.
    Siren,
    /// Lords of the urban jungle.
    Beastmaster,
    /// Scholars of the vitae.
    Alchemist,
    /// Tireless, implacable survivors.
    Revenant,
}

impl VampireClass {
    /// All classes in presentation order.
    pub const ALL: [VampireClass; 6] = [
        VampireClass::BloodKnight,
        VampireClass::Shadowmancer,
        VampireClass::Siren,
        VampireClass::Beastmaster,
        VampireClass::Alchemist,
        VampireClass::Revenant,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::BloodKnight => "Blood Knight",
            Self::Shadowmancer => "Shadowmancer",
            Self::Siren => "Siren",
            Self::Beastmaster => "Beastmaster",
            Self::Alchemist => "Alchemist",
            Self::Revenant => "Revenant",
        }
    }

    /// Flavor description.
    pub fn description(self) -> &'static str {
        match self {
            Self::BloodKnight => {
                "Warriors of the eternal night, they treat combat as a grim art form. \
                 Their bodies are honed into perfect weapons."
            }
            Self::Shadowmancer => {
                "They command the very darkness, weaving shadows into weapons and cloaks of \
                 invisibility. Spies and assassins without peer."
            }
            Self::Siren => {
                "Their power lies in irresistible allure, bending the will of mortals and \
                 lesser vampires into devoted thralls."
            }
            Self::Beastmaster => {
                "Connected to the primal spirit of the city's fauna, they command vermin and \
                 strays. Their spies lurk in every alley."
            }
            Self::Alchemist => {
                "Scholars of the vitae who manipulate their own blood, from enhancing their \
                 abilities to concocting arcane poisons."
            }
            Self::Revenant => {
                "Possessing an unholy resilience, Revenants withstand punishment that would \
                 destroy other vampires."
            }
        }
    }

    /// The unique discipline this class wields.
    pub fn discipline(self) -> Discipline {
        match self {
            Self::BloodKnight => Discipline::AegisOfCaine,
            Self::Shadowmancer => Discipline::Obtenebration,
            Self::Siren => Discipline::Presence,
            Self::Beastmaster => Discipline::Animalism,
            Self::Alchemist => Discipline::Thaumaturgy,
            Self::Revenant => Discipline::FortitudesEmbrace,
        }
    }

    /// Look up a class by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }

    /// Like [`VampireClass::from_name`], but reports the failure as an error.
    pub fn lookup(name: &str) -> CoreResult<Self> {
        Self::from_name(name).ok_or_else(|| CoreError::UnknownContent {
            table: "class",
            name: name.to_string(),
        })
    }
}

/// The character's mortal life before the Embrace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    /// Born to privilege, lost it all.
    ExiledNoble,
    /// Raised in the gutters.
    StreetUrchin,
    /// Seeker of forbidden knowledge.
    OccultScholar,
    /// A ghost in the machine.
    CorporateDrone,
    /// A soldier in a new, secret war.
    ExMilitary,
    /// A passionate soul the world ignored.
    FailedArtist,
}

impl Background {
    /// All backgrounds in presentation order.
    pub const ALL: [Background; 6] = [
        Background::ExiledNoble,
        Background::StreetUrchin,
        Background::OccultScholar,
        Background::CorporateDrone,
        Background::ExMilitary,
        Background::FailedArtist,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ExiledNoble => "Exiled Noble",
            Self::StreetUrchin => "Street Urchin",
            Self::OccultScholar => "Occult Scholar",
            Self::CorporateDrone => "Corporate Drone",
            Self::ExMilitary => "Ex-Military",
            Self::FailedArtist => "Failed Artist",
        }
    }

    /// Flavor description.
    pub fn description(self) -> &'static str {
        match self {
            Self::ExiledNoble => {
                "Born to power and privilege, you lost it all. You carry an air of \
                 aristocracy and a bitter grudge."
            }
            Self::StreetUrchin => {
                "You grew up in the gutters, surviving on scraps and cunning. You are \
                 resilient, resourceful, and invisible to the powerful."
            }
            Self::OccultScholar => {
                "You dedicated your mortal life to forbidden knowledge. You sought power in \
                 dusty tomes and found it in the blood."
            }
            Self::CorporateDrone => {
                "Trapped in a soulless job, you were a ghost in the machine long before you \
                 died. You understand systems and how to go unnoticed."
            }
            Self::ExMilitary => {
                "You were a soldier, defined by discipline and violence. The transition to \
                 this new, secret war was almost seamless."
            }
            Self::FailedArtist => {
                "You lived for passion and beauty, but the world was indifferent. Your \
                 unlife is a canvas for the torment and ecstasy you once craved."
            }
        }
    }

    /// The narrative bonus the oracle is asked to honor.
    pub fn bonus(self) -> &'static str {
        match self {
            Self::ExiledNoble => {
                "Your aristocratic bearing makes you naturally influential in high society."
            }
            Self::StreetUrchin => {
                "You know the city's hidden paths and forgotten places like the back of your hand."
            }
            Self::OccultScholar => {
                "You possess a deep understanding of supernatural lore and rituals."
            }
            Self::CorporateDrone => {
                "You are adept at going unnoticed and navigating bureaucratic systems."
            }
            Self::ExMilitary => {
                "Your training allows you to remain calm under pressure, resisting the Beast's frenzy."
            }
            Self::FailedArtist => {
                "Your passionate soul allows you to connect with or manipulate the emotions of mortals more easily."
            }
        }
    }

    /// Look up a background by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }

    /// Like [`Background::from_name`], but reports the failure as an error.
    pub fn lookup(name: &str) -> CoreResult<Self> {
        Self::from_name(name).ok_or_else(|| CoreError::UnknownContent {
            table: "background",
            name: name.to_string(),
        })
    }
}

/// A named place in the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// The player's home base; the only safe place during the day.
    Haven,
    /// The seat of vampire politics.
    ElysianFields,
    /// Dangerous but plentiful hunting grounds.
    IndustrialSlums,
    /// Mortal nightlife.
    NeonStrip,
    /// Smugglers, cargo, and the rival's assets.
    Docks,
}

impl Location {
    /// All locations; the first is the starting location.
    pub const ALL: [Location; 5] = [
        Location::Haven,
        Location::ElysianFields,
        Location::IndustrialSlums,
        Location::NeonStrip,
        Location::Docks,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Haven => "Your Haven",
            Self::ElysianFields => "The Elysian Fields",
            Self::IndustrialSlums => "The Industrial Slums",
            Self::NeonStrip => "The Neon Strip",
            Self::Docks => "The Docks",
        }
    }

    /// Arrival description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Haven => {
                "A place of safety and quiet contemplation. The scent of dust and dried roses \
                 hangs in the air."
            }
            Self::ElysianFields => {
                "The opulent heart of the city's vampire society. A high-stakes game of \
                 politics and power plays out in lavish, velvet-draped salons."
            }
            Self::IndustrialSlums => {
                "A maze of rusted factories and desperate mortals. The air is thick with smog \
                 and the tang of spilled blood. A dangerous but plentiful hunting ground."
            }
            Self::NeonStrip => {
                "A vibrant, chaotic artery of mortal nightlife. Kine flock here for fleeting \
                 pleasures, their pulses a deafening drumbeat to the hungry ear."
            }
            Self::Docks => {
                "The salt-choked air hangs heavy with the smell of fish and decay. Forgotten \
                 cargo containers rust under the pale moonlight."
            }
        }
    }

    /// Look up a location by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }
}

/// A one-time, influence-purchased improvement to the haven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HavenUpgrade {
    /// Deeper secrets when studying.
    Library,
    /// Better blood recovery while sleeping.
    #[serde(rename = "Secure Crypt")]
    SecureCrypt,
    /// Suppresses nightly hunger growth while sleeping.
    #[serde(rename = "Blood Cellar")]
    BloodCellar,
}

impl HavenUpgrade {
    /// All upgrades in menu order.
    pub const ALL: [HavenUpgrade; 3] = [
        HavenUpgrade::Library,
        HavenUpgrade::SecureCrypt,
        HavenUpgrade::BloodCellar,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::SecureCrypt => "Secure Crypt",
            Self::BloodCellar => "Blood Cellar",
        }
    }

    /// What the upgrade does.
    pub fn description(self) -> &'static str {
        match self {
            Self::Library => "Unlocks deeper secrets when Studying Ancient Texts.",
            Self::SecureCrypt => {
                "A fortified resting place. You recover more Blood when you Sleep until Dusk."
            }
            Self::BloodCellar => {
                "A refrigerated store of vitae. Provides a buffer against nightly hunger."
            }
        }
    }

    /// Influence required to build it.
    pub fn influence_cost(self) -> i32 {
        match self {
            Self::Library => 15,
            Self::SecureCrypt => 10,
            Self::BloodCellar => 20,
        }
    }

    /// Look up an upgrade by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(&Self::ALL, name, Self::name)
    }
}

macro_rules! impl_display_by_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

impl_display_by_name!(Race, Discipline, VampireClass, Background, Location, HavenUpgrade);
