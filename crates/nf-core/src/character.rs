//! Characters and their creation-time attributes.
//!
//! A [`Character`] is finalized at the end of character creation and never
//! mutated afterwards; the game state carries it by value for the lifetime of
//! one playthrough.

use serde::{Deserialize, Serialize};

use crate::content::{Background, Discipline, Race, VampireClass};
use crate::error::{CoreError, CoreResult};

/// Generation every new character starts at. Lower is more powerful.
pub const STARTING_GENERATION: i32 = 13;

/// Lowest value a single attribute may take.
pub const ATTRIBUTE_MIN: u8 = 1;
/// Highest value a single attribute may take.
pub const ATTRIBUTE_MAX: u8 = 5;
/// Required sum of all six attributes at creation.
pub const ATTRIBUTE_TOTAL: u8 = 15;

/// The character's presented gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Parse a gender from user input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// The six character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Raw physical power.
    pub strength: u8,
    /// Agility and fine motor control.
    pub dexterity: u8,
    /// Force of personality.
    pub charisma: u8,
    /// Resilience to harm.
    pub fortitude: u8,
    /// Supernatural speed.
    pub celerity: u8,
    /// Mental control and vampiric will.
    pub dominate: u8,
}

impl Attributes {
    /// Build an attribute set, enforcing the creation rules: every value in
    /// [1,5] and a total of exactly 15.
    pub fn new(
        strength: u8,
        dexterity: u8,
        charisma: u8,
        fortitude: u8,
        celerity: u8,
        dominate: u8,
    ) -> CoreResult<Self> {
        let attrs = Self {
            strength,
            dexterity,
            charisma,
            fortitude,
            celerity,
            dominate,
        };
        attrs.validate()?;
        Ok(attrs)
    }

    /// The set used when no attributes are supplied.
    pub fn fallback() -> Self {
        Self {
            strength: 2,
            dexterity: 3,
            charisma: 3,
            fortitude: 2,
            celerity: 3,
            dominate: 2,
        }
    }

    /// Parse a comma-separated list of six values in sheet order.
    pub fn parse_list(s: &str) -> CoreResult<Self> {
        let values: Vec<u8> = s
            .split(',')
            .map(|v| v.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|e| CoreError::InvalidAttributes(format!("'{s}': {e}")))?;
        let &[st, dx, ch, fo, ce, dm] = values.as_slice() else {
            return Err(CoreError::InvalidAttributes(format!(
                "expected 6 values, got {}",
                values.len()
            )));
        };
        Self::new(st, dx, ch, fo, ce, dm)
    }

    /// Values in sheet order with their labels.
    pub fn entries(&self) -> [(&'static str, u8); 6] {
        [
            ("Strength", self.strength),
            ("Dexterity", self.dexterity),
            ("Charisma", self.charisma),
            ("Fortitude", self.fortitude),
            ("Celerity", self.celerity),
            ("Dominate", self.dominate),
        ]
    }

    /// Sum of all six values.
    pub fn total(&self) -> u32 {
        self.entries().iter().map(|(_, v)| u32::from(*v)).sum()
    }

    fn validate(&self) -> CoreResult<()> {
        if let Some((label, value)) = self
            .entries()
            .into_iter()
            .find(|(_, v)| !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(v))
        {
            return Err(CoreError::InvalidAttributes(format!(
                "{label} is {value}, must be {ATTRIBUTE_MIN}-{ATTRIBUTE_MAX}"
            )));
        }
        let total = self.total();
        if total != u32::from(ATTRIBUTE_TOTAL) {
            return Err(CoreError::InvalidAttributes(format!(
                "total is {total}, must be {ATTRIBUTE_TOTAL}"
            )));
        }
        Ok(())
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::fallback()
    }
}

/// A finished player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Character name.
    pub name: String,
    /// Presented gender.
    pub gender: Gender,
    /// Bloodline.
    pub race: Race,
    /// Class; determines the discipline.
    pub class: VampireClass,
    /// Mortal background.
    pub background: Background,
    /// Creation-time attributes.
    pub attributes: Attributes,
    /// Vampiric power rank at creation.
    pub generation: i32,
    /// Optional portrait reference (URL or path).
    pub portrait: Option<String>,
}

impl Character {
    /// Create a character at the starting generation without a portrait.
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        race: Race,
        class: VampireClass,
        background: Background,
        attributes: Attributes,
    ) -> CoreResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            name,
            gender,
            race,
            class,
            background,
            attributes,
            generation: STARTING_GENERATION,
            portrait: None,
        })
    }

    /// Attach a portrait reference.
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    /// The class-bound discipline.
    pub fn discipline(&self) -> Discipline {
        self.class.discipline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_attributes_are_valid() {
        let a = Attributes::fallback();
        assert_eq!(a.total(), 15);
        assert!(Attributes::new(2, 3, 3, 2, 3, 2).is_ok());
    }

    #[test]
    fn attributes_reject_out_of_range() {
        let err = Attributes::new(0, 5, 5, 2, 2, 1).unwrap_err();
        assert!(err.to_string().contains("Strength is 0"));
        assert!(Attributes::new(6, 1, 1, 3, 3, 1).is_err());
    }

    #[test]
    fn attributes_reject_wrong_total() {
        let err = Attributes::new(3, 3, 3, 3, 3, 3).unwrap_err();
        assert!(err.to_string().contains("total is 18"));
    }

    #[test]
    fn parse_list() {
        let a = Attributes::parse_list("1, 2, 3, 4, 3, 2").unwrap();
        assert_eq!(a.fortitude, 4);
        assert!(Attributes::parse_list("1,2,3").is_err());
        assert!(Attributes::parse_list("a,b,c,d,e,f").is_err());
    }

    #[test]
    fn character_starts_at_generation_thirteen() {
        let c = Character::new(
            "Lucian",
            Gender::Male,
            Race::Sanguine,
            VampireClass::Siren,
            Background::FailedArtist,
            Attributes::fallback(),
        )
        .unwrap();
        assert_eq!(c.generation, STARTING_GENERATION);
        assert_eq!(c.discipline(), Discipline::Presence);
        assert!(c.portrait.is_none());
        let c = c.with_portrait("portraits/lucian.png");
        assert_eq!(c.portrait.as_deref(), Some("portraits/lucian.png"));
    }

    #[test]
    fn character_requires_name() {
        let err = Character::new(
            "   ",
            Gender::Female,
            Race::Strigoi,
            VampireClass::Revenant,
            Background::ExMilitary,
            Attributes::fallback(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyName));
    }

    #[test]
    fn gender_parse() {
        assert_eq!(Gender::parse("F"), Some(Gender::Female));
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("other"), None);
    }
}
