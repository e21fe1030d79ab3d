//! A deterministic, offline narrative oracle.
//!
//! Outcomes come from per-action tables with seeded dice, following the
//! same rules a language-model oracle is instructed to follow: thrall
//! feedings are safe and end the thrall arc, the rival arc escalates in
//! fixed steps, diablerie lowers generation, and so on. Useful for playing
//! without a model and for reproducible tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use nf_core::character::{ATTRIBUTE_MAX, ATTRIBUTE_MIN, ATTRIBUTE_TOTAL};
use nf_core::{
    Action, Attributes, Background, GameState, Gender, HavenUpgrade, Race, RivalArc, VampireClass,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::prompt::MEMORY_CONTEXT;
use super::{NarrativeOracle, OracleResult};
use crate::config::SessionConfig;
use crate::outcome::{ActionOutcome, StorylineChange};

/// Attribute value at which social actions can open new storylines.
const GIFTED: u8 = 4;

/// Seeded table-driven oracle.
pub struct ScriptedOracle {
    rng: Mutex<StdRng>,
}

impl ScriptedOracle {
    /// Create an oracle whose dice are seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create an oracle seeded from the session configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.seed)
    }

    /// A random valid spread, leaning toward the class's signature attribute.
    fn roll_attributes(&self, class: VampireClass) -> Attributes {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = [ATTRIBUTE_MIN; 6];
        values[signature_attribute(class)] += 1;
        let mut spare = ATTRIBUTE_TOTAL - values.iter().sum::<u8>();
        while spare > 0 {
            let i = rng.random_range(0..values.len());
            if values[i] < ATTRIBUTE_MAX {
                values[i] += 1;
                spare -= 1;
            }
        }
        let [st, dx, ch, fo, ce, dm] = values;
        Attributes::new(st, dx, ch, fo, ce, dm).unwrap_or_else(|_| Attributes::fallback())
    }

    fn roll_outcome(&self, state: &GameState, action: Action) -> ActionOutcome {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let rng = &mut *rng;
        let attrs = &state.character.attributes;
        let social = attrs.charisma.max(attrs.dominate);

        let outcome = match action {
            Action::RestAndMeditate => {
                let blood = i32::from(state.blood < nf_core::state::BLOOD_MAX);
                let mut o = ActionOutcome::new(
                    "You sink into stillness among the dust and dried roses. The city's pulse \
                     fades to a murmur and your vitae settles.",
                    blood,
                    0,
                    1,
                    false,
                );
                if state.has_upgrade(HavenUpgrade::Library) && rng.random_bool(0.25) {
                    o.description.push_str(
                        " A half-remembered passage from your library suggests a useful contact.",
                    );
                    o = o.with_influence(1);
                }
                o
            }
            Action::StudyAncientTexts => {
                let mut o = ActionOutcome::new(
                    "You pore over brittle vellum by candlelight, tracing the genealogies of the \
                     damned.",
                    0,
                    0,
                    0,
                    true,
                );
                if state.has_upgrade(HavenUpgrade::Library) {
                    o.description.push_str(
                        " Your library yields a treatise on mastering the Beast, and you feel \
                         its grip loosen.",
                    );
                    o = o.with_hunger_tolerance(0.2).with_influence(1);
                }
                o
            }
            Action::FeedFromThrall => ActionOutcome::new(
                "Your thrall bares their throat willingly. You drink with care, leaving them \
                 weakened but unharmed, and send them away with a last command to forget.",
                4,
                0,
                -3,
                false,
            )
            .with_storyline(StorylineChange::RemoveInfatuatedMortal),
            Action::CultivateHerd => {
                let mut o = ActionOutcome::new(
                    "You visit the members of your herd one by one, taking only what each can \
                     spare. No one will raise an alarm.",
                    2,
                    0,
                    -2,
                    true,
                );
                if rng.random_bool(0.2) {
                    o = o.with_herd(1);
                }
                if rng.random_bool(0.2) {
                    o = o.with_influence(1);
                }
                o
            }
            Action::Unleash(discipline) => ActionOutcome::new(
                format!(
                    "You call upon {discipline}. For one terrible moment the night bends to your \
                     will, and those who witness it will whisper of it for years."
                ),
                -1,
                0,
                0,
                false,
            )
            .with_influence(2),
            Action::ObserveCourt => ActionOutcome::new(
                "From a shadowed balcony you watch alliances form and fray beneath the \
                 chandeliers, filing away every slight.",
                0,
                0,
                0,
                true,
            )
            .with_influence(rng.random_range(1..=2)),
            Action::SchemeWithPrimogen => {
                if social >= GIFTED && state.rival_arc == RivalArc::None && rng.random_bool(0.5) {
                    ActionOutcome::new(
                        "Over dark wine the Primogen lets slip a name. Someone in the court has \
                         been moving against you.",
                        0,
                        0,
                        0,
                        true,
                    )
                    .with_influence(1)
                    .with_storyline(StorylineChange::AddRivalIntrigue)
                } else if rng.random_bool(0.7) {
                    ActionOutcome::new(
                        "You trade favors with a Primogen and leave a little more entangled in \
                         the web of the court.",
                        0,
                        0,
                        0,
                        true,
                    )
                    .with_influence(rng.random_range(1..=3))
                } else {
                    ActionOutcome::new(
                        "The Primogen smiles thinly and repeats your words to someone who \
                         matters. You have overplayed your hand.",
                        0,
                        0,
                        0,
                        true,
                    )
                    .with_influence(-1)
                }
            }
            Action::HuntForBlood => ActionOutcome::new(
                "Among the rusting factories you find a lone worker walking home. The feeding is \
                 quick and ugly.",
                rng.random_range(2..=4),
                -i32::from(rng.random_bool(0.3)),
                -2,
                true,
            ),
            Action::IntimidateGang => ActionOutcome::new(
                "You let the gang glimpse what you are. By the end of the night they answer to you.",
                0,
                -i32::from(rng.random_bool(0.2)),
                0,
                true,
            )
            .with_influence(rng.random_range(1..=2)),
            Action::EstablishHiddenLair => ActionOutcome::new(
                "You claim a sealed boiler room beneath a derelict mill, a bolt-hole for nights \
                 when the Haven is too far.",
                0,
                0,
                0,
                true,
            )
            .with_influence(2),
            Action::HuntAmongstCrowds => ActionOutcome::new(
                "The music is loud enough to cover everything. A dancer leans into you, and you \
                 drink beneath the strobing lights.",
                rng.random_range(1..=3),
                0,
                -1,
                true,
            ),
            Action::CharmMortal => {
                let mut o = ActionOutcome::new(
                    "You fix a mortal with your gaze and watch their will soften like wax.",
                    0,
                    0,
                    0,
                    true,
                );
                if social >= GIFTED && rng.random_bool(0.5) {
                    o.description
                        .push_str(" They will return to you, night after night.");
                    o = o.with_herd(1);
                    if !state.has_enthralled_mortal && rng.random_bool(0.5) {
                        o.description
                            .push_str(" This one is different: utterly, devotedly yours.");
                        o = o.with_storyline(StorylineChange::AddInfatuatedMortal);
                    }
                }
                o
            }
            Action::FeedOnDockworker => ActionOutcome::new(
                "Behind a stack of containers a dockworker lingers over a cigarette. He does not \
                 hear you coming.",
                rng.random_range(2..=3),
                -i32::from(rng.random_bool(0.3)),
                -2,
                true,
            ),
            Action::InterrogateSmuggler => ActionOutcome::new(
                "The smuggler talks, eventually. Cargo manifests, bribed officials, and which \
                 Kindred pay for silence.",
                0,
                0,
                0,
                true,
            )
            .with_influence(1),
            Action::SabotageShipment => {
                let mut o = ActionOutcome::new(
                    "Seawater floods the hold of a rival's freighter. Someone's fortune sinks \
                     with it.",
                    0,
                    0,
                    0,
                    true,
                )
                .with_influence(2);
                if state.rival_arc == RivalArc::None && rng.random_bool(0.25) {
                    o.description
                        .push_str(" Among the wreckage, a ledger bearing a familiar seal.");
                    o = o.with_storyline(StorylineChange::AddRivalIntrigue);
                }
                o
            }
            Action::InvestigateRivalAssets => ActionOutcome::new(
                "In a warehouse office you find your rival's ledgers, and with them the place \
                 they will be waiting.",
                0,
                0,
                0,
                true,
            )
            .with_storyline(StorylineChange::TriggerRivalConfrontation),
            Action::ConfrontRival => ActionOutcome::new(
                "Steel and claw under the cranes. When it ends your rival lies broken on the \
                 wet concrete, and you are bleeding.",
                -2,
                0,
                0,
                true,
            )
            .with_storyline(StorylineChange::TriggerDiablerieOpportunity),
            Action::CommitDiablerie => ActionOutcome::new(
                "You drink until there is nothing left, not blood and not soul. Their power \
                 floods into you, and something human in you drowns.",
                3,
                -3,
                0,
                false,
            )
            .with_generation(-1)
            .with_influence(10)
            .with_storyline(StorylineChange::ConcludeRivalArc),
            Action::WalkAway => ActionOutcome::new(
                "You turn your back on your helpless rival and walk into the fog. Mercy, or \
                 pragmatism. Either way, you are still yourself.",
                0,
                2,
                0,
                false,
            )
            .with_storyline(StorylineChange::ConcludeRivalArc),
            Action::Build(upgrade) => ActionOutcome::new(
                format!(
                    "Workers who will remember nothing labor through the night. The {upgrade} \
                     takes shape within your Haven."
                ),
                0,
                0,
                0,
                false,
            )
            .with_upgrade(upgrade),
            Action::Travel | Action::GoTo(_) | Action::DevelopHaven | Action::SleepUntilDusk => {
                ActionOutcome::new("The moment passes.", 0, 0, 0, false)
            }
        };

        with_night_hunger(outcome, state.hunger_tolerance, rng)
    }
}

/// Index, in sheet order, of the attribute a class leans on.
fn signature_attribute(class: VampireClass) -> usize {
    match class {
        VampireClass::BloodKnight => 0,
        VampireClass::Alchemist => 1,
        VampireClass::Siren => 2,
        VampireClass::Revenant => 3,
        VampireClass::Shadowmancer => 4,
        VampireClass::Beastmaster => 5,
    }
}

/// When time passes without feeding, hunger grows by one unless tolerance
/// holds it back.
fn with_night_hunger(mut outcome: ActionOutcome, tolerance: f64, rng: &mut StdRng) -> ActionOutcome {
    if outcome.time_passed && outcome.blood_change <= 0 && outcome.hunger_change == 0 {
        let resisted = rng.random_bool((tolerance / 5.0).clamp(0.0, 1.0));
        if !resisted {
            outcome.hunger_change = 1;
        }
    }
    outcome
}

#[async_trait]
impl NarrativeOracle for ScriptedOracle {
    async fn generate_action_outcome(
        &self,
        state: &GameState,
        action: Action,
    ) -> OracleResult<ActionOutcome> {
        Ok(self.roll_outcome(state, action))
    }

    async fn generate_memory_summary(
        &self,
        _action: Action,
        description: &str,
    ) -> OracleResult<String> {
        let first = description
            .split_terminator(['.', '!', '?'])
            .next()
            .unwrap_or(description)
            .trim();
        Ok(format!("{first}."))
    }

    async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String> {
        let start = state.memory.len().saturating_sub(MEMORY_CONTEXT);
        let recalled = state.memory[start..].join(" ");
        Ok(format!(
            "The night comes back to me in fragments. {recalled} The Hunger sits at {}/5, and \
             I hold {} of 7 threads of what I once was.",
            state.hunger, state.humanity
        ))
    }

    async fn generate_initial_attributes(
        &self,
        _gender: Gender,
        _race: Race,
        class: VampireClass,
        _background: Background,
    ) -> OracleResult<Attributes> {
        Ok(self.roll_attributes(class))
    }
}
