//! Character creation helpers that consult the oracle.

use nf_core::{Attributes, Background, Gender, Race, VampireClass};

use crate::oracle::NarrativeOracle;

/// Ask the oracle for a starting attribute spread that fits the concept.
///
/// Any oracle failure, including a spread that breaks the creation rules,
/// yields [`Attributes::fallback`] so character creation never stalls.
pub async fn roll_attributes<O>(
    oracle: &O,
    gender: Gender,
    race: Race,
    class: VampireClass,
    background: Background,
) -> Attributes
where
    O: NarrativeOracle + ?Sized,
{
    match oracle
        .generate_initial_attributes(gender, race, class, background)
        .await
    {
        Ok(attributes) => attributes,
        Err(e) => {
            tracing::warn!(error = %e, %class, "attribute generation failed, using fallback");
            Attributes::fallback()
        }
    }
}
