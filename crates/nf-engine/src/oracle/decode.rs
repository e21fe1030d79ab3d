//! Decoding and validation of raw oracle output.
//!
//! Required fields are checked strictly; a missing or mistyped one fails
//! the whole outcome. Optional fields are checked one by one and dropped
//! with a warning when invalid.

use nf_core::{Attributes, HavenUpgrade};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{OracleError, OracleResult};
use crate::outcome::{ActionOutcome, StorylineChange};

/// Decode an outcome record from the oracle's JSON text.
pub fn decode_outcome(raw: &str) -> OracleResult<ActionOutcome> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| OracleError::Malformed(format!("invalid JSON: {e}")))?;
    let Value::Object(obj) = value else {
        return Err(OracleError::Malformed(
            "outcome must be a JSON object".to_string(),
        ));
    };

    let description = obj
        .get("outcomeDescription")
        .and_then(Value::as_str)
        .ok_or_else(|| OracleError::Malformed("missing outcomeDescription".to_string()))?
        .to_string();
    let time_passed = obj
        .get("timePassed")
        .and_then(Value::as_bool)
        .ok_or_else(|| OracleError::Malformed("missing timePassed".to_string()))?;

    Ok(ActionOutcome {
        description,
        blood_change: required_int(&obj, "bloodChange")?,
        humanity_change: required_int(&obj, "humanityChange")?,
        hunger_change: required_int(&obj, "hungerChange")?,
        time_passed,
        hunger_tolerance_change: optional(&obj, "hungerToleranceChange", Value::as_f64)
            .unwrap_or(0.0),
        storyline_change: optional(&obj, "storylineChange", from_json::<StorylineChange>),
        influence_change: optional(&obj, "influenceChange", as_int).unwrap_or(0),
        generation_change: optional(&obj, "generationChange", as_int).unwrap_or(0),
        herd_size_change: optional(&obj, "herdSizeChange", as_int).unwrap_or(0),
        new_haven_upgrade: optional(&obj, "newHavenUpgrade", from_json::<HavenUpgrade>),
    })
}

/// Decode a starting attribute set. Every field must be a number, each in
/// [1,5], summing to 15.
pub fn decode_attributes(raw: &str) -> OracleResult<Attributes> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| OracleError::Malformed(format!("invalid JSON: {e}")))?;
    let Value::Object(obj) = value else {
        return Err(OracleError::Malformed(
            "attributes must be a JSON object".to_string(),
        ));
    };

    let field = |key: &str| -> OracleResult<u8> {
        obj.get(key)
            .and_then(as_int)
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| OracleError::Malformed(format!("missing or non-numeric {key}")))
    };
    Attributes::new(
        field("strength")?,
        field("dexterity")?,
        field("charisma")?,
        field("fortitude")?,
        field("celerity")?,
        field("dominate")?,
    )
    .map_err(|e| OracleError::Malformed(e.to_string()))
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn as_int(value: &Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i32)
}

fn from_json<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

fn required_int(obj: &Map<String, Value>, key: &str) -> OracleResult<i32> {
    obj.get(key)
        .and_then(as_int)
        .ok_or_else(|| OracleError::Malformed(format!("missing or non-integer {key}")))
}

fn optional<T>(
    obj: &Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = obj.get(key).filter(|v| !v.is_null())?;
    let converted = convert(value);
    if converted.is_none() {
        tracing::warn!(field = key, value = %value, "ignoring invalid optional oracle field");
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "outcomeDescription": "You slip into the crowd.",
        "bloodChange": 2,
        "humanityChange": 0,
        "hungerChange": -1,
        "timePassed": true
    }"#;

    #[test]
    fn decodes_required_fields() {
        let o = decode_outcome(MINIMAL).unwrap();
        assert_eq!(o.description, "You slip into the crowd.");
        assert_eq!((o.blood_change, o.humanity_change, o.hunger_change), (2, 0, -1));
        assert!(o.time_passed);
        assert_eq!(o.influence_change, 0);
    }

    #[test]
    fn decodes_optional_fields() {
        let o = decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":0,"humanityChange":-3,"hungerChange":0,
                "timePassed":false,"storylineChange":"CONCLUDE_RIVAL_ARC","generationChange":-1,
                "influenceChange":10,"herdSizeChange":1,"hungerToleranceChange":0.5,
                "newHavenUpgrade":"Secure Crypt"}"#,
        )
        .unwrap();
        assert_eq!(o.storyline_change, Some(StorylineChange::ConcludeRivalArc));
        assert_eq!(o.generation_change, -1);
        assert_eq!(o.influence_change, 10);
        assert_eq!(o.herd_size_change, 1);
        assert!((o.hunger_tolerance_change - 0.5).abs() < f64::EPSILON);
        assert_eq!(o.new_haven_upgrade, Some(HavenUpgrade::SecureCrypt));
    }

    #[test]
    fn invalid_optional_tags_are_dropped() {
        let o = decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":0,"humanityChange":0,"hungerChange":0,
                "timePassed":false,"storylineChange":"SUMMON_DRAGON","newHavenUpgrade":"Moat",
                "influenceChange":"lots"}"#,
        )
        .unwrap();
        assert!(o.storyline_change.is_none());
        assert!(o.new_haven_upgrade.is_none());
        assert_eq!(o.influence_change, 0);
    }

    #[test]
    fn missing_required_field_fails() {
        let err = decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":0,"humanityChange":0,"timePassed":true}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("hungerChange"));
    }

    #[test]
    fn wrong_types_fail() {
        assert!(decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":"2","humanityChange":0,"hungerChange":0,"timePassed":true}"#
        )
        .is_err());
        assert!(decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":2,"humanityChange":0,"hungerChange":0,"timePassed":"yes"}"#
        )
        .is_err());
        assert!(decode_outcome("[1,2,3]").is_err());
        assert!(decode_outcome("not json").is_err());
    }

    #[test]
    fn integral_floats_are_accepted() {
        let o = decode_outcome(
            r#"{"outcomeDescription":"d","bloodChange":2.0,"humanityChange":0,"hungerChange":0,"timePassed":false}"#,
        )
        .unwrap();
        assert_eq!(o.blood_change, 2);
    }

    #[test]
    fn decodes_valid_attributes() {
        let a = decode_attributes(
            r#"{"strength":1,"dexterity":2,"charisma":5,"fortitude":1,"celerity":2,"dominate":4}"#,
        )
        .unwrap();
        assert_eq!(a.charisma, 5);
        assert_eq!(a.total(), 15);
    }

    #[test]
    fn attributes_with_wrong_sum_fail() {
        let err = decode_attributes(
            r#"{"strength":5,"dexterity":5,"charisma":5,"fortitude":1,"celerity":1,"dominate":1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
        assert!(err.to_string().contains("invalid attributes"));
    }

    #[test]
    fn attributes_must_be_numeric_and_in_range() {
        assert!(decode_attributes(
            r#"{"strength":"3","dexterity":2,"charisma":3,"fortitude":2,"celerity":3,"dominate":2}"#
        )
        .is_err());
        assert!(decode_attributes(
            r#"{"strength":-1,"dexterity":6,"charisma":3,"fortitude":2,"celerity":3,"dominate":2}"#
        )
        .is_err());
        assert!(decode_attributes(r#"{"strength":3}"#).is_err());
    }

    #[test]
    fn code_fences_are_stripped() {
        let fenced = format!("```json\n{MINIMAL}\n```");
        assert_eq!(strip_code_fence(&fenced), MINIMAL.trim());
        assert!(decode_outcome(&fenced).is_ok());
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
