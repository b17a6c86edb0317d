//! Validation of incoming score submissions

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ScoreError, ScoreResult};
use crate::types::MAX_ABS_SCORE;

/// Longest accepted player id, in characters
pub const MAX_PLAYER_ID_LEN: usize = 64;

/// Raw submission as received from a client
///
/// `score` stays untyped so that a missing value and a malformed one can be
/// reported differently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitScore {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub game_type: Option<String>,
}

impl SubmitScore {
    /// Submission with an integer score
    pub fn new(player_id: impl Into<String>, score: i64) -> Self {
        Self {
            player_id: Some(player_id.into()),
            score: Some(Value::from(score)),
            game_type: None,
        }
    }

    pub fn with_game_type(mut self, game_type: impl Into<String>) -> Self {
        self.game_type = Some(game_type.into());
        self
    }
}

/// Submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub player_id: String,
    pub score: i64,
    pub game_type: String,
}

impl ValidSubmission {
    pub fn validate(
        raw: SubmitScore,
        default_player_id: &str,
        default_game_type: &str,
    ) -> ScoreResult<Self> {
        let score = parse_score(raw.score.as_ref())?;
        let player_id = resolve_player_id(raw.player_id, default_player_id)?;
        let game_type = raw
            .game_type
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| default_game_type.to_string());

        Ok(Self {
            player_id,
            score,
            game_type,
        })
    }
}

/// Accept a JSON integer or a string holding one, within `±MAX_ABS_SCORE`
pub fn parse_score(value: Option<&Value>) -> ScoreResult<i64> {
    let invalid = || ScoreError::validation("Score must be a valid integer");

    let score = match value {
        None | Some(Value::Null) => return Err(ScoreError::validation("Score is required")),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if !(-MAX_ABS_SCORE..=MAX_ABS_SCORE).contains(&score) {
        return Err(ScoreError::validation(format!(
            "Score must be between -{} and {}",
            MAX_ABS_SCORE, MAX_ABS_SCORE
        )));
    }

    Ok(score)
}

/// Apply the default player id and reject blank or oversized ids
pub fn resolve_player_id(player_id: Option<String>, default_player_id: &str) -> ScoreResult<String> {
    let player_id = match player_id {
        Some(id) => id.trim().to_string(),
        None => return Ok(default_player_id.to_string()),
    };

    if player_id.is_empty() {
        return Err(ScoreError::validation("player_id must not be empty"));
    }
    if player_id.chars().count() > MAX_PLAYER_ID_LEN {
        return Err(ScoreError::validation(format!(
            "player_id must be at most {} characters",
            MAX_PLAYER_ID_LEN
        )));
    }

    Ok(player_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(body: Value) -> ScoreResult<ValidSubmission> {
        let raw: SubmitScore = serde_json::from_value(body).unwrap();
        ValidSubmission::validate(raw, "guest", "slot")
    }

    #[test]
    fn test_defaults_applied() {
        let valid = validate(json!({"score": 120})).unwrap();
        assert_eq!(valid.player_id, "guest");
        assert_eq!(valid.game_type, "slot");
        assert_eq!(valid.score, 120);
    }

    #[test]
    fn test_explicit_fields() {
        let valid = validate(json!({"player_id": " alice ", "score": -200, "game_type": "plinko"}))
            .unwrap();
        assert_eq!(valid.player_id, "alice");
        assert_eq!(valid.score, -200);
        assert_eq!(valid.game_type, "plinko");
    }

    #[test]
    fn test_missing_score() {
        let err = validate(json!({"player_id": "alice"})).unwrap_err();
        assert!(matches!(err, ScoreError::Validation(ref m) if m == "Score is required"));

        let err = validate(json!({"score": null})).unwrap_err();
        assert!(matches!(err, ScoreError::Validation(ref m) if m == "Score is required"));
    }

    #[test]
    fn test_malformed_scores() {
        for bad in [json!(12.5), json!("twelve"), json!(true), json!([1]), json!(u64::MAX)] {
            let err = validate(json!({ "score": bad })).unwrap_err();
            assert!(matches!(err, ScoreError::Validation(ref m) if m == "Score must be a valid integer"));
        }
    }

    #[test]
    fn test_score_range() {
        for bad in [json!(i64::MAX), json!(i64::MIN), json!(MAX_ABS_SCORE + 1), json!("-1000000000001")] {
            let err = validate(json!({ "score": bad })).unwrap_err();
            assert!(matches!(err, ScoreError::Validation(ref m) if m.starts_with("Score must be between")));
        }

        assert_eq!(validate(json!({"score": MAX_ABS_SCORE})).unwrap().score, MAX_ABS_SCORE);
        assert_eq!(validate(json!({"score": -MAX_ABS_SCORE})).unwrap().score, -MAX_ABS_SCORE);
    }

    #[test]
    fn test_numeric_string_accepted() {
        assert_eq!(validate(json!({"score": " 42 "})).unwrap().score, 42);
    }

    #[test]
    fn test_player_id_rules() {
        assert!(validate(json!({"player_id": "   ", "score": 1})).is_err());
        let long = "x".repeat(MAX_PLAYER_ID_LEN + 1);
        assert!(validate(json!({"player_id": long, "score": 1})).is_err());
        let max = "x".repeat(MAX_PLAYER_ID_LEN);
        assert!(validate(json!({"player_id": max, "score": 1})).is_ok());
    }

    #[test]
    fn test_blank_game_type_uses_default() {
        let valid = validate(json!({"score": 1, "game_type": " "})).unwrap();
        assert_eq!(valid.game_type, "slot");
    }
}
