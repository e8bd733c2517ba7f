//! The measure record exchanged over the REST API
//!
//! Known fields are typed; anything else a client sends is kept verbatim in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

pub type MeasureId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MeasureId>,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "type")]
    pub measure_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Measure {
    #[cfg(test)]
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        measure_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            owner: owner.into(),
            measure_type: measure_type.into(),
            description: None,
            organization: None,
            deleted: false,
            created_date: None,
            modified_date: None,
            extra: Map::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.deleted
    }

    /// Checks the fields every stored measure must carry.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request(
                "invalid_measure",
                "measure name must not be empty",
            ));
        }
        if self.measure_type.trim().is_empty() {
            return Err(AppError::bad_request(
                "invalid_measure",
                "measure type must not be empty",
            ));
        }
        Ok(())
    }
}

/// Coerces a path segment into a measure id. Ids start at 1.
pub fn parse_measure_id(raw: &str) -> Result<MeasureId, AppError> {
    raw.parse::<MeasureId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            AppError::bad_request(
                "invalid_measure_id",
                format!("measure id must be a positive integer, got '{raw}'"),
            )
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_wire_format_and_keeps_unknown_fields() {
        let measure: Measure = serde_json::from_value(json!({
            "name": "accuracy",
            "owner": "alice",
            "type": "griffin",
            "dq.type": "ACCURACY",
            "evaluate.rule": {"rules": []}
        }))
        .expect("valid measure");

        assert_eq!(measure.id, None);
        assert_eq!(measure.measure_type, "griffin");
        assert!(!measure.deleted);
        assert_eq!(measure.extra["dq.type"], "ACCURACY");
        assert!(measure.extra["evaluate.rule"].is_object());

        let back = serde_json::to_value(&measure).expect("serializable");
        assert_eq!(back["type"], "griffin");
        assert_eq!(back["dq.type"], "ACCURACY");
        assert!(back.get("id").is_none());
    }

    #[test]
    fn missing_type_is_rejected_by_serde() {
        let result = serde_json::from_value::<Measure>(json!({"name": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = Measure::new("  ", "alice", "griffin")
            .validate()
            .expect_err("blank name");
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[test]
    fn validate_rejects_blank_type() {
        let err = Measure::new("m", "alice", "")
            .validate()
            .expect_err("blank type");
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[test]
    fn parse_measure_id_accepts_positive_integers_only() {
        assert_eq!(parse_measure_id("42").expect("valid id"), 42);
        assert!(parse_measure_id("0").is_err());
        assert!(parse_measure_id("-3").is_err());
        assert!(parse_measure_id("abc").is_err());
    }
}
