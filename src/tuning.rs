//! Data-driven game balance
//!
//! Knobs that designers tweak without touching physics. Loaded from JSON; any
//! missing field falls back to the stock value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Maximum rewind budget (ticks)
    pub rewind_capacity: u32,
    /// Budget granted by one diamond
    pub diamond_value: u32,
    /// Chance a freshly spawned brick carries a diamond
    pub diamond_chance: f32,
    /// Per-tick chance the lane configuration switches
    pub lane_switch_chance: f32,
    /// Budget spent to freeze the world
    pub freeze_cost: u32,
    /// Freeze timer decay per forward tick (timer starts at 1.0)
    pub freeze_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rewind_capacity: 300,
            diamond_value: 30,
            diamond_chance: 0.05,
            lane_switch_chance: 0.01,
            freeze_cost: 15,
            freeze_decay: 0.02,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check_chance("diamond_chance", self.diamond_chance)?;
        check_chance("lane_switch_chance", self.lane_switch_chance)?;

        if self.rewind_capacity == 0 {
            return Err(TuningError::OutOfRange {
                field: "rewind_capacity",
                reason: "must be at least 1".into(),
            });
        }
        if self.freeze_cost > self.rewind_capacity {
            return Err(TuningError::OutOfRange {
                field: "freeze_cost",
                reason: format!(
                    "{} exceeds rewind_capacity {}",
                    self.freeze_cost, self.rewind_capacity
                ),
            });
        }
        if !(self.freeze_decay > 0.0 && self.freeze_decay <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "freeze_decay",
                reason: format!("{} not in (0, 1]", self.freeze_decay),
            });
        }
        Ok(())
    }
}

fn check_chance(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            reason: format!("{value} not in [0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "diamond_value": 45 }"#).expect("valid tuning");
        assert_eq!(tuning.diamond_value, 45);
        assert_eq!(tuning.rewind_capacity, 300);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let tuning = Tuning {
            lane_switch_chance: 0.2,
            ..Default::default()
        };
        let json = tuning.to_json().expect("serializes");
        assert_eq!(Tuning::from_json(&json).expect("parses"), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "lane_switch_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "lane_switch_chance", .. }));

        let err = Tuning::from_json(r#"{ "freeze_decay": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "freeze_decay", .. }));

        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
