//! Alert subscription models

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::activity::FishCategory;
use crate::validation::ValidationError;

/// Kind of condition a user subscribes to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    IdealConditions,
    RegulationReminder,
    WaterLevelAbnormal,
    CustomSpotActivity,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::IdealConditions => "IDEAL_CONDITIONS",
            AlertType::RegulationReminder => "REGULATION_REMINDER",
            AlertType::WaterLevelAbnormal => "WATER_LEVEL_ABNORMAL",
            AlertType::CustomSpotActivity => "CUSTOM_SPOT_ACTIVITY",
        }
    }
}

impl FromStr for AlertType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDEAL_CONDITIONS" => Ok(AlertType::IdealConditions),
            "REGULATION_REMINDER" => Ok(AlertType::RegulationReminder),
            "WATER_LEVEL_ABNORMAL" => Ok(AlertType::WaterLevelAbnormal),
            "CUSTOM_SPOT_ACTIVITY" => Ok(AlertType::CustomSpotActivity),
            other => Err(ValidationError::unknown("alert_type", other)),
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's standing request to be notified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub alert_type: AlertType,
    /// `None` targets every favorite spot of the user
    pub spot_id: Option<Uuid>,
    /// Free-form settings, see [`AlertConfig`]
    pub config: serde_json::Value,
    pub is_active: bool,
    pub last_triggered: Option<DateTime<Utc>>,
}

/// Typed view of the settings the engine understands.
///
/// Unknown keys are ignored so the front-end can store its own preferences.
#[derive(Debug, Clone, Default, Deserialize, Validate, PartialEq)]
pub struct AlertConfig {
    #[validate(range(min = 0.0, max = 100.0))]
    pub threshold: Option<f64>,
    pub fish_category: Option<FishCategory>,
}

impl AlertSubscription {
    pub fn parsed_config(&self) -> Result<AlertConfig, ValidationError> {
        if self.config.is_null() {
            return Ok(AlertConfig::default());
        }
        let config: AlertConfig = serde_json::from_value(self.config.clone())
            .map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Configured threshold, falling back to `default` when unset
    pub fn threshold_or(&self, default: f64) -> Result<f64, ValidationError> {
        Ok(self.parsed_config()?.threshold.unwrap_or(default))
    }

    /// Whether the subscription fired less than `cooldown` before `now`
    pub fn is_cooling_down(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        self.last_triggered
            .map(|last| now - last < cooldown)
            .unwrap_or(false)
    }
}

/// A user's fishing card (carte de pêche)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FishingCard {
    pub user_id: Uuid,
    pub card_number: String,
    pub department: Option<String>,
    pub expires_on: NaiveDate,
}

impl FishingCard {
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expires_on - today).num_days()
    }
}

/// Departmental regulation change (opening dates, size limits, reserves)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegulationChange {
    pub id: Uuid,
    pub department: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription(config: serde_json::Value) -> AlertSubscription {
        AlertSubscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            alert_type: AlertType::IdealConditions,
            spot_id: None,
            config,
            is_active: true,
            last_triggered: None,
        }
    }

    #[test]
    fn test_threshold_defaults_when_unset() {
        assert_eq!(subscription(json!({})).threshold_or(75.0), Ok(75.0));
        assert_eq!(subscription(serde_json::Value::Null).threshold_or(75.0), Ok(75.0));
    }

    #[test]
    fn test_threshold_from_config() {
        let sub = subscription(json!({ "threshold": 82, "notify_sound": true }));
        assert_eq!(sub.threshold_or(75.0), Ok(82.0));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        assert!(subscription(json!({ "threshold": 140 })).threshold_or(75.0).is_err());
        assert!(subscription(json!({ "threshold": -3 })).threshold_or(75.0).is_err());
    }

    #[test]
    fn test_threshold_wrong_type_rejected() {
        let result = subscription(json!({ "threshold": "high" })).threshold_or(75.0);
        assert!(matches!(result, Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn test_cooldown() {
        let now = Utc::now();
        let mut sub = subscription(json!({}));
        assert!(!sub.is_cooling_down(now, Duration::hours(1)));

        sub.last_triggered = Some(now - Duration::minutes(5));
        assert!(sub.is_cooling_down(now, Duration::hours(1)));

        sub.last_triggered = Some(now - Duration::hours(2));
        assert!(!sub.is_cooling_down(now, Duration::hours(1)));
    }

    #[test]
    fn test_alert_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AlertType::WaterLevelAbnormal).unwrap(),
            "\"WATER_LEVEL_ABNORMAL\""
        );
        assert_eq!("CUSTOM_SPOT_ACTIVITY".parse::<AlertType>(), Ok(AlertType::CustomSpotActivity));
        assert!("PRICE_DROP".parse::<AlertType>().is_err());
    }

    #[test]
    fn test_card_days_until_expiry() {
        let card = FishingCard {
            user_id: Uuid::new_v4(),
            card_number: "AAPPMA-33-001".to_string(),
            department: Some("33".to_string()),
            expires_on: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(card.days_until_expiry(today), 30);
    }
}
