//! Notification builders for the alert engine
//!
//! Each helper turns a triggering condition into the record stored for the
//! user. The `data` payload carries the ids the app needs to deep-link.

use serde_json::json;
use shared::{
    AlertSubscription, AlertType, FishingCard, NewNotification, RegulationChange, Spot, SpotScore,
    WaterConditions,
};

// ============================================================================
// Notification Trigger Helpers
// ============================================================================

/// Fishability reached the subscription's threshold
pub fn create_ideal_conditions_notification(
    subscription: &AlertSubscription,
    spot: &Spot,
    score: &SpotScore,
    threshold: f64,
) -> NewNotification {
    NewNotification {
        user_id: subscription.user_id,
        notification_type: AlertType::IdealConditions,
        title: format!("Ideal conditions at {}", spot.name),
        body: format!(
            "Fishability is {}/100 ({}), above your threshold of {:.0}.",
            score.fishability_score,
            score.level.label(),
            threshold
        ),
        data: json!({
            "subscription_id": subscription.id,
            "spot_id": spot.id,
            "fishability_score": score.fishability_score,
            "dynamic_score": score.dynamic_score,
            "threshold": threshold,
        }),
    }
}

/// Fish activity at a watched spot reached the subscription's threshold
pub fn create_custom_activity_notification(
    subscription: &AlertSubscription,
    spot: &Spot,
    score: &SpotScore,
    threshold: f64,
) -> NewNotification {
    NewNotification {
        user_id: subscription.user_id,
        notification_type: AlertType::CustomSpotActivity,
        title: format!("Fish are active at {}", spot.name),
        body: format!(
            "Activity index is {}/100, above your threshold of {:.0}.",
            score.dynamic_score, threshold
        ),
        data: json!({
            "subscription_id": subscription.id,
            "spot_id": spot.id,
            "dynamic_score": score.dynamic_score,
            "threshold": threshold,
        }),
    }
}

/// Describe the abnormal water signals, `None` when there are none
pub fn describe_abnormal_water(water: &WaterConditions) -> Option<String> {
    let mut conditions = Vec::new();
    if let Some(flow) = water.flow.as_ref().filter(|flow| flow.status.is_abnormal()) {
        conditions.push(format!("{} (observed {})", flow.label, flow.date));
    }
    if let Some(vigilance) = water.vigilance.as_ref().filter(|v| v.level.is_active()) {
        conditions.push(format!(
            "{} flood vigilance on {}",
            vigilance.level.as_str(),
            vigilance.troncon_name
        ));
    }
    if conditions.is_empty() {
        None
    } else {
        Some(conditions.join("; "))
    }
}

pub fn create_water_level_notification(
    subscription: &AlertSubscription,
    spot: &Spot,
    water: &WaterConditions,
    description: &str,
) -> NewNotification {
    NewNotification {
        user_id: subscription.user_id,
        notification_type: AlertType::WaterLevelAbnormal,
        title: format!("Abnormal water conditions at {}", spot.name),
        body: format!("{}.", description),
        data: json!({
            "subscription_id": subscription.id,
            "spot_id": spot.id,
            "flow_status": water.flow_status().map(|status| status.as_str()),
            "vigilance_level": water.vigilance_level().map(|level| level.as_str()),
        }),
    }
}

pub fn create_card_expiry_notification(
    subscription: &AlertSubscription,
    card: &FishingCard,
    days_until: i64,
) -> NewNotification {
    let body = if days_until < 0 {
        format!("Your fishing card {} expired on {}.", card.card_number, card.expires_on)
    } else if days_until == 0 {
        format!("Your fishing card {} expires today.", card.card_number)
    } else {
        format!(
            "Your fishing card {} expires in {} days, on {}.",
            card.card_number, days_until, card.expires_on
        )
    };

    NewNotification {
        user_id: subscription.user_id,
        notification_type: AlertType::RegulationReminder,
        title: "Fishing card renewal".to_string(),
        body,
        data: json!({
            "subscription_id": subscription.id,
            "card_number": card.card_number,
            "expires_on": card.expires_on,
            "days_until_expiry": days_until,
        }),
    }
}

pub fn create_regulation_change_notification(
    subscription: &AlertSubscription,
    change: &RegulationChange,
) -> NewNotification {
    NewNotification {
        user_id: subscription.user_id,
        notification_type: AlertType::RegulationReminder,
        title: format!("Regulation update ({}): {}", change.department, change.title),
        body: change.summary.clone(),
        data: json!({
            "subscription_id": subscription.id,
            "regulation_change_id": change.id,
            "department": change.department,
            "published_at": change.published_at,
        }),
    }
}
