//! Alert evaluation engine
//!
//! A batch run loads every user with an active subscription and evaluates
//! them with bounded concurrency. A failing subscription is logged and the
//! user's other subscriptions are still evaluated; a user with any failure
//! counts once in the report's errors, and the run moves on.
//!
//! Firing is at most once per cooldown window. The subscription is re-read
//! just before evaluation, and `last_triggered` is moved with a conditional
//! update before any notification is written, so two overlapping runs cannot
//! both fire the same subscription.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use shared::{AlertSubscription, AlertType, FishCategory, NewNotification, Spot, SpotScore, ValidationError};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::notification::{
    create_card_expiry_notification, create_custom_activity_notification,
    create_ideal_conditions_notification, create_regulation_change_notification,
    create_water_level_notification, describe_abnormal_water,
};
use super::scoring::ScoringService;
use crate::config::AlertsConfig;
use crate::error::AppResult;
use crate::store::{Store, UserSubscriptions};

/// How far back regulation changes are looked up for a subscription that never fired
const REGULATION_LOOKBACK_DAYS: i64 = 30;

/// Thresholds and throttling applied by the engine
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    pub default_threshold: f64,
    pub ideal_conditions_cooldown: Duration,
    pub water_level_cooldown: Duration,
    pub regulation_cooldown: Duration,
    pub custom_activity_cooldown: Duration,
    pub card_expiry_warning_days: i64,
    pub max_concurrent_users: usize,
}

impl AlertPolicy {
    pub fn from_config(config: &AlertsConfig) -> Self {
        Self {
            default_threshold: config.default_threshold,
            ideal_conditions_cooldown: Duration::hours(config.ideal_conditions_cooldown_hours),
            water_level_cooldown: Duration::hours(config.water_level_cooldown_hours),
            regulation_cooldown: Duration::hours(config.regulation_cooldown_hours),
            custom_activity_cooldown: Duration::hours(config.custom_activity_cooldown_hours),
            card_expiry_warning_days: config.card_expiry_warning_days,
            max_concurrent_users: config.max_concurrent_users,
        }
    }

    pub fn cooldown(&self, alert_type: AlertType) -> Duration {
        match alert_type {
            AlertType::IdealConditions => self.ideal_conditions_cooldown,
            AlertType::WaterLevelAbnormal => self.water_level_cooldown,
            AlertType::RegulationReminder => self.regulation_cooldown,
            AlertType::CustomSpotActivity => self.custom_activity_cooldown,
        }
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            default_threshold: 75.0,
            ideal_conditions_cooldown: Duration::hours(12),
            water_level_cooldown: Duration::hours(24),
            regulation_cooldown: Duration::hours(168),
            custom_activity_cooldown: Duration::hours(6),
            card_expiry_warning_days: 30,
            max_concurrent_users: 4,
        }
    }
}

/// Outcome of one batch run
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AlertRunReport {
    /// Users whose subscriptions were all evaluated
    pub users_processed: usize,
    pub alerts_triggered: usize,
    /// Users whose evaluation failed
    pub errors: usize,
}

/// Result of evaluating every subscription of one user. A failing
/// subscription is recorded and the remaining ones are still evaluated.
struct UserOutcome {
    user_id: Uuid,
    triggered: usize,
    failed_subscriptions: Vec<Uuid>,
}

/// Spot scores computed during one run, shared by every user evaluating the
/// same spot. Each cell is written once and only read afterwards; the memo is
/// dropped with the run.
#[derive(Default)]
struct ScoreMemo {
    cells: Mutex<HashMap<(Uuid, FishCategory), Arc<OnceCell<SpotScore>>>>,
}

impl ScoreMemo {
    async fn score(
        &self,
        scoring: &ScoringService,
        spot: &Spot,
        fish_category: FishCategory,
        at: DateTime<Utc>,
    ) -> SpotScore {
        let cell = {
            let mut cells = self.cells.lock().await;
            cells.entry((spot.id, fish_category)).or_default().clone()
        };
        cell.get_or_init(|| scoring.score_for(spot, Some(fish_category), at))
            .await
            .clone()
    }
}

pub struct AlertEngine {
    store: Arc<dyn Store>,
    scoring: Arc<ScoringService>,
    policy: AlertPolicy,
}

impl AlertEngine {
    pub fn new(store: Arc<dyn Store>, scoring: Arc<ScoringService>, policy: AlertPolicy) -> Self {
        Self {
            store,
            scoring,
            policy,
        }
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Evaluate every active subscription now
    pub async fn run_all_alerts(&self) -> AppResult<AlertRunReport> {
        self.run_all_alerts_at(Utc::now()).await
    }

    /// Evaluate every active subscription as of `now`.
    ///
    /// Only a failure to list the users fails the run; per-user failures are
    /// counted in the report.
    #[instrument(skip(self))]
    pub async fn run_all_alerts_at(&self, now: DateTime<Utc>) -> AppResult<AlertRunReport> {
        let users = self.store.active_subscriptions_by_user().await?;
        info!(users = users.len(), "Starting alert run");

        let memo = ScoreMemo::default();
        let memo = &memo;
        let outcomes: Vec<UserOutcome> = stream::iter(users)
            .map(|user| async move { self.evaluate_user(&user, memo, now).await })
            .buffer_unordered(self.policy.max_concurrent_users.max(1))
            .collect()
            .await;

        let mut report = AlertRunReport::default();
        for outcome in outcomes {
            // Notifications already written count even when a sibling subscription failed
            report.alerts_triggered += outcome.triggered;
            if outcome.failed_subscriptions.is_empty() {
                report.users_processed += 1;
            } else {
                error!(
                    user_id = %outcome.user_id,
                    failed_subscriptions = ?outcome.failed_subscriptions,
                    "Alert evaluation failed for user"
                );
                report.errors += 1;
            }
        }

        info!(
            users_processed = report.users_processed,
            alerts_triggered = report.alerts_triggered,
            errors = report.errors,
            "Alert run finished"
        );
        Ok(report)
    }

    #[instrument(skip(self, user, memo), fields(user_id = %user.user_id))]
    async fn evaluate_user(
        &self,
        user: &UserSubscriptions,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> UserOutcome {
        let mut outcome = UserOutcome {
            user_id: user.user_id,
            triggered: 0,
            failed_subscriptions: Vec::new(),
        };
        for subscription_id in &user.subscription_ids {
            match self.evaluate_subscription_by_id(*subscription_id, memo, now).await {
                Ok(triggered) => outcome.triggered += triggered,
                Err(e) => {
                    warn!(%subscription_id, error = %e, "Subscription evaluation failed");
                    outcome.failed_subscriptions.push(*subscription_id);
                }
            }
        }
        outcome
    }

    async fn evaluate_subscription_by_id(
        &self,
        subscription_id: Uuid,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        // Fresh read: last_triggered may have moved since the run started
        let Some(subscription) = self.store.get_subscription(subscription_id).await? else {
            return Ok(0);
        };
        if !subscription.is_active {
            return Ok(0);
        }
        self.evaluate_subscription(&subscription, memo, now).await
    }

    #[instrument(
        skip(self, subscription, memo),
        fields(subscription_id = %subscription.id, alert_type = %subscription.alert_type)
    )]
    async fn evaluate_subscription(
        &self,
        subscription: &AlertSubscription,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let cooldown = self.policy.cooldown(subscription.alert_type);
        if subscription.is_cooling_down(now, cooldown) {
            debug!("Subscription in cooldown");
            return Ok(0);
        }

        let notifications = match subscription.alert_type {
            AlertType::IdealConditions => self.ideal_conditions(subscription, memo, now).await?,
            AlertType::CustomSpotActivity => self.custom_activity(subscription, memo, now).await?,
            AlertType::WaterLevelAbnormal => self.water_level(subscription, memo, now).await?,
            AlertType::RegulationReminder => self.regulation_reminder(subscription, now).await?,
        };

        if notifications.is_empty() {
            return Ok(0);
        }

        if !self
            .store
            .mark_triggered(subscription.id, subscription.last_triggered, now)
            .await?
        {
            debug!("Subscription already fired by a concurrent evaluation");
            return Ok(0);
        }

        let count = notifications.len();
        for notification in notifications {
            self.store.create_notification(notification).await?;
        }
        info!(notifications = count, "Alert fired");
        Ok(count)
    }

    /// Explicit spot, or every favorite when the subscription has none
    async fn target_spots(&self, subscription: &AlertSubscription) -> AppResult<Vec<Spot>> {
        match subscription.spot_id {
            Some(spot_id) => match self.store.get_spot(spot_id).await? {
                Some(spot) => Ok(vec![spot]),
                None => {
                    warn!(%spot_id, "Subscription references a missing spot");
                    Ok(Vec::new())
                }
            },
            None => self.store.favorite_spots(subscription.user_id).await,
        }
    }

    async fn ideal_conditions(
        &self,
        subscription: &AlertSubscription,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NewNotification>> {
        let config = subscription.parsed_config()?;
        let threshold = config.threshold.unwrap_or(self.policy.default_threshold);
        let category = config.fish_category.unwrap_or_default();

        let mut notifications = Vec::new();
        for spot in self.target_spots(subscription).await? {
            let score = memo.score(&self.scoring, &spot, category, now).await;
            debug!(spot_id = %spot.id, score = score.fishability_score, threshold, "Fishability checked");
            if f64::from(score.fishability_score) >= threshold {
                notifications.push(create_ideal_conditions_notification(
                    subscription,
                    &spot,
                    &score,
                    threshold,
                ));
            }
        }
        Ok(notifications)
    }

    async fn custom_activity(
        &self,
        subscription: &AlertSubscription,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NewNotification>> {
        if subscription.spot_id.is_none() {
            return Err(ValidationError::InvalidConfig(
                "CUSTOM_SPOT_ACTIVITY requires a spot".to_string(),
            )
            .into());
        }
        let config = subscription.parsed_config()?;
        let threshold = config.threshold.unwrap_or(self.policy.default_threshold);
        let category = config.fish_category.unwrap_or_default();

        let mut notifications = Vec::new();
        for spot in self.target_spots(subscription).await? {
            let score = memo.score(&self.scoring, &spot, category, now).await;
            debug!(spot_id = %spot.id, score = score.dynamic_score, threshold, "Activity checked");
            if f64::from(score.dynamic_score) >= threshold {
                notifications.push(create_custom_activity_notification(
                    subscription,
                    &spot,
                    &score,
                    threshold,
                ));
            }
        }
        Ok(notifications)
    }

    async fn water_level(
        &self,
        subscription: &AlertSubscription,
        memo: &ScoreMemo,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NewNotification>> {
        let category = subscription.parsed_config()?.fish_category.unwrap_or_default();

        let mut notifications = Vec::new();
        for spot in self.target_spots(subscription).await? {
            let score = memo.score(&self.scoring, &spot, category, now).await;
            if let Some(description) = describe_abnormal_water(&score.water) {
                debug!(spot_id = %spot.id, %description, "Abnormal water conditions");
                notifications.push(create_water_level_notification(
                    subscription,
                    &spot,
                    &score.water,
                    &description,
                ));
            }
        }
        Ok(notifications)
    }

    async fn regulation_reminder(
        &self,
        subscription: &AlertSubscription,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<NewNotification>> {
        let mut notifications = Vec::new();
        let mut departments: Vec<String> = Vec::new();

        let card = self.store.fishing_card(subscription.user_id).await?;
        if let Some(card) = &card {
            let days_until = card.days_until_expiry(self.scoring.local_date(now));
            if days_until <= self.policy.card_expiry_warning_days {
                notifications.push(create_card_expiry_notification(subscription, card, days_until));
            }
            departments.extend(card.department.clone());
        }

        for spot in self.target_spots(subscription).await? {
            departments.extend(spot.department);
        }
        departments.sort();
        departments.dedup();

        let since = subscription
            .last_triggered
            .unwrap_or(now - Duration::days(REGULATION_LOOKBACK_DAYS));
        let changes = self.store.regulation_changes_since(&departments, since).await?;
        notifications.extend(
            changes
                .iter()
                .filter(|change| change.published_at <= now)
                .map(|change| create_regulation_change_notification(subscription, change)),
        );

        Ok(notifications)
    }
}
