//! In-memory store
//!
//! Mirrors the PostgreSQL semantics closely enough for the engine tests,
//! including the conditional `last_triggered` update.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    AlertSubscription, FishingCard, NewNotification, NotificationRecord, RegulationChange, Spot,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AnglerStore, NotificationStore, SpotStore, SubscriptionStore, UserSubscriptions};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    spots: Mutex<HashMap<Uuid, Spot>>,
    favorites: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    subscriptions: Mutex<Vec<AlertSubscription>>,
    notifications: Mutex<Vec<NotificationRecord>>,
    cards: Mutex<HashMap<Uuid, FishingCard>>,
    regulations: Mutex<Vec<RegulationChange>>,
    failing_users: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_spot(&self, spot: Spot) {
        self.spots.lock().await.insert(spot.id, spot);
    }

    pub async fn add_favorite(&self, user_id: Uuid, spot_id: Uuid) {
        self.favorites.lock().await.entry(user_id).or_default().push(spot_id);
    }

    /// Insert or replace a subscription
    pub async fn upsert_subscription(&self, subscription: AlertSubscription) {
        let mut subscriptions = self.subscriptions.lock().await;
        match subscriptions.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => *existing = subscription,
            None => subscriptions.push(subscription),
        }
    }

    pub async fn insert_fishing_card(&self, card: FishingCard) {
        self.cards.lock().await.insert(card.user_id, card);
    }

    pub async fn insert_regulation_change(&self, change: RegulationChange) {
        self.regulations.lock().await.push(change);
    }

    /// Make every subscription read for this user fail
    pub async fn fail_user(&self, user_id: Uuid) {
        self.failing_users.lock().await.insert(user_id);
    }

    pub async fn notifications(&self) -> Vec<NotificationRecord> {
        self.notifications.lock().await.clone()
    }

    pub async fn notifications_for(&self, user_id: Uuid) -> Vec<NotificationRecord> {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn subscription(&self, id: Uuid) -> Option<AlertSubscription> {
        self.subscriptions.lock().await.iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn active_subscriptions_by_user(&self) -> AppResult<Vec<UserSubscriptions>> {
        let subscriptions = self.subscriptions.lock().await;
        let mut grouped: Vec<UserSubscriptions> = Vec::new();
        for subscription in subscriptions.iter().filter(|s| s.is_active) {
            match grouped.iter_mut().find(|g| g.user_id == subscription.user_id) {
                Some(group) => group.subscription_ids.push(subscription.id),
                None => grouped.push(UserSubscriptions {
                    user_id: subscription.user_id,
                    subscription_ids: vec![subscription.id],
                }),
            }
        }
        Ok(grouped)
    }

    async fn get_subscription(&self, id: Uuid) -> AppResult<Option<AlertSubscription>> {
        let subscription = self.subscription(id).await;
        if let Some(subscription) = &subscription {
            if self.failing_users.lock().await.contains(&subscription.user_id) {
                return Err(AppError::Internal(format!(
                    "Subscription {} could not be loaded",
                    id
                )));
            }
        }
        Ok(subscription)
    }

    async fn mark_triggered(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut subscriptions = self.subscriptions.lock().await;
        let Some(subscription) = subscriptions.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        if !subscription.is_active || subscription.last_triggered != expected {
            return Ok(false);
        }
        if subscription.last_triggered.is_some_and(|last| last > now) {
            return Ok(false);
        }
        subscription.last_triggered = Some(now);
        Ok(true)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, notification: NewNotification) -> AppResult<NotificationRecord> {
        let record = NotificationRecord {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            notification_type: notification.notification_type,
            title: notification.title,
            body: notification.body,
            data: notification.data,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().await.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl SpotStore for MemoryStore {
    async fn get_spot(&self, id: Uuid) -> AppResult<Option<Spot>> {
        Ok(self.spots.lock().await.get(&id).cloned())
    }

    async fn favorite_spots(&self, user_id: Uuid) -> AppResult<Vec<Spot>> {
        let favorites = self.favorites.lock().await.get(&user_id).cloned().unwrap_or_default();
        let spots = self.spots.lock().await;
        Ok(favorites.iter().filter_map(|id| spots.get(id).cloned()).collect())
    }
}

#[async_trait]
impl AnglerStore for MemoryStore {
    async fn fishing_card(&self, user_id: Uuid) -> AppResult<Option<FishingCard>> {
        Ok(self.cards.lock().await.get(&user_id).cloned())
    }

    async fn regulation_changes_since(
        &self,
        departments: &[String],
        since: DateTime<Utc>,
    ) -> AppResult<Vec<RegulationChange>> {
        let mut changes: Vec<RegulationChange> = self
            .regulations
            .lock()
            .await
            .iter()
            .filter(|c| departments.contains(&c.department) && c.published_at > since)
            .cloned()
            .collect();
        changes.sort_by_key(|c| c.published_at);
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(user_id: Uuid) -> AlertSubscription {
        AlertSubscription {
            id: Uuid::new_v4(),
            user_id,
            alert_type: shared::AlertType::IdealConditions,
            spot_id: None,
            config: serde_json::Value::Null,
            is_active: true,
            last_triggered: None,
        }
    }

    #[tokio::test]
    async fn test_mark_triggered_is_conditional() {
        let store = MemoryStore::new();
        let sub = subscription(Uuid::new_v4());
        store.upsert_subscription(sub.clone()).await;

        let now = Utc::now();
        assert!(store.mark_triggered(sub.id, None, now).await.unwrap());
        // Second writer still expects the old value
        assert!(!store.mark_triggered(sub.id, None, now).await.unwrap());
        assert_eq!(store.subscription(sub.id).await.unwrap().last_triggered, Some(now));
    }

    #[tokio::test]
    async fn test_mark_triggered_never_moves_backwards() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut sub = subscription(Uuid::new_v4());
        sub.last_triggered = Some(now);
        store.upsert_subscription(sub.clone()).await;

        let earlier = now - Duration::hours(1);
        assert!(!store.mark_triggered(sub.id, Some(now), earlier).await.unwrap());
    }

    #[tokio::test]
    async fn test_grouping_skips_inactive() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut inactive = subscription(user);
        inactive.is_active = false;
        store.upsert_subscription(subscription(user)).await;
        store.upsert_subscription(inactive).await;
        store.upsert_subscription(subscription(Uuid::new_v4())).await;

        let grouped = store.active_subscriptions_by_user().await.unwrap();
        assert_eq!(grouped.len(), 2);
        let mine = grouped.iter().find(|g| g.user_id == user).unwrap();
        assert_eq!(mine.subscription_ids.len(), 1);
    }
}
