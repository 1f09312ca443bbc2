//! Persistence boundary for the alert engine and scoring service
//!
//! The engine only needs a handful of repository calls, expressed here as
//! traits. `PgStore` backs them with PostgreSQL; `MemoryStore` keeps
//! everything in process for tests and local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    AlertSubscription, FishingCard, NewNotification, NotificationRecord, RegulationChange, Spot,
};
use uuid::Uuid;

use crate::error::AppResult;

/// Active subscriptions of one user, by id
///
/// Only ids are carried so each subscription can be re-read right before it
/// is evaluated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSubscriptions {
    pub user_id: Uuid,
    pub subscription_ids: Vec<Uuid>,
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All users with at least one active subscription
    async fn active_subscriptions_by_user(&self) -> AppResult<Vec<UserSubscriptions>>;

    async fn get_subscription(&self, id: Uuid) -> AppResult<Option<AlertSubscription>>;

    /// Set `last_triggered = now` only if it still equals `expected`.
    ///
    /// Returns `false` when another evaluation got there first, or when `now`
    /// would move the timestamp backwards.
    async fn mark_triggered(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, notification: NewNotification) -> AppResult<NotificationRecord>;
}

#[async_trait]
pub trait SpotStore: Send + Sync {
    async fn get_spot(&self, id: Uuid) -> AppResult<Option<Spot>>;

    async fn favorite_spots(&self, user_id: Uuid) -> AppResult<Vec<Spot>>;
}

/// Fishing cards and departmental regulation bulletins
#[async_trait]
pub trait AnglerStore: Send + Sync {
    async fn fishing_card(&self, user_id: Uuid) -> AppResult<Option<FishingCard>>;

    async fn regulation_changes_since(
        &self,
        departments: &[String],
        since: DateTime<Utc>,
    ) -> AppResult<Vec<RegulationChange>>;
}

/// Everything the alert engine reads or writes
pub trait Store: SubscriptionStore + NotificationStore + SpotStore + AnglerStore {}

impl<T> Store for T where T: SubscriptionStore + NotificationStore + SpotStore + AnglerStore {}
