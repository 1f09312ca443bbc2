//! PostgreSQL-backed store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    AlertSubscription, AlertType, FishingCard, GpsCoordinates, NewNotification,
    NotificationRecord, RegulationChange, Spot,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{AnglerStore, NotificationStore, SpotStore, SubscriptionStore, UserSubscriptions};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

#[derive(Debug, FromRow)]
struct SpotRow {
    id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
    static_score: f64,
    hydro_station_code: Option<String>,
    department: Option<String>,
}

impl From<SpotRow> for Spot {
    fn from(row: SpotRow) -> Self {
        Spot {
            id: row.id,
            name: row.name,
            coordinates: GpsCoordinates::new(row.latitude, row.longitude),
            static_score: row.static_score,
            hydro_station_code: row.hydro_station_code,
            department: row.department,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    alert_type: String,
    spot_id: Option<Uuid>,
    config: serde_json::Value,
    is_active: bool,
    last_triggered: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for AlertSubscription {
    type Error = AppError;

    fn try_from(row: SubscriptionRow) -> AppResult<Self> {
        Ok(AlertSubscription {
            id: row.id,
            user_id: row.user_id,
            alert_type: row.alert_type.parse::<AlertType>()?,
            spot_id: row.spot_id,
            config: row.config,
            is_active: row.is_active,
            last_triggered: row.last_triggered,
        })
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    notification_type: String,
    title: String,
    body: String,
    data: serde_json::Value,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for NotificationRecord {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> AppResult<Self> {
        Ok(NotificationRecord {
            id: row.id,
            user_id: row.user_id,
            notification_type: row.notification_type.parse::<AlertType>()?,
            title: row.title,
            body: row.body,
            data: row.data,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct FishingCardRow {
    user_id: Uuid,
    card_number: String,
    department: Option<String>,
    expires_on: NaiveDate,
}

#[derive(Debug, FromRow)]
struct RegulationRow {
    id: Uuid,
    department: String,
    title: String,
    summary: String,
    published_at: DateTime<Utc>,
}

#[async_trait]
impl SubscriptionStore for PgStore {
    async fn active_subscriptions_by_user(&self) -> AppResult<Vec<UserSubscriptions>> {
        let rows = sqlx::query_as::<_, (Uuid, Vec<Uuid>)>(
            r#"
            SELECT user_id, array_agg(id ORDER BY created_at) AS subscription_ids
            FROM alert_subscriptions
            WHERE is_active = TRUE
            GROUP BY user_id
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, subscription_ids)| UserSubscriptions {
                user_id,
                subscription_ids,
            })
            .collect())
    }

    async fn get_subscription(&self, id: Uuid) -> AppResult<Option<AlertSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, alert_type, spot_id, config, is_active, last_triggered
            FROM alert_subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(AlertSubscription::try_from).transpose()
    }

    async fn mark_triggered(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE alert_subscriptions
            SET last_triggered = $3, updated_at = NOW()
            WHERE id = $1
              AND is_active = TRUE
              AND last_triggered IS NOT DISTINCT FROM $2
              AND (last_triggered IS NULL OR last_triggered <= $3)
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, notification: NewNotification) -> AppResult<NotificationRecord> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (user_id, notification_type, title, body, data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, notification_type, title, body, data, is_read, created_at
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.data)
        .fetch_one(&self.db)
        .await?;

        NotificationRecord::try_from(row)
    }
}

#[async_trait]
impl SpotStore for PgStore {
    async fn get_spot(&self, id: Uuid) -> AppResult<Option<Spot>> {
        let row = sqlx::query_as::<_, SpotRow>(
            r#"
            SELECT id, name, latitude, longitude, static_score, hydro_station_code, department
            FROM spots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Spot::from))
    }

    async fn favorite_spots(&self, user_id: Uuid) -> AppResult<Vec<Spot>> {
        let rows = sqlx::query_as::<_, SpotRow>(
            r#"
            SELECT s.id, s.name, s.latitude, s.longitude, s.static_score,
                   s.hydro_station_code, s.department
            FROM favorite_spots f
            JOIN spots s ON s.id = f.spot_id
            WHERE f.user_id = $1
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Spot::from).collect())
    }
}

#[async_trait]
impl AnglerStore for PgStore {
    async fn fishing_card(&self, user_id: Uuid) -> AppResult<Option<FishingCard>> {
        let row = sqlx::query_as::<_, FishingCardRow>(
            r#"
            SELECT user_id, card_number, department, expires_on
            FROM fishing_cards
            WHERE user_id = $1
            ORDER BY expires_on DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| FishingCard {
            user_id: row.user_id,
            card_number: row.card_number,
            department: row.department,
            expires_on: row.expires_on,
        }))
    }

    async fn regulation_changes_since(
        &self,
        departments: &[String],
        since: DateTime<Utc>,
    ) -> AppResult<Vec<RegulationChange>> {
        if departments.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RegulationRow>(
            r#"
            SELECT id, department, title, summary, published_at
            FROM regulation_changes
            WHERE department = ANY($1)
              AND published_at > $2
            ORDER BY published_at
            "#,
        )
        .bind(departments)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RegulationChange {
                id: row.id,
                department: row.department,
                title: row.title,
                summary: row.summary,
                published_at: row.published_at,
            })
            .collect())
    }
}
