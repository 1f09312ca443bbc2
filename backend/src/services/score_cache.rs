//! Short-lived cache of spot scores for the HTTP layer

use std::collections::HashMap;
use std::time::{Duration, Instant};

use shared::SpotScore;
use tokio::sync::RwLock;
use uuid::Uuid;

struct CachedScore {
    score: SpotScore,
    stored_at: Instant,
}

/// Spot scores keyed by spot id, served until they are `ttl` old
pub struct ScoreCache {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, CachedScore>>,
}

impl ScoreCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached score, if any
    pub async fn get(&self, spot_id: Uuid) -> Option<SpotScore> {
        let entries = self.entries.read().await;
        entries
            .get(&spot_id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.score.clone())
    }

    /// Store a score, dropping expired entries on the way
    pub async fn insert(&self, score: SpotScore) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        entries.insert(
            score.spot_id,
            CachedScore {
                score,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, spot_id: Uuid) {
        self.entries.write().await.remove(&spot_id);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
