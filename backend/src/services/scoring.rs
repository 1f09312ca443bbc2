//! Spot scoring service
//!
//! Fetches live conditions for a spot and turns them into a [`SpotScore`].
//! Every provider call is independent and bounded by a timeout; a failing or
//! slow provider only removes its own contribution; it never fails the score.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use shared::{
    apply_water_adjustment, calculate_fish_activity, compute_fishability_score, ActivityFactor,
    ActivityInput, ActivityLevel, FactorImpact, FishCategory, MoonPhase, PressureTrend, Spot,
    SpotScore, WaterConditions, WeatherSnapshot, NEUTRAL_DYNAMIC_SCORE,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::Providers;
use crate::store::SpotStore;

/// Settings the scoring service reads from configuration
#[derive(Debug, Clone, Copy)]
pub struct ScoringSettings {
    /// Upper bound for any single provider call
    pub provider_timeout: Duration,
    /// Offset used to derive the local hour and month of an evaluation
    pub utc_offset: FixedOffset,
}

impl ScoringSettings {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let utc_offset = FixedOffset::east_opt(config.scoring.utc_offset_minutes * 60)
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "scoring.utc_offset_minutes out of range: {}",
                    config.scoring.utc_offset_minutes
                ))
            })?;
        Ok(Self {
            provider_timeout: Duration::from_secs(config.providers.timeout_secs),
            utc_offset,
        })
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(8),
            utc_offset: FixedOffset::east_opt(3600).unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Dynamic score of a spot with the factors that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicScore {
    pub score: u8,
    pub factors: Vec<ActivityFactor>,
    pub water: WaterConditions,
}

/// Scoring service combining the activity index with live water signals
#[derive(Clone)]
pub struct ScoringService {
    spots: Arc<dyn SpotStore>,
    providers: Providers,
    settings: ScoringSettings,
}

impl ScoringService {
    pub fn new(spots: Arc<dyn SpotStore>, providers: Providers, settings: ScoringSettings) -> Self {
        Self {
            spots,
            providers,
            settings,
        }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Evaluation instant in local time
    pub fn local_time(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.settings.utc_offset)
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.local_time(at).date_naive()
    }

    /// Run a provider call under the timeout; failures become `None`
    async fn guarded<T, F>(&self, source: &'static str, call: F) -> Option<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.settings.provider_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(provider = source, error = %e, "Provider unavailable, skipping its contribution");
                None
            }
            Err(_) => {
                warn!(
                    provider = source,
                    timeout_secs = self.settings.provider_timeout.as_secs(),
                    "Provider timed out, skipping its contribution"
                );
                None
            }
        }
    }

    /// Current weather at the spot, `None` when the provider is unavailable
    pub async fn current_weather(&self, spot: &Spot) -> Option<WeatherSnapshot> {
        self.guarded("weather", self.providers.weather.current_weather(spot.coordinates))
            .await
    }

    /// Flow and flood vigilance for the spot, fetched concurrently
    pub async fn water_conditions(&self, spot: &Spot) -> WaterConditions {
        let flow = self.guarded("hydrology", self.providers.flow.flow_status(spot.coordinates));
        let vigilance = async {
            match spot.hydro_station_code.as_deref() {
                Some(code) => self
                    .guarded("vigicrues", self.providers.vigilance.flood_vigilance(code))
                    .await
                    .flatten(),
                None => None,
            }
        };
        let (flow, vigilance) = tokio::join!(flow, vigilance);

        WaterConditions {
            flow: flow.flatten(),
            vigilance,
        }
    }

    /// Calculator input for the given weather at the given instant
    pub fn activity_input(
        &self,
        weather: &WeatherSnapshot,
        at: DateTime<Utc>,
        fish_category: Option<FishCategory>,
    ) -> ActivityInput {
        let local = self.local_time(at);
        ActivityInput {
            pressure_hpa: weather.pressure_hpa,
            pressure_trend: weather.pressure_trend.unwrap_or(PressureTrend::Stable),
            temperature_celsius: weather.temperature_celsius,
            water_temperature_celsius: None,
            wind_speed_kmh: weather.wind_speed_kmh,
            cloud_cover_percent: weather.cloud_cover_percent,
            moon_phase: MoonPhase::from_datetime(at),
            hour_of_day: local.hour(),
            month: local.month(),
            fish_category,
        }
    }

    /// Activity index for the spot with live water adjustments layered on top.
    ///
    /// The flow and vigilance lookups degrade to "no adjustment" on failure;
    /// only invalid weather values surface as an error.
    #[instrument(skip(self, spot, weather), fields(spot_id = %spot.id))]
    pub async fn compute_dynamic_score(
        &self,
        spot: &Spot,
        weather: &WeatherSnapshot,
        at: DateTime<Utc>,
        fish_category: Option<FishCategory>,
    ) -> AppResult<DynamicScore> {
        let water = self.water_conditions(spot).await;
        let activity = calculate_fish_activity(&self.activity_input(weather, at, fish_category))?;
        Ok(adjust_for_water(activity.score, activity.factors, water))
    }

    /// Score a spot by id
    pub async fn score_spot(&self, spot_id: Uuid) -> AppResult<SpotScore> {
        let spot = self
            .spots
            .get_spot(spot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Spot {}", spot_id)))?;
        Ok(self.score_for(&spot, None, Utc::now()).await)
    }

    /// Full score for a loaded spot. Never fails: missing weather falls back
    /// to a neutral dynamic score.
    #[instrument(skip(self, spot), fields(spot_id = %spot.id))]
    pub async fn score_for(
        &self,
        spot: &Spot,
        fish_category: Option<FishCategory>,
        at: DateTime<Utc>,
    ) -> SpotScore {
        let (weather, water) = tokio::join!(self.current_weather(spot), self.water_conditions(spot));

        let activity = weather.as_ref().and_then(|weather| {
            match calculate_fish_activity(&self.activity_input(weather, at, fish_category)) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    warn!(error = %e, "Weather values rejected by the activity calculator");
                    None
                }
            }
        });

        let (base_score, base_factors) = match activity {
            Some(activity) => (activity.score, activity.factors),
            None => (
                NEUTRAL_DYNAMIC_SCORE,
                vec![ActivityFactor::new(
                    "Weather unavailable",
                    FactorImpact::Neutral,
                    "Live weather could not be fetched, activity assumed average",
                )],
            ),
        };

        let dynamic = adjust_for_water(base_score, base_factors, water);
        let fishability_score = compute_fishability_score(spot.static_score, dynamic.score as f64);
        debug!(
            dynamic_score = dynamic.score,
            fishability_score,
            "Spot scored"
        );

        SpotScore {
            spot_id: spot.id,
            static_score: spot.static_score,
            dynamic_score: dynamic.score,
            fishability_score,
            level: ActivityLevel::from_score(fishability_score),
            factors: dynamic.factors,
            weather,
            water: dynamic.water,
            computed_at: at,
        }
    }
}

fn adjust_for_water(
    base_score: u8,
    mut factors: Vec<ActivityFactor>,
    water: WaterConditions,
) -> DynamicScore {
    let adjusted = apply_water_adjustment(base_score, water.flow_status(), water.vigilance_level());
    factors.extend(adjusted.factors);
    DynamicScore {
        score: adjusted.score,
        factors,
        water,
    }
}
