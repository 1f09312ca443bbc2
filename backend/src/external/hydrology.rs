//! Hub'Eau ONDE client
//!
//! ONDE is the national low-water observation network: field agents record
//! whether a watercourse is flowing, barely flowing, stagnant or dry. We ask
//! for the most recent observation within a radius of the spot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use shared::{FlowObservation, FlowStatus, GpsCoordinates};

use super::{check_status, http_client, FlowProvider};
use crate::error::{AppError, AppResult};

/// Search radius around the spot, in kilometres
const SEARCH_RADIUS_KM: u32 = 15;

#[derive(Clone)]
pub struct HubEauClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    data: Vec<ObservationRecord>,
}

#[derive(Debug, Deserialize)]
struct ObservationRecord {
    code_ecoulement: Option<String>,
    libelle_ecoulement: Option<String>,
    date_observation: Option<String>,
}

impl HubEauClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Most recent flow observation near the given coordinates
    pub async fn latest_observation(
        &self,
        coordinates: GpsCoordinates,
    ) -> AppResult<Option<FlowObservation>> {
        let url = format!(
            "{}/v1/ecoulement/observations?latitude={}&longitude={}&distance={}&size=1&sort=desc",
            self.base_url, coordinates.latitude, coordinates.longitude, SEARCH_RADIUS_KM
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status("Hub'Eau", response).await?;

        let data: ObservationsResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse Hub'Eau response: {}", e))
        })?;

        Ok(data.data.into_iter().find_map(convert_record))
    }
}

#[async_trait]
impl FlowProvider for HubEauClient {
    async fn flow_status(&self, coordinates: GpsCoordinates) -> AppResult<Option<FlowObservation>> {
        self.latest_observation(coordinates).await
    }
}

/// ONDE flow codes: 1/1a visible flow, 1f weak flow, 2 no visible flow, 3 dry
fn flow_status_from_code(code: &str) -> Option<FlowStatus> {
    match code.trim() {
        "1" | "1a" => Some(FlowStatus::Flowing),
        "1f" => Some(FlowStatus::WeakFlow),
        "2" => Some(FlowStatus::Stagnant),
        "3" => Some(FlowStatus::Dry),
        _ => None,
    }
}

fn convert_record(record: ObservationRecord) -> Option<FlowObservation> {
    let status = flow_status_from_code(record.code_ecoulement.as_deref()?)?;
    // Dates come as `YYYY-MM-DD`, sometimes with a time suffix
    let date = record.date_observation.as_deref()?.get(..10)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

    Some(FlowObservation {
        status,
        label: record
            .libelle_ecoulement
            .unwrap_or_else(|| status.as_str().to_string()),
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_codes() {
        assert_eq!(flow_status_from_code("1"), Some(FlowStatus::Flowing));
        assert_eq!(flow_status_from_code("1a"), Some(FlowStatus::Flowing));
        assert_eq!(flow_status_from_code("1f"), Some(FlowStatus::WeakFlow));
        assert_eq!(flow_status_from_code("2"), Some(FlowStatus::Stagnant));
        assert_eq!(flow_status_from_code("3"), Some(FlowStatus::Dry));
        assert_eq!(flow_status_from_code("9"), None);
    }

    #[test]
    fn test_record_with_unknown_code_is_skipped() {
        let record = ObservationRecord {
            code_ecoulement: Some("x".into()),
            libelle_ecoulement: None,
            date_observation: Some("2024-07-15".into()),
        };
        assert!(convert_record(record).is_none());
    }

    #[test]
    fn test_record_label_falls_back_to_status() {
        let record = ObservationRecord {
            code_ecoulement: Some("3".into()),
            libelle_ecoulement: None,
            date_observation: Some("2024-08-02T00:00:00Z".into()),
        };
        let observation = convert_record(record).unwrap();
        assert_eq!(observation.status, FlowStatus::Dry);
        assert_eq!(observation.label, "dry");
        assert_eq!(observation.date, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
    }
}
