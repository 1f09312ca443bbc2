//! Vigicrues flood vigilance client
//!
//! A hydrology station can be attached to several monitored river sections;
//! the most severe vigilance level among them is reported.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{FloodVigilance, VigilanceLevel};

use super::{check_status, http_client, FloodVigilanceProvider};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct VigicruesClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VigilanceResponse {
    #[serde(rename = "ListEntVigiCru", default)]
    sections: Vec<SectionRecord>,
}

#[derive(Debug, Deserialize)]
struct SectionRecord {
    #[serde(rename = "LbEntVigiCru", default)]
    name: String,
    #[serde(rename = "NivInfViCr")]
    level: Option<u8>,
}

impl VigicruesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn vigilance_for_station(&self, station_code: &str) -> AppResult<Option<FloodVigilance>> {
        let url = format!(
            "{}/1/InfoVigiCru.json?CdStationHydro={}",
            self.base_url, station_code
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status("Vigicrues", response).await?;

        let data: VigilanceResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse Vigicrues response: {}", e))
        })?;

        Ok(most_severe(data.sections))
    }
}

#[async_trait]
impl FloodVigilanceProvider for VigicruesClient {
    async fn flood_vigilance(&self, station_code: &str) -> AppResult<Option<FloodVigilance>> {
        self.vigilance_for_station(station_code).await
    }
}

fn most_severe(sections: Vec<SectionRecord>) -> Option<FloodVigilance> {
    sections
        .into_iter()
        .filter_map(|section| {
            let level = VigilanceLevel::from_level(section.level?).ok()?;
            Some(FloodVigilance {
                level,
                troncon_name: section.name,
            })
        })
        .max_by_key(|vigilance| vigilance.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, level: Option<u8>) -> SectionRecord {
        SectionRecord {
            name: name.to_string(),
            level,
        }
    }

    #[test]
    fn test_most_severe_section_wins() {
        let vigilance = most_severe(vec![
            section("Loire amont", Some(1)),
            section("Loire bourbonnaise", Some(3)),
            section("Allier", Some(2)),
        ])
        .unwrap();
        assert_eq!(vigilance.level, VigilanceLevel::Orange);
        assert_eq!(vigilance.troncon_name, "Loire bourbonnaise");
    }

    #[test]
    fn test_invalid_levels_are_ignored() {
        assert!(most_severe(vec![section("A", None), section("B", Some(7))]).is_none());
        assert!(most_severe(Vec::new()).is_none());
    }
}
