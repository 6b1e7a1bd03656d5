//! Statistics API client.

use crate::config::ApiConfig;
use crate::error::{PipelineError, Result};
use crate::landing::{landing_id, raw_file_name};
use crate::stats::ApiEnvelope;
use chrono::NaiveDateTime;
use reqwest::Url;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Client for the team statistics endpoint.
pub struct StatsClient {
    http_client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: String,
}

impl StatsClient {
    /// Create a client; fails if no API key is configured.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let api_key = api.resolve_api_key().ok_or(PipelineError::MissingApiKey)?;
        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            host: api.host().to_string(),
            api_key,
        })
    }

    /// `GET {base}/teams/statistics?league=&season=&team=`
    pub fn statistics_url(&self, league: u32, season: i32, team: u32) -> Result<Url> {
        statistics_url(&self.base_url, league, season, team)
    }

    /// Fetch a team's season statistics; returns the `response` payload.
    pub async fn team_statistics(&self, league: u32, season: i32, team: u32) -> Result<JsonValue> {
        let url = self.statistics_url(league, season, team)?;
        info!(%url, "Fetching team statistics");

        let response = self
            .http_client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope = response.json().await?;
        extract_response(envelope, status.as_u16())
    }

    /// Fetch the configured team's statistics into `<dir>/<landing id>.jsonl`.
    pub async fn fetch_to_file(&self, api: &ApiConfig, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
        let payload = self
            .team_statistics(api.league_id, api.season, api.team_id)
            .await?;

        fs::create_dir_all(dir)?;
        let path = dir.join(raw_file_name(&landing_id(&api.team_slug, api.season, now)));
        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');
        fs::write(&path, line)?;

        info!(file = %path.display(), "Statistics saved. Can now be loaded into the warehouse.");
        Ok(path)
    }
}

fn statistics_url(base_url: &str, league: u32, season: i32, team: u32) -> Result<Url> {
    let endpoint = format!("{}/teams/statistics", base_url.trim_end_matches('/'));
    Url::parse_with_params(
        &endpoint,
        &[
            ("league", league.to_string()),
            ("season", season.to_string()),
            ("team", team.to_string()),
        ],
    )
    .map_err(|e| PipelineError::Config(format!("invalid API base URL '{}': {}", base_url, e)))
}

fn extract_response(envelope: ApiEnvelope, status: u16) -> Result<JsonValue> {
    if let Some(message) = envelope.error_message() {
        return Err(PipelineError::Api {
            status,
            body: message,
        });
    }
    Ok(envelope.response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_key() -> ApiConfig {
        ApiConfig {
            api_key: Some("test-key".to_string()),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_statistics_url() {
        let client = StatsClient::new(&config_with_key()).unwrap();
        let url = client.statistics_url(283, 2023, 635).unwrap();
        assert_eq!(
            url.as_str(),
            "https://v3.football.api-sports.io/teams/statistics?league=283&season=2023&team=635"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            statistics_url("not a url", 1, 2023, 1),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let api = ApiConfig {
            api_key: Some("  ".to_string()),
            base_url: "https://example.test".to_string(),
            ..ApiConfig::default()
        };
        // The environment may supply a key; only assert when it does not.
        if std::env::var(crate::config::API_KEY_ENV).is_err() {
            assert!(matches!(StatsClient::new(&api), Err(PipelineError::MissingApiKey)));
        }
    }

    #[test]
    fn test_extract_response() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "response": {"team": {"id": 635, "name": "Dinamo Bucuresti"}},
            "errors": []
        }))
        .unwrap();
        let payload = extract_response(envelope, 200).unwrap();
        assert_eq!(payload["team"]["id"], 635);

        let failing: ApiEnvelope =
            serde_json::from_value(json!({"response": [], "errors": {"requests": "limit"}})).unwrap();
        assert!(matches!(
            extract_response(failing, 200),
            Err(PipelineError::Api { status: 200, .. })
        ));
    }
}
