use crate::config::toml_config::GrafanaConfig;
use crate::core::{Dashboard, DashboardSink};
use crate::utils::error::{GridderError, Result};
use crate::utils::validation;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const SAVE_DASHBOARD_PATH: &str = "api/dashboards/db";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveDashboardRequest<'a> {
    dashboard: &'a Dashboard,
    overwrite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_uid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveDashboardResponse {
    pub id: Option<u64>,
    pub uid: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub version: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Publishes dashboards through Grafana's `POST /api/dashboards/db`.
#[derive(Debug, Clone)]
pub struct GrafanaApiSink {
    client: Client,
    base_url: Url,
    api_key: String,
    folder_uid: Option<String>,
    overwrite: bool,
    message: Option<String>,
}

impl GrafanaApiSink {
    pub fn from_config(config: &GrafanaConfig) -> Result<Self> {
        validation::validate_url("grafana.url", &config.url)?;
        let api_key = validation::validate_required_field("grafana.api_key", &config.api_key)?;

        // Url::join 會取代最後一段路徑，子路徑部署時需補上結尾斜線
        let mut base_url = Url::parse(&config.url).map_err(|e| GridderError::InvalidConfigValueError {
            field: "grafana.url".to_string(),
            value: config.url.clone(),
            reason: e.to_string(),
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.clone(),
            folder_uid: config.folder_uid.clone(),
            overwrite: config.overwrite.unwrap_or(false),
            message: config.message.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GridderError::ConfigError {
                message: format!("Cannot build Grafana URL for '{}': {}", path, e),
            })
    }

    /// Where the saved dashboard can be opened. Grafana reports `url` as an
    /// absolute path that already carries any sub-path.
    fn dashboard_location(&self, saved: &SaveDashboardResponse) -> Result<Url> {
        match (&saved.url, &saved.uid) {
            (Some(url), _) => self.base_url.join(url).map_err(|e| GridderError::ConfigError {
                message: format!("Cannot build Grafana URL for '{}': {}", url, e),
            }),
            (None, Some(uid)) => self.endpoint(&format!("d/{}", uid)),
            (None, None) => Ok(self.base_url.clone()),
        }
    }

    pub async fn save_dashboard(&self, dashboard: &Dashboard) -> Result<SaveDashboardResponse> {
        let endpoint = self.endpoint(SAVE_DASHBOARD_PATH)?;
        let body = SaveDashboardRequest {
            dashboard,
            overwrite: self.overwrite,
            folder_uid: self.folder_uid.as_deref(),
            message: self.message.as_deref(),
        };

        tracing::debug!("📡 POST {}", endpoint);
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Grafana response status: {}", status);

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);
        tracing::warn!("⚠️ Grafana rejected dashboard '{}': {}", dashboard.title, message);

        Err(GridderError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DashboardSink for GrafanaApiSink {
    async fn write_dashboard(&self, dashboard: &Dashboard) -> Result<String> {
        let saved = self.save_dashboard(dashboard).await?;
        tracing::info!(
            "🌐 Grafana saved dashboard uid={} version={}",
            saved.uid.as_deref().unwrap_or("-"),
            saved.version.unwrap_or_default()
        );

        Ok(self.dashboard_location(&saved)?.to_string())
    }
}
