pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "grafana-gridder")]
#[command(about = "Create grid layouts for Grafana dashboards")]
pub struct CliConfig {
    /// Path to the TOML layout file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: String,

    /// Write the dashboard JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Publish the dashboard to the Grafana HTTP API
    #[arg(long)]
    pub publish: bool,

    /// Override grafana.url from the config file
    #[arg(long)]
    pub grafana_url: Option<String>,

    /// Override grafana.api_key from the config file
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print the computed layout without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write compact JSON instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn pretty(&self) -> bool {
        !self.compact
    }

    /// 將命令列參數覆蓋到檔案配置
    pub fn apply_overrides(&self, config: &mut toml_config::DashboardConfig) {
        if self.grafana_url.is_none() && self.api_key.is_none() {
            return;
        }

        let grafana = config
            .grafana
            .get_or_insert_with(toml_config::GrafanaConfig::default);
        if let Some(url) = &self.grafana_url {
            grafana.url = url.clone();
            tracing::info!("🔧 Grafana URL overridden to: {}", url);
        }
        if let Some(api_key) = &self.api_key {
            grafana.api_key = Some(api_key.clone());
            tracing::info!("🔧 Grafana API key overridden from command line");
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config)?;
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        if let Some(url) = &self.grafana_url {
            validation::validate_url("grafana_url", url)?;
        }
        Ok(())
    }
}
