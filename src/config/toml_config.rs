use crate::core::panel_group::{GroupOptions, Layout, PanelGroup, RowHeights};
use crate::core::positioning::PanelPositioning;
use crate::core::{Dashboard, Panel, RowPanel};
use crate::domain::model::TimeRange;
use crate::utils::error::{GridderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

const MAX_ROW_HEIGHT: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub dashboard: DashboardSection,
    pub grafana: Option<GrafanaConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSection {
    pub title: String,
    pub uid: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timezone: Option<String>,
    pub refresh: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrafanaConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub folder_uid: Option<String>,
    pub overwrite: Option<bool>,
    pub message: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// A block of the dashboard: either a group of panels or a nested list of
/// blocks that is stacked as one unit.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupConfig {
    Nested(NestedConfig),
    Panels(PanelGroupConfig),
}

// 有 groups 鍵即為巢狀區塊，不可與 layout 混用
impl<'de> Deserialize<'de> for GroupConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.get("groups").is_none() {
            return PanelGroupConfig::deserialize(value)
                .map(GroupConfig::Panels)
                .map_err(de::Error::custom);
        }
        if value.get("layout").is_some() {
            return Err(de::Error::custom(
                "a group has either `layout` with panels or nested `groups`, not both",
            ));
        }
        NestedConfig::deserialize(value)
            .map(GroupConfig::Nested)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedConfig {
    pub groups: Vec<GroupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelGroupConfig {
    pub layout: Layout,
    #[serde(default)]
    pub panels: Vec<Panel>,
    /// Title of the row header shown above the group.
    pub row: Option<String>,
    #[serde(default)]
    pub row_collapsed: bool,
    #[serde(default)]
    pub row_heights: RowHeights,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GridderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${GRAFANA_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GridderError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("dashboard.title", &self.dashboard.title)?;

        if self.groups.is_empty() {
            return Err(GridderError::ConfigValidationError {
                field: "groups".to_string(),
                message: "At least one panel group is required".to_string(),
            });
        }
        validate_groups("groups", &self.groups)?;

        if let Some(grafana) = &self.grafana {
            validation::validate_url("grafana.url", &grafana.url)?;
        }

        Ok(())
    }

    /// Returns the Grafana target, checking that publishing is possible.
    pub fn grafana_target(&self) -> Result<&GrafanaConfig> {
        let grafana = validation::validate_required_field("grafana", &self.grafana)?;
        validation::validate_url("grafana.url", &grafana.url)?;
        let api_key = validation::validate_required_field("grafana.api_key", &grafana.api_key)?;
        validation::validate_non_empty_string("grafana.api_key", api_key)?;
        Ok(grafana)
    }

    /// 取得面板總數 (不含 row header)
    pub fn panel_count(&self) -> usize {
        fn count(groups: &[GroupConfig]) -> usize {
            groups
                .iter()
                .map(|group| match group {
                    GroupConfig::Nested(nested) => count(&nested.groups),
                    GroupConfig::Panels(panels) => panels.panels.len(),
                })
                .sum()
        }
        count(&self.groups)
    }

    pub fn build_positioning(&self) -> Result<PanelPositioning> {
        build_positioning(&self.groups)
    }

    /// Validates the config, lays out every group and assembles the
    /// dashboard, with panel ids.
    pub fn build_dashboard(&self) -> Result<Dashboard> {
        self.validate_config()?;
        let mut positioning = self.build_positioning()?;

        let section = &self.dashboard;
        let mut dashboard = Dashboard::new(section.title.clone()).with_panels(positioning.panels());
        dashboard.uid = section.uid.clone();
        dashboard.tags = section.tags.clone();
        dashboard.refresh = section.refresh.clone();
        if let Some(timezone) = &section.timezone {
            dashboard.timezone = timezone.clone();
        }
        let default_time = TimeRange::default();
        dashboard.time = TimeRange {
            from: section.time_from.clone().unwrap_or(default_time.from),
            to: section.time_to.clone().unwrap_or(default_time.to),
        };
        dashboard.auto_panel_ids();

        Ok(dashboard)
    }
}

fn validate_groups(path: &str, groups: &[GroupConfig]) -> Result<()> {
    for (index, group) in groups.iter().enumerate() {
        let field = format!("{}[{}]", path, index);
        match group {
            GroupConfig::Nested(nested) => {
                if nested.groups.is_empty() {
                    return Err(GridderError::ConfigValidationError {
                        field,
                        message: "Nested groups cannot be empty".to_string(),
                    });
                }
                validate_groups(&format!("{}.groups", field), &nested.groups)?;
            }
            GroupConfig::Panels(panels) => {
                let heights = match &panels.row_heights {
                    RowHeights::Uniform(height) => std::slice::from_ref(height),
                    RowHeights::PerRow(heights) => heights.as_slice(),
                };
                for &height in heights {
                    validation::validate_range(
                        &format!("{}.row_heights", field),
                        height,
                        1,
                        MAX_ROW_HEIGHT,
                    )?;
                }
                if let Some(row) = &panels.row {
                    validation::validate_non_empty_string(&format!("{}.row", field), row)?;
                }
            }
        }
    }
    Ok(())
}

fn build_positioning(groups: &[GroupConfig]) -> Result<PanelPositioning> {
    let mut positioning = PanelPositioning::default();
    for group in groups {
        match group {
            GroupConfig::Nested(nested) => positioning.add_panel_group(build_positioning(&nested.groups)?),
            GroupConfig::Panels(config) => positioning.add_panel_group(build_group(config)?),
        }
    }
    Ok(positioning)
}

fn build_group(config: &PanelGroupConfig) -> Result<PanelGroup> {
    let row = config
        .row
        .as_ref()
        .map(|title| RowPanel::new(title.clone()).collapsed(config.row_collapsed));

    PanelGroup::new(
        config.layout.clone(),
        config.panels.clone(),
        GroupOptions {
            y: 0,
            row_heights: config.row_heights.clone(),
            row,
        },
    )
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
