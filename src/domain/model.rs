use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Placement of a panel on the dashboard grid, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// A visualisation panel. Any panel JSON not modelled here (options,
/// fieldConfig, ...) lives in `extra` and is written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Value>,
    #[serde(rename = "gridPos", skip_serializing_if = "Option::is_none")]
    pub grid_pos: Option<GridPos>,
    #[serde(default)]
    pub targets: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Panel {
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            id: None,
            description: None,
            datasource: None,
            grid_pos: None,
            targets: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn time_series(title: impl Into<String>) -> Self {
        Self::new("timeseries", title)
    }

    pub fn bar_gauge(title: impl Into<String>) -> Self {
        Self::new("bargauge", title)
    }

    pub fn stat(title: impl Into<String>) -> Self {
        Self::new("stat", title)
    }

    pub fn gauge(title: impl Into<String>) -> Self {
        Self::new("gauge", title)
    }

    pub fn table(title: impl Into<String>) -> Self {
        Self::new("table", title)
    }

    pub fn text(title: impl Into<String>) -> Self {
        Self::new("text", title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_target(mut self, target: Value) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A collapsible row header that titles a group of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPanel {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(rename = "gridPos", skip_serializing_if = "Option::is_none")]
    pub grid_pos: Option<GridPos>,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl RowPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            kind: "row".to_string(),
            title: title.into(),
            id: None,
            collapsed: false,
            grid_pos: None,
            panels: Vec::new(),
        }
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardPanel {
    Row(RowPanel),
    Panel(Panel),
}

impl DashboardPanel {
    pub fn title(&self) -> &str {
        match self {
            DashboardPanel::Row(row) => &row.title,
            DashboardPanel::Panel(panel) => &panel.title,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            DashboardPanel::Row(row) => &row.kind,
            DashboardPanel::Panel(panel) => &panel.kind,
        }
    }

    pub fn id(&self) -> Option<u32> {
        match self {
            DashboardPanel::Row(row) => row.id,
            DashboardPanel::Panel(panel) => panel.id,
        }
    }

    pub fn grid_pos(&self) -> Option<GridPos> {
        match self {
            DashboardPanel::Row(row) => row.grid_pos,
            DashboardPanel::Panel(panel) => panel.grid_pos,
        }
    }
}

// 依 "type" 欄位分派，row 以外一律視為一般 panel
impl<'de> Deserialize<'de> for DashboardPanel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_row = value.get("type").and_then(Value::as_str) == Some("row");
        if is_row {
            RowPanel::deserialize(value)
                .map(DashboardPanel::Row)
                .map_err(serde::de::Error::custom)
        } else {
            Panel::deserialize(value)
                .map(DashboardPanel::Panel)
                .map_err(serde::de::Error::custom)
        }
    }
}

impl From<Panel> for DashboardPanel {
    fn from(panel: Panel) -> Self {
        DashboardPanel::Panel(panel)
    }
}

impl From<RowPanel> for DashboardPanel {
    fn from(row: RowPanel) -> Self {
        DashboardPanel::Row(row)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            from: "now-1h".to_string(),
            to: "now".to_string(),
        }
    }
}

pub const SCHEMA_VERSION: u32 = 39;

/// Grafana dashboard JSON model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    pub time: TimeRange,
    pub editable: bool,
    pub schema_version: u32,
    #[serde(default)]
    pub panels: Vec<DashboardPanel>,
}

impl Dashboard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            uid: None,
            title: title.into(),
            tags: Vec::new(),
            timezone: "browser".to_string(),
            refresh: None,
            time: TimeRange::default(),
            editable: true,
            schema_version: SCHEMA_VERSION,
            panels: Vec::new(),
        }
    }

    pub fn with_panels(mut self, panels: Vec<DashboardPanel>) -> Self {
        self.panels = panels;
        self
    }

    /// Assigns sequential ids, starting at 1, to panels that have none.
    /// Ids already present are kept and skipped. Panels inside collapsed
    /// rows are numbered right after their row.
    pub fn auto_panel_ids(&mut self) {
        let mut taken = HashSet::new();
        for panel in &self.panels {
            taken.extend(panel.id());
            if let DashboardPanel::Row(row) = panel {
                taken.extend(row.panels.iter().filter_map(|child| child.id));
            }
        }

        let mut next = 1;
        let mut assign = |id: &mut Option<u32>| {
            if id.is_some() {
                return;
            }
            while taken.contains(&next) {
                next += 1;
            }
            *id = Some(next);
            next += 1;
        };
        for panel in &mut self.panels {
            match panel {
                DashboardPanel::Row(row) => {
                    assign(&mut row.id);
                    for child in &mut row.panels {
                        assign(&mut child.id);
                    }
                }
                DashboardPanel::Panel(panel) => assign(&mut panel.id),
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
