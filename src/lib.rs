pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::grafana::GrafanaApiSink;
pub use config::cli::{LocalFileSink, StdoutSink};
pub use config::toml_config::DashboardConfig;
pub use crate::core::{
    engine::GridderEngine,
    panel_group::{width_units, GroupOptions, Layout, PanelGroup, PanelSize, RowHeights, GRID_WIDTH},
    positioning::PanelPositioning,
};
pub use domain::model::{Dashboard, DashboardPanel, GridPos, Panel, RowPanel};
pub use domain::ports::{DashboardSink, Placeable};
pub use utils::error::{GridderError, Result};
