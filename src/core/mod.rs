pub mod engine;
pub mod panel_group;
pub mod positioning;

pub use crate::domain::model::{Dashboard, DashboardPanel, GridPos, Panel, RowPanel};
pub use crate::domain::ports::{DashboardSink, Placeable};
pub use crate::utils::error::Result;
