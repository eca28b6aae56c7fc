use crate::domain::model::{Dashboard, DashboardPanel};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A vertically stackable block of panels: a single panel group or a nested
/// positioning of further blocks.
pub trait Placeable: std::fmt::Debug + Send + Sync {
    /// Total height of the block in grid units, gaps included.
    fn height(&self) -> u32;

    /// Moves the top edge of the block to `y`.
    fn set_y(&mut self, y: u32);

    /// Appends the positioned panels of the block to `out`, in layout order.
    fn collect_panels(&mut self, out: &mut Vec<DashboardPanel>);
}

#[async_trait]
pub trait DashboardSink: Send + Sync {
    /// Writes the dashboard and returns where it went (path, URL, ...).
    async fn write_dashboard(&self, dashboard: &Dashboard) -> Result<String>;
}
