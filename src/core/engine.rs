use crate::config::toml_config::DashboardConfig;
use crate::core::{Dashboard, DashboardPanel, DashboardSink};
use crate::utils::error::Result;

pub struct GridderEngine<S: DashboardSink> {
    sink: S,
}

impl<S: DashboardSink> GridderEngine<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Builds the positioned dashboard and hands it to the sink.
    pub async fn run(&self, config: &DashboardConfig) -> Result<String> {
        tracing::info!("🧱 Building dashboard '{}'", config.dashboard.title);
        let dashboard = config.build_dashboard()?;
        log_summary(&dashboard);

        self.publish(&dashboard).await
    }

    pub async fn publish(&self, dashboard: &Dashboard) -> Result<String> {
        tracing::info!("📤 Writing dashboard '{}'", dashboard.title);
        let location = self.sink.write_dashboard(dashboard).await?;
        tracing::info!("✅ Dashboard written to: {}", location);
        Ok(location)
    }
}

fn log_summary(dashboard: &Dashboard) {
    let rows = dashboard.panels.iter().filter(|p| p.kind() == "row").count();
    let collapsed: usize = dashboard
        .panels
        .iter()
        .map(|p| match p {
            DashboardPanel::Row(row) => row.panels.len(),
            DashboardPanel::Panel(_) => 0,
        })
        .sum();
    let bottom = dashboard
        .panels
        .iter()
        .filter_map(|p| p.grid_pos())
        .map(|pos| pos.y + pos.h)
        .max()
        .unwrap_or(0);
    tracing::info!(
        "📊 {} panels ({} rows), grid height {}",
        dashboard.panels.len() - rows + collapsed,
        rows,
        bottom
    );
    for panel in &dashboard.panels {
        if let Some(pos) = panel.grid_pos() {
            tracing::debug!(
                "  {:>10} '{}' x={} y={} w={} h={}",
                panel.kind(),
                panel.title(),
                pos.x,
                pos.y,
                pos.w,
                pos.h
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::GridderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        written: Mutex<Vec<Dashboard>>,
    }

    #[async_trait]
    impl DashboardSink for MemorySink {
        async fn write_dashboard(&self, dashboard: &Dashboard) -> Result<String> {
            self.written.lock().unwrap().push(dashboard.clone());
            Ok("memory".to_string())
        }
    }

    #[test]
    fn test_run_writes_positioned_dashboard() {
        let config = DashboardConfig::from_toml_str(
            r#"
[dashboard]
title = "Engine"

[[groups]]
layout = ["small", "small"]
row = "Row"

[[groups.panels]]
type = "stat"
title = "a"

[[groups.panels]]
type = "stat"
title = "b"
"#,
        )
        .unwrap();

        let engine = GridderEngine::new(MemorySink::default());
        let location = tokio_test::block_on(engine.run(&config)).unwrap();
        assert_eq!(location, "memory");

        let written = engine.sink().written.lock().unwrap();
        assert_eq!(written.len(), 1);
        let dashboard = &written[0];
        assert_eq!(dashboard.panels.len(), 3);
        assert_eq!(dashboard.panels[1].grid_pos().unwrap().x, 0);
        assert_eq!(dashboard.panels[2].grid_pos().unwrap().x, 12);
        assert_eq!(dashboard.panels[2].id(), Some(3));
    }

    #[test]
    fn test_run_rejects_invalid_config_before_layout() {
        let config = DashboardConfig::from_toml_str(
            r#"
[dashboard]
title = "Overflow"

[[groups]]
layout = [["small"], ["small"]]
row_heights = [4294967295, 4294967295]

[[groups.panels]]
type = "stat"
title = "a"

[[groups.panels]]
type = "stat"
title = "b"
"#,
        )
        .unwrap();

        let engine = GridderEngine::new(MemorySink::default());
        let result = tokio_test::block_on(engine.run(&config));

        assert!(matches!(result, Err(GridderError::InvalidConfigValueError { .. })));
        assert!(engine.sink().written.lock().unwrap().is_empty());
    }
}
