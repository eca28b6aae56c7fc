use crate::core::{Dashboard, DashboardSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

fn render(dashboard: &Dashboard, pretty: bool) -> Result<String> {
    let json = if pretty {
        dashboard.to_json_pretty()?
    } else {
        dashboard.to_json()?
    };
    Ok(json)
}

/// Writes the dashboard JSON to a local file.
#[derive(Debug, Clone)]
pub struct LocalFileSink {
    path: PathBuf,
    pretty: bool,
}

impl LocalFileSink {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }
}

#[async_trait]
impl DashboardSink for LocalFileSink {
    async fn write_dashboard(&self, dashboard: &Dashboard) -> Result<String> {
        let json = render(dashboard, self.pretty)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, json).await?;
        Ok(self.path.display().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StdoutSink {
    pretty: bool,
}

impl StdoutSink {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

#[async_trait]
impl DashboardSink for StdoutSink {
    async fn write_dashboard(&self, dashboard: &Dashboard) -> Result<String> {
        println!("{}", render(dashboard, self.pretty)?);
        Ok("stdout".to_string())
    }
}
