use grafana_gridder::utils::validation::Validate;
use grafana_gridder::{Dashboard, DashboardConfig, DashboardPanel, GridderEngine, LocalFileSink};
use tempfile::TempDir;

const CONFIG: &str = r#"
[dashboard]
title = "Service Overview"
uid = "service-overview"
tags = ["generated", "service"]
refresh = "30s"
time_from = "now-6h"

[[groups]]
layout = [["large", "medium"], ["small", "small"]]

[[groups.panels]]
type = "timeseries"
title = "Requests"
targets = [{ expr = "sum(rate(http_requests_total[5m]))", refId = "A" }]

[[groups.panels]]
type = "timeseries"
title = "Latency"

[[groups.panels]]
type = "bargauge"
title = "CPU"

[[groups.panels]]
type = "bargauge"
title = "Memory"

[[groups]]
layout = ["small", "medium", "medium"]
row = "Queues"
row_heights = [6]

[[groups.panels]]
type = "stat"
title = "Depth"

[[groups.panels]]
type = "stat"
title = "Consumers"

[[groups.panels]]
type = "stat"
title = "Throughput"
"#;

#[tokio::test]
async fn test_end_to_end_toml_to_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard.toml");
    tokio::fs::write(&config_path, CONFIG).await.unwrap();
    let output_path = temp_dir.path().join("out/service.json");

    let config = DashboardConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let engine = GridderEngine::new(LocalFileSink::new(&output_path, true));
    let location = engine.run(&config).await.unwrap();
    assert_eq!(location, output_path.display().to_string());

    let content = tokio::fs::read_to_string(&output_path).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["title"], "Service Overview");
    assert_eq!(json["uid"], "service-overview");
    assert_eq!(json["refresh"], "30s");
    assert_eq!(json["time"]["from"], "now-6h");
    assert_eq!(json["time"]["to"], "now");
    assert!(json["id"].is_null());

    let panels = json["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 8);
    assert_eq!(panels[0]["targets"][0]["refId"], "A");
    assert_eq!(panels[0]["gridPos"], serde_json::json!({"x": 0, "y": 0, "w": 15, "h": 8}));
    assert_eq!(panels[4]["type"], "row");
    assert_eq!(panels[4]["title"], "Queues");
    assert_eq!(panels[4]["gridPos"], serde_json::json!({"x": 0, "y": 18, "w": 24, "h": 1}));
    assert_eq!(panels[7]["gridPos"], serde_json::json!({"x": 14, "y": 20, "w": 10, "h": 6}));

    let dashboard: Dashboard = serde_json::from_str(&content).unwrap();
    assert!(matches!(dashboard.panels[4], DashboardPanel::Row(_)));
    assert_eq!(dashboard.tags, vec!["generated", "service"]);
}

#[tokio::test]
async fn test_layout_error_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("broken.json");

    let config = DashboardConfig::from_toml_str(
        r#"
[dashboard]
title = "Broken"

[[groups]]
layout = [["small"], ["small"]]
row_heights = [8, 8, 8]

[[groups.panels]]
type = "stat"
title = "a"

[[groups.panels]]
type = "stat"
title = "b"
"#,
    )
    .unwrap();

    let engine = GridderEngine::new(LocalFileSink::new(&output_path, false));
    let err = engine.run(&config).await.unwrap_err();

    assert!(err.to_string().contains("Row height count"));
    assert!(!output_path.exists());
}
