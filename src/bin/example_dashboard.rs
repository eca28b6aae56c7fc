use anyhow::Result;
use grafana_gridder::{
    Dashboard, GroupOptions, Layout, Panel, PanelGroup, PanelPositioning, PanelSize, RowPanel,
};

fn main() -> Result<()> {
    let top = PanelGroup::new(
        Layout::Rows(vec![
            vec![PanelSize::Large, PanelSize::Medium],
            vec![PanelSize::Small, PanelSize::Small],
        ]),
        vec![
            Panel::time_series("Requests"),
            Panel::time_series("Latency"),
            Panel::bar_gauge("CPU"),
            Panel::bar_gauge("Memory"),
        ],
        GroupOptions::default(),
    )?;

    let details = PanelGroup::new(
        Layout::Repeat(vec![PanelSize::Small, PanelSize::Medium, PanelSize::Medium]),
        vec![
            Panel::time_series("Queue depth"),
            Panel::time_series("Consumers"),
            Panel::time_series("Throughput"),
        ],
        GroupOptions {
            row: Some(RowPanel::new("RowTitle")),
            ..Default::default()
        },
    )?;

    let mut positioning = PanelPositioning::default();
    positioning.add_panel_group(top);
    positioning.add_panel_group(details);

    let mut dashboard = Dashboard::new("My Dashboard").with_panels(positioning.panels());
    dashboard.auto_panel_ids();

    println!("{}", dashboard.to_json_pretty()?);
    Ok(())
}
