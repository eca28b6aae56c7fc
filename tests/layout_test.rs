use grafana_gridder::{
    width_units, DashboardPanel, GridPos, GroupOptions, Layout, Panel, PanelGroup,
    PanelPositioning, PanelSize, Placeable, RowHeights, RowPanel, GRID_WIDTH,
};
use std::collections::BTreeMap;

fn panels(count: usize) -> Vec<Panel> {
    (0..count).map(|i| Panel::time_series(format!("series {}", i))).collect()
}

fn positions(panels: &[DashboardPanel]) -> Vec<GridPos> {
    panels.iter().map(|p| p.grid_pos().expect("panel without gridPos")).collect()
}

fn overlaps(a: &GridPos, b: &GridPos) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

#[test]
fn test_every_row_spans_full_width() {
    use grafana_gridder::PanelSize::*;
    let rows = vec![
        vec![Small],
        vec![Small, Medium],
        vec![Large, Medium, Small],
        vec![XLarge, Small, Small, Medium, Large],
        vec![Small; 7],
        vec![Medium; 24],
    ];
    let count: usize = rows.iter().map(Vec::len).sum();
    let mut group = PanelGroup::new(Layout::Rows(rows), panels(count), GroupOptions::default())
        .expect("valid layout");

    let mut out = Vec::new();
    group.collect_panels(&mut out);

    // 依 y 分組後，每列寬度總和必須剛好 24 且從 x=0 連續排列
    let mut by_row: BTreeMap<u32, Vec<GridPos>> = BTreeMap::new();
    for pos in positions(&out) {
        by_row.entry(pos.y).or_default().push(pos);
    }
    assert_eq!(by_row.len(), 6);
    for row in by_row.values() {
        let mut x = 0;
        for pos in row {
            assert_eq!(pos.x, x);
            assert!(pos.w >= 1);
            x += pos.w;
        }
        assert_eq!(x, GRID_WIDTH);
    }
}

#[test]
fn test_width_units_follow_relative_sizes() {
    assert_eq!(width_units(&[4, 1, 1], GRID_WIDTH), vec![16, 4, 4]);
    assert_eq!(width_units(&[3, 1], GRID_WIDTH), vec![18, 6]);
    assert_eq!(width_units(&[1, 4, 1], GRID_WIDTH), vec![4, 16, 4]);
}

#[test]
fn test_positioned_panels_never_overlap() {
    let mut positioning = PanelPositioning::default();
    positioning.add_panel_group(
        PanelGroup::new(
            Layout::Rows(vec![vec![PanelSize::Large, PanelSize::Medium], vec![PanelSize::Small]]),
            panels(3),
            GroupOptions {
                row_heights: RowHeights::PerRow(vec![6, 12]),
                row: Some(RowPanel::new("First")),
                ..Default::default()
            },
        )
        .unwrap(),
    );

    let mut nested = PanelPositioning::default();
    nested.add_panel_group(
        PanelGroup::new(
            Layout::Repeat(vec![PanelSize::Small, PanelSize::Small, PanelSize::Small]),
            panels(6),
            GroupOptions::default(),
        )
        .unwrap(),
    );
    positioning.add_panel_group(nested);

    positioning.add_panel_group(
        PanelGroup::new(
            Layout::Repeat(vec![PanelSize::XLarge]),
            panels(2),
            GroupOptions {
                row: Some(RowPanel::new("Last")),
                row_heights: RowHeights::Uniform(3),
                ..Default::default()
            },
        )
        .unwrap(),
    );

    let out = positioning.panels();
    let all = positions(&out);
    assert_eq!(all.len(), 3 + 1 + 6 + 2 + 1);

    for (i, a) in all.iter().enumerate() {
        for b in all.iter().skip(i + 1) {
            assert!(!overlaps(a, b), "{:?} overlaps {:?}", a, b);
        }
    }

    let bottom = all.iter().map(|pos| pos.y + pos.h).max().unwrap();
    assert!(bottom <= positioning.height());
}

#[test]
fn test_row_header_comes_before_its_panels() {
    let mut positioning = PanelPositioning::new(vec![Box::new(
        PanelGroup::new(
            Layout::Repeat(vec![PanelSize::Small, PanelSize::Small]),
            panels(2),
            GroupOptions {
                row: Some(RowPanel::new("Header")),
                ..Default::default()
            },
        )
        .unwrap(),
    )]);
    positioning.set_y(3);

    let out = positioning.panels();
    assert_eq!(out[0].kind(), "row");
    assert_eq!(out[0].grid_pos(), Some(GridPos::new(0, 3, 24, 1)));
    assert_eq!(out[1].grid_pos(), Some(GridPos::new(0, 5, 12, 8)));
    assert_eq!(out[2].grid_pos(), Some(GridPos::new(12, 5, 12, 8)));
}
