use crate::domain::model::{DashboardPanel, GridPos, Panel, RowPanel};
use crate::domain::ports::Placeable;
use crate::utils::error::{GridderError, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Width of a Grafana dashboard in grid units.
pub const GRID_WIDTH: u32 = 24;

pub const DEFAULT_ROW_HEIGHT: u32 = 8;

/// Height of a row header plus the gap below it.
const ROW_HEADER_HEIGHT: u32 = 2;

/// Relative width of a panel. Widths are computed against the other panels
/// on the same row, so an `XLarge` panel is four times as wide as a `Small`
/// one sharing its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SizeRepr", into = "u32")]
pub enum PanelSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl PanelSize {
    pub fn weight(self) -> u32 {
        match self {
            PanelSize::Small => 1,
            PanelSize::Medium => 2,
            PanelSize::Large => 3,
            PanelSize::XLarge => 4,
        }
    }
}

impl From<PanelSize> for u32 {
    fn from(size: PanelSize) -> Self {
        size.weight()
    }
}

impl TryFrom<u32> for PanelSize {
    type Error = GridderError;

    fn try_from(weight: u32) -> Result<Self> {
        match weight {
            1 => Ok(PanelSize::Small),
            2 => Ok(PanelSize::Medium),
            3 => Ok(PanelSize::Large),
            4 => Ok(PanelSize::XLarge),
            other => Err(GridderError::InvalidConfigValueError {
                field: "layout".to_string(),
                value: other.to_string(),
                reason: "Panel size weight must be between 1 and 4".to_string(),
            }),
        }
    }
}

impl FromStr for PanelSize {
    type Err = GridderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(PanelSize::Small),
            "medium" | "m" => Ok(PanelSize::Medium),
            "large" | "l" => Ok(PanelSize::Large),
            "xlarge" | "x-large" | "xl" => Ok(PanelSize::XLarge),
            _ => Err(GridderError::InvalidConfigValueError {
                field: "layout".to_string(),
                value: s.to_string(),
                reason: "Unknown panel size. Valid sizes: small, medium, large, xlarge".to_string(),
            }),
        }
    }
}

impl fmt::Display for PanelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelSize::Small => "small",
            PanelSize::Medium => "medium",
            PanelSize::Large => "large",
            PanelSize::XLarge => "xlarge",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Weight(u32),
    Name(String),
}

impl TryFrom<SizeRepr> for PanelSize {
    type Error = GridderError;

    fn try_from(repr: SizeRepr) -> Result<Self> {
        match repr {
            SizeRepr::Weight(weight) => PanelSize::try_from(weight),
            SizeRepr::Name(name) => name.parse(),
        }
    }
}

/// How the panels of a group are arranged into rows.
///
/// `Rows` lists the relative sizes of every row explicitly. `Repeat` gives a
/// single row pattern that is reused until all panels are placed. For
/// example `[[small, medium], [small]]` makes two rows: the first split
/// 1/3 + 2/3, the second one full-width panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Layout {
    Rows(Vec<Vec<PanelSize>>),
    Repeat(Vec<PanelSize>),
}

// 第一個元素是陣列就是 Rows，否則為 Repeat；內層錯誤訊息直接回報
impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<Value>::deserialize(deserializer)?;
        let nested = items.first().is_some_and(Value::is_array);
        let value = Value::Array(items);
        let layout = if nested {
            Vec::<Vec<PanelSize>>::deserialize(value).map(Layout::Rows)
        } else {
            Vec::<PanelSize>::deserialize(value).map(Layout::Repeat)
        };
        layout.map_err(de::Error::custom)
    }
}

impl Layout {
    fn expand(self, panel_count: usize) -> Result<Vec<Vec<PanelSize>>> {
        let rows = match self {
            Layout::Rows(rows) => {
                if rows.is_empty() {
                    return Err(GridderError::EmptyLayout);
                }
                rows
            }
            Layout::Repeat(pattern) => {
                if pattern.is_empty() {
                    return Err(GridderError::EmptyLayout);
                }
                let repeats = panel_count / pattern.len();
                vec![pattern; repeats]
            }
        };

        if rows.iter().any(|row| row.is_empty()) {
            return Err(GridderError::EmptyLayout);
        }
        Ok(rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RowHeights {
    Uniform(u32),
    PerRow(Vec<u32>),
}

impl<'de> Deserialize<'de> for RowHeights {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let heights = if value.is_array() {
            Vec::<u32>::deserialize(value).map(RowHeights::PerRow)
        } else {
            u32::deserialize(value).map(RowHeights::Uniform)
        };
        heights.map_err(de::Error::custom)
    }
}

impl Default for RowHeights {
    fn default() -> Self {
        RowHeights::Uniform(DEFAULT_ROW_HEIGHT)
    }
}

impl RowHeights {
    fn resolve(self, row_count: usize) -> Result<Vec<u32>> {
        match self {
            RowHeights::Uniform(height) => Ok(vec![height; row_count]),
            RowHeights::PerRow(heights) => {
                if heights.len() != row_count {
                    return Err(GridderError::RowHeightCountMismatch {
                        expected: row_count,
                        actual: heights.len(),
                    });
                }
                Ok(heights)
            }
        }
    }
}

/// Optional settings of a [`PanelGroup`].
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    /// Top edge of the group.
    pub y: u32,
    pub row_heights: RowHeights,
    /// Row header placed above the panels.
    pub row: Option<RowPanel>,
}

/// A group of panels laid out in full-width rows.
#[derive(Debug, Clone)]
pub struct PanelGroup {
    rows: Vec<Vec<PanelSize>>,
    row_heights: Vec<u32>,
    panels: Vec<Panel>,
    row: Option<RowPanel>,
    y: u32,
    height: u32,
}

impl PanelGroup {
    pub fn new(layout: Layout, panels: Vec<Panel>, options: GroupOptions) -> Result<Self> {
        let rows = layout.expand(panels.len())?;

        let slots: usize = rows.iter().map(Vec::len).sum();
        if slots != panels.len() {
            return Err(GridderError::PanelCountMismatch {
                expected: slots,
                actual: panels.len(),
            });
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() > GRID_WIDTH as usize {
                return Err(GridderError::RowTooWide {
                    row: index,
                    panels: row.len(),
                    width: GRID_WIDTH,
                });
            }
        }

        let row_heights = options.row_heights.resolve(rows.len())?;
        let header = if options.row.is_some() { ROW_HEADER_HEIGHT } else { 0 };
        // 以 u64 累加，底部超出 u32 即拒絕，之後的座標運算不會溢位
        let height = row_heights.iter().map(|&h| u64::from(h) + 1).sum::<u64>() + u64::from(header);
        let bottom = u64::from(options.y) + height;
        if bottom > u64::from(u32::MAX) {
            return Err(GridderError::LayoutTooTall {
                bottom,
                max: u32::MAX,
            });
        }
        let height = height as u32;

        let mut group = Self {
            rows,
            row_heights,
            panels,
            row: options.row,
            y: options.y,
            height,
        };
        group.compute_grid_pos();
        Ok(group)
    }

    fn compute_grid_pos(&mut self) {
        let mut current_y = self.y;
        if let Some(row) = &mut self.row {
            row.grid_pos = Some(GridPos::new(0, current_y, GRID_WIDTH, 1));
            current_y += ROW_HEADER_HEIGHT;
        }

        let mut panels = self.panels.iter_mut();
        for (sizes, &row_height) in self.rows.iter().zip(&self.row_heights) {
            let weights: Vec<u32> = sizes.iter().map(|size| size.weight()).collect();
            let mut current_x = 0;
            for width in width_units(&weights, GRID_WIDTH) {
                // 面板數量已在建構時與 layout 核對過
                if let Some(panel) = panels.next() {
                    panel.grid_pos = Some(GridPos::new(current_x, current_y, width, row_height));
                }
                current_x += width;
            }
            current_y += row_height + 1;
        }
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn rows(&self) -> &[Vec<PanelSize>] {
        &self.rows
    }

    pub fn row_heights(&self) -> &[u32] {
        &self.row_heights
    }

    pub fn row(&self) -> Option<&RowPanel> {
        self.row.as_ref()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn into_panels(mut self) -> Vec<DashboardPanel> {
        let mut out = Vec::with_capacity(self.panels.len() + 1);
        self.collect_panels(&mut out);
        out
    }
}

impl Placeable for PanelGroup {
    fn height(&self) -> u32 {
        self.height
    }

    fn set_y(&mut self, y: u32) {
        let old_y = self.y;
        let shift = |pos: &mut Option<GridPos>| {
            if let Some(pos) = pos {
                pos.y = (pos.y - old_y).saturating_add(y);
            }
        };
        if let Some(row) = &mut self.row {
            shift(&mut row.grid_pos);
        }
        for panel in &mut self.panels {
            shift(&mut panel.grid_pos);
        }
        self.y = y;
    }

    /// A collapsed row carries its panels inside `row.panels`, the way
    /// Grafana stores them; otherwise the panels follow the row header.
    fn collect_panels(&mut self, out: &mut Vec<DashboardPanel>) {
        match &self.row {
            Some(row) if row.collapsed => {
                let mut row = row.clone();
                row.panels = self.panels.clone();
                out.push(row.into());
            }
            Some(row) => {
                out.push(row.clone().into());
                out.extend(self.panels.iter().cloned().map(DashboardPanel::from));
            }
            None => out.extend(self.panels.iter().cloned().map(DashboardPanel::from)),
        }
    }
}

/// Splits `total` grid units between panels in proportion to `weights`.
///
/// Every panel gets at least one unit. Units lost to rounding go to the
/// widest panels first, ties keeping their original order. If the one-unit
/// minimum overfills the row, units are taken back from the widest panels.
/// Callers must pass at most `total` weights.
pub fn width_units(weights: &[u32], total: u32) -> Vec<u32> {
    let sum: u32 = weights.iter().sum();
    if sum == 0 {
        return vec![1; weights.len()];
    }

    let mut widths: Vec<u32> = weights.iter().map(|w| (total * w / sum).max(1)).collect();
    let assigned: u32 = widths.iter().sum();

    if assigned < total {
        let mut order: Vec<usize> = (0..widths.len()).collect();
        order.sort_by(|&a, &b| widths[b].cmp(&widths[a]));
        let delta = (total - assigned) as usize;
        for &index in order.iter().cycle().take(delta) {
            widths[index] += 1;
        }
    } else {
        let mut excess = assigned - total;
        while excess > 0 {
            let widest = widths
                .iter()
                .enumerate()
                .filter(|(_, &w)| w > 1)
                .fold(None, |best: Option<(usize, u32)>, (i, &w)| match best {
                    Some((_, bw)) if bw >= w => best,
                    _ => Some((i, w)),
                });
            match widest {
                Some((index, _)) => {
                    widths[index] -= 1;
                    excess -= 1;
                }
                None => break,
            }
        }
    }

    widths
}
