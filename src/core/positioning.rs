use crate::domain::model::DashboardPanel;
use crate::domain::ports::Placeable;

/// Stacks panel groups (or nested positionings) vertically, in insertion
/// order, starting at its own `y`.
#[derive(Debug, Default)]
pub struct PanelPositioning {
    blocks: Vec<Box<dyn Placeable>>,
    y: u32,
}

impl PanelPositioning {
    pub fn new(blocks: Vec<Box<dyn Placeable>>) -> Self {
        Self { blocks, y: 0 }
    }

    pub fn add_panel_group(&mut self, block: impl Placeable + 'static) {
        self.blocks.push(Box::new(block));
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Moves every block so that each one starts right below the previous one.
    pub fn layout(&mut self) {
        let mut current_y = self.y;
        for block in &mut self.blocks {
            block.set_y(current_y);
            current_y = current_y.saturating_add(block.height());
        }
        tracing::debug!(
            "📐 Laid out {} blocks from y={} to y={}",
            self.blocks.len(),
            self.y,
            current_y
        );
    }

    /// Lays the blocks out and returns all of their panels, row headers first
    /// within each group.
    pub fn panels(&mut self) -> Vec<DashboardPanel> {
        let mut out = Vec::new();
        self.collect_panels(&mut out);
        out
    }
}

impl Placeable for PanelPositioning {
    fn height(&self) -> u32 {
        self.blocks
            .iter()
            .fold(0u32, |total, block| total.saturating_add(block.height()))
    }

    // 只記錄起點，實際位移在 layout() 時才進行
    fn set_y(&mut self, y: u32) {
        self.y = y;
    }

    fn collect_panels(&mut self, out: &mut Vec<DashboardPanel>) {
        self.layout();
        for block in &mut self.blocks {
            block.collect_panels(out);
        }
    }
}
