//! Grid presentation geometry.
//!
//! The engine only needs hit regions. `RegionGrid` computes them for the
//! usual presentation: a control bar with speaker and backspace above a
//! grid of keys laid out row-major. Hosts with their own layout supply
//! their own regions instead.
//!
//! ```text
//!   ┌──────────────────────────────┬─────────┬───────────┐
//!   │ sentence                     │ speaker │ backspace │
//!   ├────┬────┬────┬────┬────┬─────┴─────────┴───────────┤
//!   │ k0 │ k1 │ k2 │ k3 │ k4 │ k5 │
//!   ├────┼────┼────┼────┼────┼────┤
//!   │ k6 │ .. │    │    │    │    │
//! ```

use anyhow::bail;
use dwell_input::{HitRegion, Rect, TargetId, Vec2};
use dwell_layout::Layout;
use serde::{Deserialize, Serialize};

/// Sizes and positions of the keyboard grid, in viewport pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_origin")]
    pub origin: Vec2,
    #[serde(default = "default_key_width")]
    pub key_width: f32,
    #[serde(default = "default_key_height")]
    pub key_height: f32,
    #[serde(default = "default_gap")]
    pub gap: f32,
    /// Side of the square speaker and backspace buttons.
    #[serde(default = "default_control_size")]
    pub control_size: f32,
}

fn default_columns() -> usize {
    6
}

fn default_origin() -> Vec2 {
    Vec2::new(20.0, 130.0)
}

fn default_key_width() -> f32 {
    150.0
}

fn default_key_height() -> f32 {
    120.0
}

fn default_gap() -> f32 {
    10.0
}

fn default_control_size() -> f32 {
    100.0
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            origin: default_origin(),
            key_width: default_key_width(),
            key_height: default_key_height(),
            gap: default_gap(),
            control_size: default_control_size(),
        }
    }
}

impl GridGeometry {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.columns == 0 {
            bail!("grid.columns must be positive");
        }
        let sizes = [self.key_width, self.key_height, self.control_size];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            bail!("grid key and control sizes must be positive");
        }
        if !self.gap.is_finite() || self.gap < 0.0 || !self.origin.is_finite() {
            bail!("grid gap and origin must be finite and non-negative");
        }
        Ok(())
    }

    /// Total width of the key grid.
    pub fn width(&self) -> f32 {
        self.columns as f32 * (self.key_width + self.gap) - self.gap
    }
}

/// Computes hit regions for a layout.
#[derive(Debug, Clone, Default)]
pub struct RegionGrid {
    geometry: GridGeometry,
}

impl RegionGrid {
    pub fn new(geometry: GridGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn bar_y(&self) -> f32 {
        self.geometry.origin.y - self.geometry.gap - self.geometry.control_size
    }

    pub fn backspace_rect(&self) -> Rect {
        let g = &self.geometry;
        Rect::new(g.origin.x + g.width() - g.control_size, self.bar_y(), g.control_size, g.control_size)
    }

    pub fn speaker_rect(&self) -> Rect {
        let g = &self.geometry;
        let x = g.origin.x + g.width() - 2.0 * g.control_size - g.gap;
        Rect::new(x, self.bar_y(), g.control_size, g.control_size)
    }

    /// Rect of the key at `index` in rendering order.
    pub fn key_rect(&self, index: usize) -> Rect {
        let g = &self.geometry;
        let col = (index % g.columns) as f32;
        let row = (index / g.columns) as f32;
        Rect::new(
            g.origin.x + col * (g.key_width + g.gap),
            g.origin.y + row * (g.key_height + g.gap),
            g.key_width,
            g.key_height,
        )
    }

    /// Regions for `layout`: backspace, speaker, then keys in order.
    pub fn regions(&self, layout: &Layout) -> Vec<HitRegion> {
        let mut regions = Vec::with_capacity(layout.len() + 2);
        regions.push(HitRegion::backspace(self.backspace_rect()));
        regions.push(HitRegion::speaker(self.speaker_rect()));
        regions.extend(
            layout
                .keys
                .iter()
                .enumerate()
                .map(|(i, key)| HitRegion::key(key.id.clone(), self.key_rect(i))),
        );
        regions
    }

    /// Centre of `target` as rendered for `layout`.
    pub fn center_of(&self, target: &TargetId, layout: &Layout) -> Option<Vec2> {
        match target {
            TargetId::Backspace => Some(self.backspace_rect().center()),
            TargetId::Speaker => Some(self.speaker_rect().center()),
            TargetId::Key(id) => layout
                .keys
                .iter()
                .position(|k| &k.id == id)
                .map(|i| self.key_rect(i).center()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwell_input::{hit_test, PointerSample};
    use dwell_layout::LayoutCatalog;

    #[test]
    fn centers_hit_their_own_region() {
        let catalog = LayoutCatalog::builtin();
        let grid = RegionGrid::default();
        for id in catalog.layout_ids() {
            let layout = catalog.layout_by_id(id).unwrap();
            let regions = grid.regions(layout);
            assert_eq!(regions.len(), 26);
            for region in &regions {
                let center = grid.center_of(&region.id, layout).unwrap();
                assert_eq!(hit_test(&PointerSample::at(center), &regions), Some(region.id.clone()));
            }
        }
    }

    #[test]
    fn gaps_hit_nothing() {
        let grid = RegionGrid::default();
        let layout = LayoutCatalog::builtin().default_layout().clone();
        let regions = grid.regions(&layout);
        let r0 = grid.key_rect(0);
        let gap = Vec2::new(r0.right() + 5.0, r0.center().y);
        assert_eq!(hit_test(&PointerSample::at(gap), &regions), None);
        assert_eq!(grid.center_of(&TargetId::key("nope"), &layout), None);
    }

    #[test]
    fn controls_sit_above_the_grid() {
        let grid = RegionGrid::default();
        assert!(grid.backspace_rect().bottom() < grid.key_rect(0).top());
        assert!(grid.speaker_rect().right() < grid.backspace_rect().left());
        assert!(GridGeometry { columns: 0, ..GridGeometry::default() }.validate().is_err());
    }
}
