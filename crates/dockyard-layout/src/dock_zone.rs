//! Drop-zone geometry for tab drag-and-drop.
//!
//! One pure function, [`resolve_drop_position`], decides which of the five
//! zones of a target group the pointer is over. The hover preview and the
//! drop commit both call it, so what is highlighted is what happens.

use dockyard_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::tree::SplitDirection;

/// Default side of the square-ish center zone, as a fraction of the target.
pub const DEFAULT_CENTER_ZONE_FRACTION: f64 = 0.4;

/// Default thickness of each edge band, as a fraction of the target.
pub const DEFAULT_EDGE_ZONE_FRACTION: f64 = 0.28;

/// Where a dragged tab lands relative to a target group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl DropPosition {
    /// Hit-test priority when zones overlap; earlier entries are drawn on top.
    pub const Z_ORDER: [DropPosition; 5] = [
        Self::Center,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    /// Directional zones, in hit-test order.
    pub const DIRECTIONAL: [DropPosition; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Split orientation a drop in this zone creates; `None` for a merge.
    #[must_use]
    pub const fn split_direction(self) -> Option<SplitDirection> {
        match self {
            Self::Center => None,
            Self::Left | Self::Right => Some(SplitDirection::Horizontal),
            Self::Top | Self::Bottom => Some(SplitDirection::Vertical),
        }
    }

    /// Whether the new group becomes the split's `first` child.
    #[must_use]
    pub const fn incoming_first(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }
}

/// Zone proportions, tunable through the workspace configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropZoneGeometry {
    pub center_fraction: f64,
    pub edge_fraction: f64,
}

impl Default for DropZoneGeometry {
    fn default() -> Self {
        Self {
            center_fraction: DEFAULT_CENTER_ZONE_FRACTION,
            edge_fraction: DEFAULT_EDGE_ZONE_FRACTION,
        }
    }
}

impl DropZoneGeometry {
    /// Check the fractions describe drawable zones.
    pub fn validate(self) -> Result<(), String> {
        if !(self.center_fraction > 0.0 && self.center_fraction <= 1.0) {
            return Err(format!(
                "drop_zones.center_fraction must be in (0, 1], got {}",
                self.center_fraction
            ));
        }
        if !(self.edge_fraction > 0.0 && self.edge_fraction <= 0.5) {
            return Err(format!(
                "drop_zones.edge_fraction must be in (0, 0.5], got {}",
                self.edge_fraction
            ));
        }
        Ok(())
    }

    fn zone_contains(self, zone: DropPosition, fx: f64, fy: f64) -> bool {
        let half = self.center_fraction / 2.0;
        let edge = self.edge_fraction;
        match zone {
            DropPosition::Center => (fx - 0.5).abs() <= half && (fy - 0.5).abs() <= half,
            DropPosition::Top => fy < edge,
            DropPosition::Bottom => fy >= 1.0 - edge,
            DropPosition::Left => fx < edge,
            DropPosition::Right => fx >= 1.0 - edge,
        }
    }
}

/// Resolve which zone of `target` contains `pointer`.
///
/// Returns `None` outside the target or in the gaps between zones.
#[must_use]
pub fn resolve_drop_position(
    target: Rect,
    pointer: Point,
    geometry: DropZoneGeometry,
) -> Option<DropPosition> {
    resolve_among(target, pointer, geometry, &DropPosition::Z_ORDER)
}

/// Like [`resolve_drop_position`], restricted to the `offered` zones.
#[must_use]
pub fn resolve_among(
    target: Rect,
    pointer: Point,
    geometry: DropZoneGeometry,
    offered: &[DropPosition],
) -> Option<DropPosition> {
    if !target.contains(pointer) {
        return None;
    }
    let (fx, fy) = target.relative(pointer)?;
    DropPosition::Z_ORDER
        .into_iter()
        .filter(|zone| offered.contains(zone))
        .find(|zone| geometry.zone_contains(*zone, fx, fy))
}

/// Ghost rectangle previewing where the dropped tab will appear.
#[must_use]
pub fn drop_preview_rect(target: Rect, position: DropPosition) -> Rect {
    let half_w = target.width / 2.0;
    let half_h = target.height / 2.0;
    match position {
        DropPosition::Center => target,
        DropPosition::Left => Rect::new(target.x, target.y, half_w, target.height),
        DropPosition::Right => Rect::new(target.x + half_w, target.y, half_w, target.height),
        DropPosition::Top => Rect::new(target.x, target.y, target.width, half_h),
        DropPosition::Bottom => Rect::new(target.x, target.y + half_h, target.width, half_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Rect = Rect::new(100.0, 100.0, 200.0, 100.0);

    fn at(fx: f64, fy: f64) -> Point {
        Point::new(
            TARGET.x + TARGET.width * fx,
            TARGET.y + TARGET.height * fy,
        )
    }

    fn resolve(fx: f64, fy: f64) -> Option<DropPosition> {
        resolve_drop_position(TARGET, at(fx, fy), DropZoneGeometry::default())
    }

    #[test]
    fn center_wins_inside_inner_rect() {
        assert_eq!(resolve(0.5, 0.5), Some(DropPosition::Center));
        assert_eq!(resolve(0.31, 0.69), Some(DropPosition::Center));
    }

    #[test]
    fn edge_bands_resolve_directionally() {
        assert_eq!(resolve(0.5, 0.1), Some(DropPosition::Top));
        assert_eq!(resolve(0.5, 0.9), Some(DropPosition::Bottom));
        assert_eq!(resolve(0.1, 0.5), Some(DropPosition::Left));
        assert_eq!(resolve(0.9, 0.5), Some(DropPosition::Right));
    }

    #[test]
    fn corners_break_ties_by_z_order() {
        assert_eq!(resolve(0.05, 0.05), Some(DropPosition::Top));
        assert_eq!(resolve(0.95, 0.95), Some(DropPosition::Bottom));
    }

    #[test]
    fn gap_between_band_and_center_is_no_zone() {
        assert_eq!(resolve(0.29, 0.5), None);
    }

    #[test]
    fn outside_target_is_no_zone() {
        assert_eq!(
            resolve_drop_position(TARGET, Point::new(0.0, 0.0), DropZoneGeometry::default()),
            None
        );
    }

    #[test]
    fn restricted_offer_skips_center() {
        let offered = DropPosition::DIRECTIONAL;
        assert_eq!(
            resolve_among(TARGET, at(0.5, 0.5), DropZoneGeometry::default(), &offered),
            None
        );
        assert_eq!(
            resolve_among(TARGET, at(0.5, 0.05), DropZoneGeometry::default(), &offered),
            Some(DropPosition::Top)
        );
    }

    #[test]
    fn zone_semantics() {
        assert_eq!(DropPosition::Center.split_direction(), None);
        assert_eq!(
            DropPosition::Left.split_direction(),
            Some(SplitDirection::Horizontal)
        );
        assert_eq!(
            DropPosition::Bottom.split_direction(),
            Some(SplitDirection::Vertical)
        );
        assert!(DropPosition::Top.incoming_first());
        assert!(!DropPosition::Right.incoming_first());
    }

    #[test]
    fn preview_rects_halve_target() {
        assert_eq!(
            drop_preview_rect(TARGET, DropPosition::Right),
            Rect::new(200.0, 100.0, 100.0, 100.0)
        );
        assert_eq!(
            drop_preview_rect(TARGET, DropPosition::Bottom),
            Rect::new(100.0, 150.0, 200.0, 50.0)
        );
        assert_eq!(drop_preview_rect(TARGET, DropPosition::Center), TARGET);
    }

    #[test]
    fn geometry_validation() {
        assert!(DropZoneGeometry::default().validate().is_ok());
        let bad = DropZoneGeometry {
            center_fraction: 0.0,
            edge_fraction: 0.28,
        };
        assert!(bad.validate().is_err());
        let bad_edge = DropZoneGeometry {
            center_fraction: 0.4,
            edge_fraction: 0.7,
        };
        assert!(bad_edge.validate().is_err());
    }
}
