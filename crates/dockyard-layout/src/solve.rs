//! Map a [`DockLayout`] onto pixel rectangles.
//!
//! Visible left and right areas take their size at full height. A visible
//! bottom area spans the space between them, under the center, and the
//! center takes what remains. Inside each area, splits divide their
//! rectangle by `ratio` after reserving a splitter strip.

use std::collections::BTreeMap;

use dockyard_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::area::DockSlot;
use crate::dock::DockLayout;
use crate::tree::{LayoutNode, NodeId, SplitDirection};

pub const DEFAULT_SPLITTER_THICKNESS: f64 = 4.0;
pub const DEFAULT_AREA_HANDLE_THICKNESS: f64 = 4.0;

/// Strip thicknesses reserved between solved rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Gap between the two children of a split.
    pub splitter: f64,
    /// Gap between an outer area and the center.
    pub area_handle: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            splitter: DEFAULT_SPLITTER_THICKNESS,
            area_handle: DEFAULT_AREA_HANDLE_THICKNESS,
        }
    }
}

/// Solved geometry of one split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRect {
    pub slot: DockSlot,
    pub direction: SplitDirection,
    /// Rectangle covering both children and the handle.
    pub container: Rect,
    /// Draggable strip between the children.
    pub handle: Rect,
}

impl SplitRect {
    /// Pixel extent the ratio applies to.
    #[must_use]
    pub fn extent(&self) -> f64 {
        match self.direction {
            SplitDirection::Horizontal => self.container.width,
            SplitDirection::Vertical => self.container.height,
        }
    }
}

/// Solved rectangles for every visible area, group, and split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DockRects {
    pub viewport: Rect,
    areas: BTreeMap<DockSlot, Rect>,
    area_handles: BTreeMap<DockSlot, Rect>,
    groups: BTreeMap<NodeId, (DockSlot, Rect)>,
    splits: BTreeMap<NodeId, SplitRect>,
}

impl DockRects {
    #[must_use]
    pub fn area(&self, slot: DockSlot) -> Option<Rect> {
        self.areas.get(&slot).copied()
    }

    /// Resize strip between `slot` and the center.
    #[must_use]
    pub fn area_handle(&self, slot: DockSlot) -> Option<Rect> {
        self.area_handles.get(&slot).copied()
    }

    #[must_use]
    pub fn group(&self, group_id: NodeId) -> Option<Rect> {
        self.groups.get(&group_id).map(|(_, rect)| *rect)
    }

    #[must_use]
    pub fn split(&self, split_id: NodeId) -> Option<&SplitRect> {
        self.splits.get(&split_id)
    }

    /// Group rectangles in id order.
    pub fn groups(&self) -> impl Iterator<Item = (NodeId, DockSlot, Rect)> + '_ {
        self.groups
            .iter()
            .map(|(group_id, (slot, rect))| (*group_id, *slot, *rect))
    }

    /// Group under `point`.
    #[must_use]
    pub fn group_at(&self, point: Point) -> Option<NodeId> {
        self.groups
            .iter()
            .find(|(_, (_, rect))| rect.contains(point))
            .map(|(group_id, _)| *group_id)
    }

    /// Split whose handle is under `point`.
    #[must_use]
    pub fn splitter_at(&self, point: Point) -> Option<NodeId> {
        self.splits
            .iter()
            .find(|(_, split)| split.handle.contains(point))
            .map(|(split_id, _)| *split_id)
    }

    /// Outer area whose resize handle is under `point`.
    #[must_use]
    pub fn area_handle_at(&self, point: Point) -> Option<DockSlot> {
        self.area_handles
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(slot, _)| *slot)
    }
}

impl DockLayout {
    /// Solve pixel rectangles for the visible parts of the layout.
    #[must_use]
    pub fn solve_layout(&self, viewport: Rect, metrics: LayoutMetrics) -> DockRects {
        let mut rects = DockRects {
            viewport,
            ..DockRects::default()
        };
        let gap = metrics.area_handle;
        let mut rest = viewport;

        let left = self.area(DockSlot::Left);
        if left.visible {
            let (area, handle, remainder) = rest.split_columns(left.size, gap);
            rects.areas.insert(DockSlot::Left, area);
            rects.area_handles.insert(DockSlot::Left, handle);
            rest = remainder;
        }

        let right = self.area(DockSlot::Right);
        if right.visible {
            let first = (rest.width - right.size - gap).max(0.0);
            let (remainder, handle, area) = rest.split_columns(first, gap);
            rects.areas.insert(DockSlot::Right, area);
            rects.area_handles.insert(DockSlot::Right, handle);
            rest = remainder;
        }

        let bottom = self.area(DockSlot::Bottom);
        if bottom.visible {
            let first = (rest.height - bottom.size - gap).max(0.0);
            let (remainder, handle, area) = rest.split_rows(first, gap);
            rects.areas.insert(DockSlot::Bottom, area);
            rects.area_handles.insert(DockSlot::Bottom, handle);
            rest = remainder;
        }

        rects.areas.insert(DockSlot::Center, rest);

        for area in self.areas() {
            let (Some(root), Some(rect)) = (area.root.as_ref(), rects.area(area.slot)) else {
                continue;
            };
            solve_node(root, area.slot, rect, metrics.splitter, &mut rects);
        }
        rects
    }
}

fn solve_node(node: &LayoutNode, slot: DockSlot, rect: Rect, splitter: f64, rects: &mut DockRects) {
    match node {
        LayoutNode::TabGroup(group) => {
            rects.groups.insert(group.id, (slot, rect));
        }
        LayoutNode::Split(split) => {
            let (first, handle, second) = match split.direction {
                SplitDirection::Horizontal => {
                    let share = (rect.width - splitter).max(0.0) * split.ratio;
                    rect.split_columns(share, splitter)
                }
                SplitDirection::Vertical => {
                    let share = (rect.height - splitter).max(0.0) * split.ratio;
                    rect.split_rows(share, splitter)
                }
            };
            rects.splits.insert(
                split.id,
                SplitRect {
                    slot,
                    direction: split.direction,
                    container: rect,
                    handle,
                },
            );
            solve_node(&split.first, slot, first, splitter, rects);
            solve_node(&split.second, slot, second, splitter, rects);
        }
    }
}
