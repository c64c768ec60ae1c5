//! Area and split resize controllers.
//!
//! A resize session captures the starting value (area size or split ratio)
//! and, for splits, the container extent once at pointer-down. Each move then
//! derives the new value from the start plus the total pointer delta, so
//! clamping at a bound never accumulates drift.

use dockyard_core::Point;
use dockyard_layout::{
    AreaSizeBounds, DockLayout, DockRects, DockSlot, LayoutCommand, NodeId, SplitDirection,
    clamp_ratio,
};
use serde::{Deserialize, Serialize};

use crate::interaction::{CursorStyle, InteractionOwner};

/// What a resize session adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ResizeTarget {
    Area { slot: DockSlot },
    Split { split_id: NodeId },
}

/// Drag on the strip between an outer area and the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaResizer {
    slot: DockSlot,
    origin: Point,
    start_size: f64,
    bounds: AreaSizeBounds,
}

impl AreaResizer {
    /// Start resizing `slot`. `None` for the center and for hidden areas.
    #[must_use]
    pub fn begin(layout: &DockLayout, slot: DockSlot, origin: Point) -> Option<Self> {
        let bounds = AreaSizeBounds::for_slot(slot)?;
        let area = layout.area(slot);
        if !area.visible {
            return None;
        }
        Some(Self {
            slot,
            origin,
            start_size: area.size,
            bounds,
        })
    }

    #[must_use]
    pub const fn slot(&self) -> DockSlot {
        self.slot
    }

    #[must_use]
    pub const fn start_size(&self) -> f64 {
        self.start_size
    }

    /// Clamped size for the pointer at `pointer`.
    ///
    /// Left grows rightward; right and bottom grow toward the center, i.e.
    /// leftward and upward.
    #[must_use]
    pub fn size_at(&self, pointer: Point) -> f64 {
        let (dx, dy) = pointer.delta_from(self.origin);
        let delta = match self.slot {
            DockSlot::Left => dx,
            DockSlot::Right => -dx,
            DockSlot::Bottom => -dy,
            DockSlot::Center => 0.0,
        };
        self.bounds.clamp(self.start_size + delta)
    }

    #[must_use]
    pub fn command_at(&self, pointer: Point) -> LayoutCommand {
        LayoutCommand::SetAreaSize {
            slot: self.slot,
            size: self.size_at(pointer),
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        match self.slot {
            DockSlot::Bottom => CursorStyle::RowResize,
            _ => CursorStyle::ColResize,
        }
    }
}

/// Drag on the handle between the two children of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResizer {
    split_id: NodeId,
    direction: SplitDirection,
    origin: Point,
    start_ratio: f64,
    extent: f64,
}

impl SplitResizer {
    /// Start resizing `split_id`, measuring its container in `rects`.
    ///
    /// `None` when the split does not exist, is not on screen, or has no
    /// extent to divide.
    #[must_use]
    pub fn begin(
        layout: &DockLayout,
        rects: &DockRects,
        split_id: NodeId,
        origin: Point,
    ) -> Option<Self> {
        let split = layout.find_split(split_id)?;
        let solved = rects.split(split_id)?;
        let extent = solved.extent();
        if !(extent.is_finite() && extent > 0.0) {
            return None;
        }
        Some(Self {
            split_id,
            direction: split.direction,
            origin,
            start_ratio: split.ratio,
            extent,
        })
    }

    #[must_use]
    pub const fn split_id(&self) -> NodeId {
        self.split_id
    }

    #[must_use]
    pub const fn extent(&self) -> f64 {
        self.extent
    }

    #[must_use]
    pub fn ratio_at(&self, pointer: Point) -> f64 {
        let (dx, dy) = pointer.delta_from(self.origin);
        let delta = match self.direction {
            SplitDirection::Horizontal => dx,
            SplitDirection::Vertical => dy,
        };
        clamp_ratio(self.start_ratio + delta / self.extent)
    }

    #[must_use]
    pub fn command_at(&self, pointer: Point) -> LayoutCommand {
        LayoutCommand::SetSplitRatio {
            split_id: self.split_id,
            ratio: self.ratio_at(pointer),
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        match self.direction {
            SplitDirection::Horizontal => CursorStyle::ColResize,
            SplitDirection::Vertical => CursorStyle::RowResize,
        }
    }
}

/// A live resize of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeSession {
    Area(AreaResizer),
    Split(SplitResizer),
}

impl ResizeSession {
    #[must_use]
    pub const fn target(&self) -> ResizeTarget {
        match self {
            Self::Area(resizer) => ResizeTarget::Area {
                slot: resizer.slot,
            },
            Self::Split(resizer) => ResizeTarget::Split {
                split_id: resizer.split_id,
            },
        }
    }

    /// Key under which the session's listeners and cursor are registered.
    #[must_use]
    pub const fn owner(&self) -> InteractionOwner {
        match self {
            Self::Area(resizer) => InteractionOwner::AreaResize {
                slot: resizer.slot,
            },
            Self::Split(resizer) => InteractionOwner::SplitResize {
                split_id: resizer.split_id,
            },
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        match self {
            Self::Area(resizer) => resizer.cursor(),
            Self::Split(resizer) => resizer.cursor(),
        }
    }

    #[must_use]
    pub fn command_at(&self, pointer: Point) -> LayoutCommand {
        match self {
            Self::Area(resizer) => resizer.command_at(pointer),
            Self::Split(resizer) => resizer.command_at(pointer),
        }
    }
}
