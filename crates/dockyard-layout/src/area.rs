//! The four fixed dock areas and their size bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::DockAreaRecord;
use crate::tree::{LayoutNode, NodeId, TabGroup};

pub const MIN_LEFT_SIZE: f64 = 180.0;
pub const MAX_LEFT_SIZE: f64 = 500.0;
pub const MIN_RIGHT_SIZE: f64 = 220.0;
pub const MAX_RIGHT_SIZE: f64 = 520.0;
pub const MIN_BOTTOM_SIZE: f64 = 120.0;
pub const MAX_BOTTOM_SIZE: f64 = 500.0;

/// Screen slot of a dock area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockSlot {
    Left,
    Center,
    Right,
    Bottom,
}

impl DockSlot {
    /// Canonical slot order, also the storage order inside a layout.
    pub const ALL: [DockSlot; 4] = [Self::Left, Self::Center, Self::Right, Self::Bottom];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for DockSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive size range for a resizable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSizeBounds {
    pub min: f64,
    pub max: f64,
}

impl AreaSizeBounds {
    /// Bounds for `slot`; `None` for the center, whose size is derived.
    #[must_use]
    pub const fn for_slot(slot: DockSlot) -> Option<Self> {
        match slot {
            DockSlot::Left => Some(Self {
                min: MIN_LEFT_SIZE,
                max: MAX_LEFT_SIZE,
            }),
            DockSlot::Right => Some(Self {
                min: MIN_RIGHT_SIZE,
                max: MAX_RIGHT_SIZE,
            }),
            DockSlot::Bottom => Some(Self {
                min: MIN_BOTTOM_SIZE,
                max: MAX_BOTTOM_SIZE,
            }),
            DockSlot::Center => None,
        }
    }

    #[must_use]
    pub fn clamp(self, size: f64) -> f64 {
        size.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, size: f64) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

/// One dock area: a slot wrapper around an optional layout tree.
///
/// Serialized through [`DockAreaRecord`], which stores the tree flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DockAreaRecord", try_from = "DockAreaRecord")]
pub struct DockArea {
    pub slot: DockSlot,
    /// Pixels along the area's resize axis (meaningless for the center).
    pub size: f64,
    pub visible: bool,
    pub root: Option<LayoutNode>,
    /// Group that receives newly opened tabs.
    pub active_group: Option<NodeId>,
}

impl DockArea {
    /// An area with no content.
    #[must_use]
    pub const fn empty(slot: DockSlot, size: f64, visible: bool) -> Self {
        Self {
            slot,
            size,
            visible,
            root: None,
            active_group: None,
        }
    }

    /// Install `root`, pointing the active group at its first group.
    #[must_use]
    pub fn with_root(mut self, root: LayoutNode) -> Self {
        self.active_group = Some(root.first_group().id);
        self.root = Some(root);
        self
    }

    #[must_use]
    pub fn find_group(&self, group_id: NodeId) -> Option<&TabGroup> {
        self.root.as_ref()?.find_group(group_id)
    }

    pub fn find_group_mut(&mut self, group_id: NodeId) -> Option<&mut TabGroup> {
        self.root.as_mut()?.find_group_mut(group_id)
    }

    /// The group new tabs go to: the active group when it still exists,
    /// otherwise the tree's first group.
    #[must_use]
    pub fn target_group(&self) -> Option<NodeId> {
        let root = self.root.as_ref()?;
        match self.active_group {
            Some(active) if root.find_group(active).is_some() => Some(active),
            _ => Some(root.first_group().id),
        }
    }

    /// Re-point `active_group` after structural changes.
    pub fn repair_active_group(&mut self) {
        self.active_group = self.target_group();
    }
}

/// Find the area for `slot`.
#[must_use]
pub fn find_area(areas: &[DockArea], slot: DockSlot) -> Option<&DockArea> {
    areas.iter().find(|area| area.slot == slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Split, SplitDirection, Tab};

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).unwrap()
    }

    fn two_group_root() -> LayoutNode {
        LayoutNode::Split(Split::new(
            id(3),
            SplitDirection::Vertical,
            0.5,
            LayoutNode::TabGroup(TabGroup::with_tab(id(1), Tab::new("a", "A", "editor"))),
            LayoutNode::TabGroup(TabGroup::with_tab(id(2), Tab::new("b", "B", "editor"))),
        ))
    }

    #[test]
    fn bounds_clamp_per_slot() {
        let left = AreaSizeBounds::for_slot(DockSlot::Left).unwrap();
        assert_eq!(left.clamp(1_000.0), MAX_LEFT_SIZE);
        assert_eq!(left.clamp(0.0), MIN_LEFT_SIZE);
        let right = AreaSizeBounds::for_slot(DockSlot::Right).unwrap();
        assert_eq!(right.clamp(100.0), MIN_RIGHT_SIZE);
        let bottom = AreaSizeBounds::for_slot(DockSlot::Bottom).unwrap();
        assert_eq!(bottom.clamp(501.0), MAX_BOTTOM_SIZE);
        assert!(AreaSizeBounds::for_slot(DockSlot::Center).is_none());
    }

    #[test]
    fn slot_order_matches_index() {
        for (index, slot) in DockSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), index);
        }
        assert_eq!(DockSlot::Bottom.to_string(), "bottom");
    }

    #[test]
    fn target_group_falls_back_to_first() {
        let mut area = DockArea::empty(DockSlot::Center, 0.0, true).with_root(two_group_root());
        assert_eq!(area.target_group(), Some(id(1)));
        area.active_group = Some(id(2));
        assert_eq!(area.target_group(), Some(id(2)));
        area.active_group = Some(id(99));
        assert_eq!(area.target_group(), Some(id(1)));
        area.repair_active_group();
        assert_eq!(area.active_group, Some(id(1)));
    }

    #[test]
    fn empty_area_has_no_target() {
        let mut area = DockArea::empty(DockSlot::Left, 260.0, true);
        area.active_group = Some(id(1));
        area.repair_active_group();
        assert_eq!(area.active_group, None);
    }

    #[test]
    fn find_area_by_slot() {
        let areas = [
            DockArea::empty(DockSlot::Left, 260.0, true),
            DockArea::empty(DockSlot::Bottom, 200.0, false),
        ];
        assert_eq!(
            find_area(&areas, DockSlot::Bottom).map(|a| a.visible),
            Some(false)
        );
        assert!(find_area(&areas, DockSlot::Right).is_none());
    }
}
