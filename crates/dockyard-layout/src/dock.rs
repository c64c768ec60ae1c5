//! The four-area dock layout and its read operations.

use serde::{Deserialize, Serialize};

use crate::area::{DockArea, DockSlot};
use crate::invariants::{LayoutInvariantReport, check_areas};
use crate::snapshot::{LayoutValidationError, reject_errors};
use crate::tree::{LayoutModelError, LayoutNode, NodeId, Split, Tab, TabGroup, TabId};

/// Where a tab currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabLocation {
    pub slot: DockSlot,
    pub group_id: NodeId,
    /// Position in the group's display order.
    pub index: usize,
}

/// Exactly four dock areas, stored in [`DockSlot::ALL`] order, plus the
/// node id allocator shared by every tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DockLayout {
    areas: [DockArea; 4],
    next_id: NodeId,
}

impl DockLayout {
    /// Areas must already be in slot order.
    pub(crate) const fn from_parts(areas: [DockArea; 4], next_id: NodeId) -> Self {
        Self { areas, next_id }
    }

    /// Assemble a layout from one area per slot, in any order.
    ///
    /// Fails with the invariant report's errors when a slot is missing or
    /// repeated, or a tree is malformed. Warnings are accepted.
    pub fn from_areas(
        areas: Vec<DockArea>,
        next_id: NodeId,
    ) -> Result<Self, LayoutValidationError> {
        reject_errors(check_areas(&areas, next_id))?;
        let mut slots: [Option<DockArea>; 4] = [None, None, None, None];
        for area in areas {
            let entry = &mut slots[area.slot.index()];
            if entry.is_some() {
                return Err(LayoutValidationError::SlotCoverage);
            }
            *entry = Some(area);
        }
        let [Some(left), Some(center), Some(right), Some(bottom)] = slots else {
            return Err(LayoutValidationError::SlotCoverage);
        };
        Ok(Self {
            areas: [left, center, right, bottom],
            next_id,
        })
    }

    #[must_use]
    pub fn areas(&self) -> &[DockArea; 4] {
        &self.areas
    }

    #[must_use]
    pub fn area(&self, slot: DockSlot) -> &DockArea {
        &self.areas[slot.index()]
    }

    pub(crate) fn area_mut(&mut self, slot: DockSlot) -> &mut DockArea {
        &mut self.areas[slot.index()]
    }

    /// Next id the allocator will hand out.
    #[must_use]
    pub const fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Hand out a fresh node id.
    pub fn allocate_id(&mut self) -> Result<NodeId, LayoutModelError> {
        let id = self.next_id;
        self.next_id = id.checked_next()?;
        Ok(id)
    }

    fn roots(&self) -> impl Iterator<Item = (DockSlot, &LayoutNode)> {
        self.areas
            .iter()
            .filter_map(|area| area.root.as_ref().map(|root| (area.slot, root)))
    }

    /// Find a tab group in any area.
    #[must_use]
    pub fn find_group(&self, group_id: NodeId) -> Option<&TabGroup> {
        self.roots().find_map(|(_, root)| root.find_group(group_id))
    }

    /// Slot of the area whose tree contains `group_id`.
    #[must_use]
    pub fn group_slot(&self, group_id: NodeId) -> Option<DockSlot> {
        self.roots()
            .find(|(_, root)| root.find_group(group_id).is_some())
            .map(|(slot, _)| slot)
    }

    #[must_use]
    pub fn find_split(&self, split_id: NodeId) -> Option<&Split> {
        self.roots().find_map(|(_, root)| root.find_split(split_id))
    }

    /// Slot of the area whose tree contains `split_id`.
    #[must_use]
    pub fn split_slot(&self, split_id: NodeId) -> Option<DockSlot> {
        self.roots()
            .find(|(_, root)| root.find_split(split_id).is_some())
            .map(|(slot, _)| slot)
    }

    /// Scan all four areas for the group owning `tab_id`.
    #[must_use]
    pub fn locate_tab(&self, tab_id: &TabId) -> Option<TabLocation> {
        self.roots().find_map(|(slot, root)| {
            let group = root.group_containing(tab_id)?;
            Some(TabLocation {
                slot,
                group_id: group.id,
                index: group.position(tab_id)?,
            })
        })
    }

    #[must_use]
    pub fn tab(&self, tab_id: &TabId) -> Option<&Tab> {
        let location = self.locate_tab(tab_id)?;
        self.find_group(location.group_id)?.tabs.get(location.index)
    }

    /// Every docked tab, area by area in slot order.
    #[must_use]
    pub fn all_tabs(&self) -> Vec<&Tab> {
        self.roots()
            .flat_map(|(_, root)| crate::tree::flatten_tabs(root))
            .collect()
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.roots()
            .flat_map(|(_, root)| root.groups())
            .map(|group| group.tabs.len())
            .sum()
    }

    /// Ids of every tab group, area by area in display order.
    #[must_use]
    pub fn group_ids(&self) -> Vec<NodeId> {
        self.roots()
            .flat_map(|(_, root)| root.groups())
            .map(|group| group.id)
            .collect()
    }

    #[must_use]
    pub fn invariant_report(&self) -> LayoutInvariantReport {
        check_areas(&self.areas, self.next_id)
    }
}
