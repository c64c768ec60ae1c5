//! Structural invariant report over a set of dock areas.
//!
//! The same checks back three callers: the reducer re-validates its working
//! copy before committing, snapshot validation rejects corrupt layout files,
//! and the fuzz suite asserts every reachable state is clean.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::area::{DockArea, DockSlot};
use crate::tree::{LayoutNode, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, NodeId, TabId};

/// Severity for one invariant finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantCode {
    EmptyNonRootGroup,
    EmptyRootGroup,
    RatioOutOfRange,
    DuplicateNodeId,
    DuplicateTabId,
    ActiveTabMissing,
    ActiveGroupMissing,
    NodeIdNotBelowNextId,
    DuplicateSlot,
    MissingSlot,
}

impl LayoutInvariantCode {
    /// Severity this code is always reported with.
    #[must_use]
    pub const fn severity(self) -> LayoutInvariantSeverity {
        match self {
            Self::EmptyRootGroup | Self::ActiveGroupMissing => LayoutInvariantSeverity::Warning,
            _ => LayoutInvariantSeverity::Error,
        }
    }
}

/// One actionable invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantIssue {
    pub code: LayoutInvariantCode,
    pub severity: LayoutInvariantSeverity,
    pub slot: Option<DockSlot>,
    pub node_id: Option<NodeId>,
    pub message: String,
}

/// Structured invariant report over a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub issues: Vec<LayoutInvariantIssue>,
}

impl LayoutInvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == LayoutInvariantSeverity::Error)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Sorted, de-duplicated codes of the error-level findings.
    #[must_use]
    pub fn error_codes(&self) -> Vec<LayoutInvariantCode> {
        let mut codes: Vec<_> = self
            .issues
            .iter()
            .filter(|issue| issue.severity == LayoutInvariantSeverity::Error)
            .map(|issue| issue.code)
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    #[must_use]
    pub fn contains(&self, code: LayoutInvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    fn push(
        &mut self,
        code: LayoutInvariantCode,
        slot: Option<DockSlot>,
        node_id: Option<NodeId>,
        message: String,
    ) {
        self.issues.push(LayoutInvariantIssue {
            code,
            severity: code.severity(),
            slot,
            node_id,
            message,
        });
    }
}

/// Check `areas` against every structural invariant.
#[must_use]
pub fn check_areas(areas: &[DockArea], next_id: NodeId) -> LayoutInvariantReport {
    let mut report = LayoutInvariantReport::default();

    for slot in DockSlot::ALL {
        match areas.iter().filter(|area| area.slot == slot).count() {
            0 => report.push(
                LayoutInvariantCode::MissingSlot,
                Some(slot),
                None,
                format!("no area for slot {slot}"),
            ),
            1 => {}
            count => report.push(
                LayoutInvariantCode::DuplicateSlot,
                Some(slot),
                None,
                format!("slot {slot} appears {count} times"),
            ),
        }
    }

    let mut node_ids = FxHashSet::default();
    let mut tab_ids: FxHashSet<&TabId> = FxHashSet::default();
    for area in areas {
        let Some(root) = area.root.as_ref() else {
            if let Some(active) = area.active_group {
                report.push(
                    LayoutInvariantCode::ActiveGroupMissing,
                    Some(area.slot),
                    Some(active),
                    format!("area {} has no content but active group {active}", area.slot),
                );
            }
            continue;
        };
        check_node(
            root,
            area.slot,
            true,
            next_id,
            &mut node_ids,
            &mut tab_ids,
            &mut report,
        );
        if let Some(active) = area.active_group
            && root.find_group(active).is_none()
        {
            report.push(
                LayoutInvariantCode::ActiveGroupMissing,
                Some(area.slot),
                Some(active),
                format!("active group {active} is not in area {}", area.slot),
            );
        }
    }

    report
}

fn check_node<'a>(
    node: &'a LayoutNode,
    slot: DockSlot,
    is_root: bool,
    next_id: NodeId,
    node_ids: &mut FxHashSet<NodeId>,
    tab_ids: &mut FxHashSet<&'a TabId>,
    report: &mut LayoutInvariantReport,
) {
    let id = node.id();
    if !node_ids.insert(id) {
        report.push(
            LayoutInvariantCode::DuplicateNodeId,
            Some(slot),
            Some(id),
            format!("node id {id} is used more than once"),
        );
    }
    if id >= next_id {
        report.push(
            LayoutInvariantCode::NodeIdNotBelowNextId,
            Some(slot),
            Some(id),
            format!("node id {id} is not below next_id {next_id}"),
        );
    }

    match node {
        LayoutNode::TabGroup(group) => {
            if group.is_empty() {
                if is_root {
                    report.push(
                        LayoutInvariantCode::EmptyRootGroup,
                        Some(slot),
                        Some(id),
                        format!("area {slot} root group {id} has no tabs"),
                    );
                } else {
                    report.push(
                        LayoutInvariantCode::EmptyNonRootGroup,
                        Some(slot),
                        Some(id),
                        format!("group {id} has no tabs but is a split child"),
                    );
                }
            }
            for tab in &group.tabs {
                if !tab_ids.insert(&tab.id) {
                    report.push(
                        LayoutInvariantCode::DuplicateTabId,
                        Some(slot),
                        Some(id),
                        format!("tab {} is docked more than once", tab.id),
                    );
                }
            }
            if let Some(active) = &group.active_tab_id
                && !group.contains(active)
            {
                report.push(
                    LayoutInvariantCode::ActiveTabMissing,
                    Some(slot),
                    Some(id),
                    format!("active tab {active} is not in group {id}"),
                );
            }
        }
        LayoutNode::Split(split) => {
            if !(MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&split.ratio) {
                report.push(
                    LayoutInvariantCode::RatioOutOfRange,
                    Some(slot),
                    Some(id),
                    format!("split {id} ratio {} is outside [0.1, 0.9]", split.ratio),
                );
            }
            check_node(&split.first, slot, false, next_id, node_ids, tab_ids, report);
            check_node(&split.second, slot, false, next_id, node_ids, tab_ids, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Split, SplitDirection, Tab, TabGroup};

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).unwrap()
    }

    fn leaf(raw: u64, tabs: &[&str]) -> LayoutNode {
        let mut group = TabGroup::new(id(raw));
        for name in tabs {
            group.push_and_activate(Tab::new(*name, *name, "editor"));
        }
        LayoutNode::TabGroup(group)
    }

    fn areas_with_center(root: Option<LayoutNode>) -> Vec<DockArea> {
        DockSlot::ALL
            .into_iter()
            .map(|slot| {
                let area = DockArea::empty(slot, 240.0, true);
                match (slot, root.clone()) {
                    (DockSlot::Center, Some(root)) => area.with_root(root),
                    _ => area,
                }
            })
            .collect()
    }

    #[test]
    fn clean_layout_has_no_issues() {
        let root = LayoutNode::Split(Split::new(
            id(3),
            SplitDirection::Horizontal,
            0.5,
            leaf(1, &["a"]),
            leaf(2, &["b"]),
        ));
        let report = check_areas(&areas_with_center(Some(root)), id(4));
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn empty_split_child_is_error_but_empty_root_is_warning() {
        let root = LayoutNode::Split(Split::new(
            id(3),
            SplitDirection::Horizontal,
            0.5,
            leaf(1, &[]),
            leaf(2, &["b"]),
        ));
        let report = check_areas(&areas_with_center(Some(root)), id(4));
        assert_eq!(report.error_codes(), [LayoutInvariantCode::EmptyNonRootGroup]);

        let report = check_areas(&areas_with_center(Some(leaf(1, &[]))), id(2));
        assert!(!report.has_errors());
        assert!(report.contains(LayoutInvariantCode::EmptyRootGroup));
    }

    #[test]
    fn ratio_and_id_violations_are_reported() {
        let mut split = Split::new(
            id(3),
            SplitDirection::Vertical,
            0.5,
            leaf(1, &["a"]),
            leaf(1, &["a"]),
        );
        split.ratio = 0.95;
        let report = check_areas(&areas_with_center(Some(LayoutNode::Split(split))), id(3));
        assert_eq!(
            report.error_codes(),
            [
                LayoutInvariantCode::RatioOutOfRange,
                LayoutInvariantCode::DuplicateNodeId,
                LayoutInvariantCode::DuplicateTabId,
                LayoutInvariantCode::NodeIdNotBelowNextId,
            ]
        );
    }

    #[test]
    fn dangling_selection_is_reported() {
        let LayoutNode::TabGroup(mut group) = leaf(1, &["a"]) else {
            unreachable!()
        };
        group.active_tab_id = Some(TabId::from("gone"));
        let mut areas = areas_with_center(Some(LayoutNode::TabGroup(group)));
        areas[0].active_group = Some(id(9));
        let report = check_areas(&areas, id(10));
        assert_eq!(report.error_codes(), [LayoutInvariantCode::ActiveTabMissing]);
        assert!(report.contains(LayoutInvariantCode::ActiveGroupMissing));
    }

    #[test]
    fn slot_coverage_is_checked() {
        let mut areas = areas_with_center(None);
        areas[3].slot = DockSlot::Left;
        let report = check_areas(&areas, id(1));
        assert_eq!(
            report.error_codes(),
            [
                LayoutInvariantCode::DuplicateSlot,
                LayoutInvariantCode::MissingSlot
            ]
        );
    }
}
