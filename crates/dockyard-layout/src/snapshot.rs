//! Persisted layout schema v1 with versioning and migration scaffolding.
//!
//! A [`WorkspaceLayout`] is the serializable snapshot of a [`DockLayout`]:
//! the four dock areas, their trees, and the id allocator position. Ids
//! survive the round trip unchanged so external code that remembers a group
//! id still finds it after a reload.
//!
//! On disk each area is a [`DockAreaRecord`]: a flat list of node records in
//! id order, where splits name their children by id. Document nesting stays
//! constant however deep the tree grows.
//!
//! # Schema Versioning Policy
//!
//! - Any change to the shape of [`DockAreaRecord`] or [`LayoutNodeRecord`]
//!   increments [`WORKSPACE_LAYOUT_VERSION`] and adds a migration path.
//! - Loaders reject unknown versions; the caller falls back to the default
//!   layout.
//!
//! # Usage
//!
//! ```
//! use dockyard_layout::defaults::default_layout;
//! use dockyard_layout::dock::DockLayout;
//!
//! let layout = default_layout();
//! let snapshot = layout.to_snapshot();
//! let json = serde_json::to_string_pretty(&snapshot).unwrap();
//! let restored = DockLayout::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();
//! assert_eq!(restored, layout);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::area::{AreaSizeBounds, DockArea, DockSlot};
use crate::dock::DockLayout;
use crate::invariants::{
    LayoutInvariantIssue, LayoutInvariantReport, LayoutInvariantSeverity, check_areas,
};
use crate::tree::{
    LayoutModelError, LayoutNode, NodeId, Split, SplitDirection, Tab, TabGroup, TabId,
};

/// Current layout schema version.
pub const WORKSPACE_LAYOUT_VERSION: u16 = 1;

/// Serialized workspace layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    /// Schema version for migration detection.
    pub version: u16,
    /// Allocator position; recomputed from the highest id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<NodeId>,
    pub areas: Vec<DockArea>,
}

impl WorkspaceLayout {
    /// `next_id` as stored, or one past the highest id in any tree.
    pub fn effective_next_id(&self) -> Result<NodeId, LayoutModelError> {
        if let Some(next_id) = self.next_id {
            return Ok(next_id);
        }
        let mut highest: Option<NodeId> = None;
        for root in self.areas.iter().filter_map(|area| area.root.as_ref()) {
            root.walk(&mut |node: &LayoutNode| {
                highest = highest.max(Some(node.id()));
            });
        }
        match highest {
            Some(id) => id.checked_next(),
            None => Ok(NodeId::MIN),
        }
    }

    /// Validate the snapshot against schema and structural invariants.
    ///
    /// Warnings (an empty root group, a stale active group) are accepted;
    /// [`DockLayout::from_snapshot`] repairs them.
    pub fn validate(&self) -> Result<(), LayoutValidationError> {
        if self.version != WORKSPACE_LAYOUT_VERSION {
            return Err(LayoutValidationError::UnsupportedVersion {
                found: self.version,
                expected: WORKSPACE_LAYOUT_VERSION,
            });
        }

        let next_id = self
            .effective_next_id()
            .map_err(LayoutValidationError::LayoutModel)?;
        reject_errors(check_areas(&self.areas, next_id))?;

        for area in &self.areas {
            if !area.size.is_finite() || area.size < 0.0 {
                return Err(LayoutValidationError::InvalidAreaSize {
                    slot: area.slot.as_str(),
                    size: area.size,
                });
            }
        }

        Ok(())
    }
}

impl DockLayout {
    /// Snapshot of the four areas, version-tagged.
    #[must_use]
    pub fn to_snapshot(&self) -> WorkspaceLayout {
        WorkspaceLayout {
            version: WORKSPACE_LAYOUT_VERSION,
            next_id: Some(self.next_id()),
            areas: self.areas().to_vec(),
        }
    }

    /// Rebuild a layout from a validated snapshot.
    ///
    /// Area sizes are clamped into their slot bounds, the center is forced
    /// visible, and each area's active group is re-pointed at an existing group.
    pub fn from_snapshot(snapshot: WorkspaceLayout) -> Result<Self, LayoutValidationError> {
        snapshot.validate()?;
        let next_id = snapshot
            .effective_next_id()
            .map_err(LayoutValidationError::LayoutModel)?;
        let areas = snapshot
            .areas
            .into_iter()
            .map(|mut area| {
                match AreaSizeBounds::for_slot(area.slot) {
                    Some(bounds) => area.size = bounds.clamp(area.size),
                    None => area.visible = true,
                }
                area.repair_active_group();
                area
            })
            .collect();
        DockLayout::from_areas(areas, next_id)
    }
}

/// `Err(InvalidLayout)` carrying the report's errors, if it has any.
pub(crate) fn reject_errors(report: LayoutInvariantReport) -> Result<(), LayoutValidationError> {
    if !report.has_errors() {
        return Ok(());
    }
    let issues = report
        .issues
        .into_iter()
        .filter(|issue| issue.severity == LayoutInvariantSeverity::Error)
        .collect();
    Err(LayoutValidationError::InvalidLayout { issues })
}

/// Persisted form of one [`DockArea`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockAreaRecord {
    pub slot: DockSlot,
    pub size: f64,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_group: Option<NodeId>,
    /// Every node of the tree, sorted by id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<LayoutNodeRecord>,
}

/// One tree node with its children referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNodeRecord {
    TabGroup {
        id: NodeId,
        #[serde(default)]
        tabs: Vec<Tab>,
        #[serde(default)]
        active_tab_id: Option<TabId>,
    },
    Split {
        id: NodeId,
        direction: SplitDirection,
        ratio: f64,
        first: NodeId,
        second: NodeId,
    },
}

impl LayoutNodeRecord {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::TabGroup { id, .. } | Self::Split { id, .. } => *id,
        }
    }
}

impl From<DockArea> for DockAreaRecord {
    fn from(area: DockArea) -> Self {
        let mut nodes = Vec::new();
        let root = area.root.map(|root| {
            let root_id = root.id();
            let mut pending = vec![root];
            while let Some(node) = pending.pop() {
                match node {
                    LayoutNode::TabGroup(group) => nodes.push(LayoutNodeRecord::TabGroup {
                        id: group.id,
                        tabs: group.tabs,
                        active_tab_id: group.active_tab_id,
                    }),
                    LayoutNode::Split(split) => {
                        nodes.push(LayoutNodeRecord::Split {
                            id: split.id,
                            direction: split.direction,
                            ratio: split.ratio,
                            first: split.first.id(),
                            second: split.second.id(),
                        });
                        pending.push(*split.second);
                        pending.push(*split.first);
                    }
                }
            }
            root_id
        });
        nodes.sort_by_key(LayoutNodeRecord::id);
        Self {
            slot: area.slot,
            size: area.size,
            visible: area.visible,
            root,
            active_group: area.active_group,
            nodes,
        }
    }
}

impl TryFrom<DockAreaRecord> for DockArea {
    type Error = LayoutRecordError;

    fn try_from(record: DockAreaRecord) -> Result<Self, Self::Error> {
        let mut records = BTreeMap::new();
        for node in record.nodes {
            let node_id = node.id();
            if records.insert(node_id, node).is_some() {
                return Err(LayoutRecordError::DuplicateNodeId { node_id });
            }
        }
        let root = record
            .root
            .map(|root| build_tree(root, &mut records))
            .transpose()?;
        if let Some(&node_id) = records.keys().next() {
            return Err(LayoutRecordError::UnreachableNode { node_id });
        }
        Ok(Self {
            slot: record.slot,
            size: record.size,
            visible: record.visible,
            root,
            active_group: record.active_group,
        })
    }
}

/// Assemble the tree under `root`, consuming its records.
///
/// Records are collected top-down and built bottom-up, so neither direction
/// recurses.
fn build_tree(
    root: NodeId,
    records: &mut BTreeMap<NodeId, LayoutNodeRecord>,
) -> Result<LayoutNode, LayoutRecordError> {
    let mut order = Vec::new();
    let mut visited = BTreeSet::new();
    let mut pending = vec![root];
    while let Some(node_id) = pending.pop() {
        if !visited.insert(node_id) {
            return Err(LayoutRecordError::SharedNode { node_id });
        }
        let record = records
            .remove(&node_id)
            .ok_or(LayoutRecordError::MissingNode { node_id })?;
        if let LayoutNodeRecord::Split { first, second, .. } = &record {
            pending.push(*second);
            pending.push(*first);
        }
        order.push(record);
    }

    let mut built: BTreeMap<NodeId, LayoutNode> = BTreeMap::new();
    for record in order.into_iter().rev() {
        let node = match record {
            LayoutNodeRecord::TabGroup {
                id,
                tabs,
                active_tab_id,
            } => LayoutNode::TabGroup(TabGroup {
                id,
                tabs,
                active_tab_id,
            }),
            LayoutNodeRecord::Split {
                id,
                direction,
                ratio,
                first,
                second,
            } => {
                let (Some(first), Some(second)) = (built.remove(&first), built.remove(&second))
                else {
                    return Err(LayoutRecordError::MissingNode { node_id: id });
                };
                LayoutNode::Split(Split {
                    id,
                    direction,
                    ratio,
                    first: Box::new(first),
                    second: Box::new(second),
                })
            }
        };
        built.insert(node.id(), node);
    }
    built
        .remove(&root)
        .ok_or(LayoutRecordError::MissingNode { node_id: root })
}

/// A persisted area whose node records do not form one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRecordError {
    DuplicateNodeId { node_id: NodeId },
    /// The root or a split child names a node with no record.
    MissingNode { node_id: NodeId },
    /// A node is reached twice (two parents, or a cycle).
    SharedNode { node_id: NodeId },
    /// A record not reachable from the root.
    UnreachableNode { node_id: NodeId },
}

impl fmt::Display for LayoutRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node record {node_id}"),
            Self::MissingNode { node_id } => write!(f, "node {node_id} has no record"),
            Self::SharedNode { node_id } => write!(f, "node {node_id} has more than one parent"),
            Self::UnreachableNode { node_id } => {
                write!(f, "node {node_id} is not reachable from the area root")
            }
        }
    }
}

impl std::error::Error for LayoutRecordError {}

/// Errors from layout snapshot validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutValidationError {
    /// Schema version is not supported.
    UnsupportedVersion { found: u16, expected: u16 },
    /// Trees or areas violate structural invariants.
    InvalidLayout { issues: Vec<LayoutInvariantIssue> },
    InvalidAreaSize { slot: &'static str, size: f64 },
    /// Areas do not cover each slot exactly once.
    SlotCoverage,
    LayoutModel(LayoutModelError),
}

impl fmt::Display for LayoutValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported layout schema version {found} (expected {expected})"
            ),
            Self::InvalidLayout { issues } => {
                let first = issues
                    .first()
                    .map(|issue| issue.message.as_str())
                    .unwrap_or("unknown issue");
                write!(f, "layout has {} invariant error(s): {first}", issues.len())
            }
            Self::InvalidAreaSize { slot, size } => {
                write!(f, "area {slot} has invalid size {size}")
            }
            Self::SlotCoverage => write!(f, "layout must contain each dock slot exactly once"),
            Self::LayoutModel(err) => write!(f, "layout model error: {err}"),
        }
    }
}

impl std::error::Error for LayoutValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::LayoutModel(err) = self {
            return Some(err);
        }
        None
    }
}

/// Result of a successful migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationResult {
    pub snapshot: WorkspaceLayout,
    pub from_version: u16,
    pub to_version: u16,
    pub warnings: Vec<String>,
}

/// Errors from layout migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutMigrationError {
    /// Version is newer than this build understands.
    UnsupportedVersion { version: u16 },
    /// Migration from the given version is not implemented.
    NoMigrationPath { from: u16, to: u16 },
}

impl fmt::Display for LayoutMigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported layout schema version {version} for migration")
            }
            Self::NoMigrationPath { from, to } => {
                write!(f, "no layout migration path from v{from} to v{to}")
            }
        }
    }
}

impl std::error::Error for LayoutMigrationError {}

/// Bring a snapshot up to [`WORKSPACE_LAYOUT_VERSION`].
///
/// v1 is the only version so far, so this is the identity for v1 and an
/// error for everything else.
pub fn migrate_layout(snapshot: WorkspaceLayout) -> Result<MigrationResult, LayoutMigrationError> {
    match snapshot.version {
        WORKSPACE_LAYOUT_VERSION => Ok(MigrationResult {
            from_version: WORKSPACE_LAYOUT_VERSION,
            to_version: WORKSPACE_LAYOUT_VERSION,
            warnings: Vec::new(),
            snapshot,
        }),
        v if v > WORKSPACE_LAYOUT_VERSION => {
            Err(LayoutMigrationError::UnsupportedVersion { version: v })
        }
        v => Err(LayoutMigrationError::NoMigrationPath {
            from: v,
            to: WORKSPACE_LAYOUT_VERSION,
        }),
    }
}

#[must_use]
pub fn needs_migration(snapshot: &WorkspaceLayout) -> bool {
    snapshot.version != WORKSPACE_LAYOUT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{DockSlot, MAX_RIGHT_SIZE};
    use crate::command::LayoutCommand;
    use crate::defaults::default_layout;
    use crate::dock_zone::DropPosition;
    use crate::invariants::LayoutInvariantCode;

    fn restructured() -> DockLayout {
        let mut layout = default_layout();
        let center = layout.locate_tab(&TabId::from("graph")).unwrap().group_id;
        for command in [
            LayoutCommand::DropTab {
                tab_id: TabId::from("inspector"),
                target_group: center,
                position: DropPosition::Right,
            },
            LayoutCommand::DropTab {
                tab_id: TabId::from("cluster"),
                target_group: center,
                position: DropPosition::Top,
            },
            LayoutCommand::SetAreaVisible {
                slot: DockSlot::Right,
                visible: false,
            },
        ] {
            layout.apply(command).unwrap();
        }
        layout
    }

    #[test]
    fn json_round_trip_preserves_identity() {
        let layout = restructured();
        let json = serde_json::to_string_pretty(&layout.to_snapshot()).unwrap();
        let snapshot: WorkspaceLayout = serde_json::from_str(&json).unwrap();
        let restored = DockLayout::from_snapshot(snapshot).unwrap();
        assert_eq!(restored, layout);
    }

    #[test]
    fn missing_next_id_is_recomputed() {
        let layout = restructured();
        let mut snapshot = layout.to_snapshot();
        snapshot.next_id = None;
        assert_eq!(snapshot.effective_next_id().unwrap(), layout.next_id());
        let restored = DockLayout::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.next_id(), layout.next_id());
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut snapshot = default_layout().to_snapshot();
        snapshot.version = WORKSPACE_LAYOUT_VERSION + 1;
        assert!(matches!(
            snapshot.validate(),
            Err(LayoutValidationError::UnsupportedVersion { found: 2, expected: 1 })
        ));
        assert!(needs_migration(&snapshot));
        assert_eq!(
            migrate_layout(snapshot),
            Err(LayoutMigrationError::UnsupportedVersion { version: 2 })
        );
    }

    #[test]
    fn older_version_has_no_migration_path() {
        let mut snapshot = default_layout().to_snapshot();
        snapshot.version = 0;
        assert_eq!(
            migrate_layout(snapshot),
            Err(LayoutMigrationError::NoMigrationPath { from: 0, to: 1 })
        );
    }

    #[test]
    fn current_version_migrates_as_identity() {
        let snapshot = default_layout().to_snapshot();
        assert!(!needs_migration(&snapshot));
        let result = migrate_layout(snapshot.clone()).unwrap();
        assert_eq!(result.snapshot, snapshot);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn corrupt_tree_is_rejected() {
        let mut snapshot = default_layout().to_snapshot();
        let right = snapshot.areas[2].root.as_mut().unwrap();
        let LayoutNode::TabGroup(group) = right else {
            panic!("default right root is a group");
        };
        group.tabs.push(Tab::new("graph", "dup", "graph"));
        let err = DockLayout::from_snapshot(snapshot).unwrap_err();
        let LayoutValidationError::InvalidLayout { issues } = err else {
            panic!("expected invariant failure");
        };
        assert_eq!(issues[0].code, LayoutInvariantCode::DuplicateTabId);
    }

    #[test]
    fn sizes_are_clamped_and_active_groups_repaired() {
        let mut snapshot = default_layout().to_snapshot();
        snapshot.areas[2].size = 9_000.0;
        snapshot.areas[0].active_group = NodeId::new(3).ok();
        snapshot.areas[3].root = Some(LayoutNode::TabGroup(TabGroup::new(
            NodeId::new(4).unwrap(),
        )));
        let layout = DockLayout::from_snapshot(snapshot).unwrap();
        assert_eq!(layout.area(DockSlot::Right).size, MAX_RIGHT_SIZE);
        assert_eq!(layout.area(DockSlot::Left).active_group, NodeId::new(1).ok());
        assert!(!layout.invariant_report().has_errors());
    }

    #[test]
    fn negative_size_is_invalid() {
        let mut snapshot = default_layout().to_snapshot();
        snapshot.areas[0].size = -4.0;
        assert!(matches!(
            snapshot.validate(),
            Err(LayoutValidationError::InvalidAreaSize { slot: "left", .. })
        ));
    }

    fn depth(node: &LayoutNode) -> usize {
        match node {
            LayoutNode::TabGroup(_) => 1,
            LayoutNode::Split(split) => 1 + depth(&split.first).max(depth(&split.second)),
        }
    }

    #[test]
    fn areas_serialize_as_flat_records() {
        let layout = restructured();
        let json = serde_json::to_value(layout.to_snapshot()).unwrap();
        let center = &json["areas"][1];
        let nodes = center["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 5);
        assert!(nodes.iter().all(|node| !node["first"].is_object()));
        let ids: Vec<_> = nodes.iter().map(|node| node["id"].as_u64().unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        let root = center["root"].as_u64().unwrap();
        let root_record = nodes.iter().find(|node| node["id"] == root).unwrap();
        assert_eq!(root_record["type"], "split");
    }

    #[test]
    fn deep_split_chain_survives_json() {
        let mut layout = default_layout();
        let mut previous = TabId::from("graph");
        for n in 0..160 {
            let tab = Tab::new(format!("file:{n}"), format!("{n}"), "editor");
            let tab_id = tab.id.clone();
            layout
                .apply(LayoutCommand::OpenTab {
                    tab,
                    slot: DockSlot::Center,
                })
                .unwrap();
            let target = layout.locate_tab(&previous).unwrap().group_id;
            let outcome = layout
                .apply(LayoutCommand::DropTab {
                    tab_id: tab_id.clone(),
                    target_group: target,
                    position: DropPosition::Right,
                })
                .unwrap();
            assert!(outcome.is_applied());
            previous = tab_id;
        }
        let center = layout.area(DockSlot::Center).root.as_ref().unwrap();
        assert!(depth(center) > 150, "depth {}", depth(center));

        let json = serde_json::to_string(&layout.to_snapshot()).unwrap();
        let snapshot: WorkspaceLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(DockLayout::from_snapshot(snapshot).unwrap(), layout);
    }

    fn area_from(nodes: serde_json::Value, root: u64) -> Result<DockArea, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "slot": "center",
            "size": 0.0,
            "visible": true,
            "root": root,
            "nodes": nodes,
        }))
    }

    #[test]
    fn malformed_records_are_rejected() {
        let group = |id: u64| serde_json::json!({ "type": "tab_group", "id": id });
        let split = |id: u64, first: u64, second: u64| {
            serde_json::json!({
                "type": "split",
                "id": id,
                "direction": "horizontal",
                "ratio": 0.5,
                "first": first,
                "second": second,
            })
        };

        let ok = area_from(serde_json::json!([group(1), group(2), split(3, 1, 2)]), 3).unwrap();
        assert_eq!(ok.root.as_ref().map(LayoutNode::id), NodeId::new(3).ok());

        for (nodes, root, needle) in [
            (serde_json::json!([group(1), split(3, 1, 1)]), 3, "more than one parent"),
            (serde_json::json!([split(3, 3, 1), group(1)]), 3, "more than one parent"),
            (serde_json::json!([group(1), split(3, 1, 2)]), 3, "no record"),
            (serde_json::json!([group(1), group(2)]), 1, "not reachable"),
            (serde_json::json!([group(1), group(1)]), 1, "duplicate node record"),
        ] {
            let err = area_from(nodes, root).unwrap_err();
            assert!(err.to_string().contains(needle), "{err}");
        }
    }
}
