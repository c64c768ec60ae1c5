//! Layout tree model: tabs, tab groups, and binary splits.
//!
//! A [`LayoutNode`] is either a [`TabGroup`] leaf or a [`Split`] with exactly
//! two children. Node identity is the [`NodeId`], never structural equality,
//! so partial updates can replace nodes by id without re-keying the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest split ratio a split may hold.
pub const MIN_SPLIT_RATIO: f64 = 0.1;

/// Highest split ratio a split may hold.
pub const MAX_SPLIT_RATIO: f64 = 0.9;

/// Ratio given to freshly created splits.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Stable identifier for tab groups and splits.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node ID.
    pub const MIN: Self = Self(1);

    /// Create a new node ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutModelError> {
        if raw == 0 {
            return Err(LayoutModelError::ZeroNodeId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, LayoutModelError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutModelError::NodeIdOverflow { current: self });
        };
        Self::new(next)
    }

    /// The following ID, pinned at `u64::MAX`.
    #[must_use]
    pub const fn saturating_next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque tab identity supplied by the content provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TabId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque content tag used to pick the panel that renders a tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentType {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One tab docked in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_id: Option<String>,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Tab {
    /// Build a clean tab with no file or graph binding.
    #[must_use]
    pub fn new(
        id: impl Into<TabId>,
        title: impl Into<String>,
        content_type: impl Into<ContentType>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content_type: content_type.into(),
            file_path: None,
            graph_id: None,
            is_dirty: false,
            icon: None,
        }
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_graph_id(mut self, graph_id: impl Into<String>) -> Self {
        self.graph_id = Some(graph_id.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Leaf node: an ordered sequence of tabs with one active selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: NodeId,
    /// Display order.
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active_tab_id: Option<TabId>,
}

impl TabGroup {
    /// An empty group.
    #[must_use]
    pub const fn new(id: NodeId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active_tab_id: None,
        }
    }

    /// A group holding exactly `tab`, which is active.
    #[must_use]
    pub fn with_tab(id: NodeId, tab: Tab) -> Self {
        let active = tab.id.clone();
        Self {
            id,
            tabs: vec![tab],
            active_tab_id: Some(active),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[must_use]
    pub fn position(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| &tab.id == tab_id)
    }

    #[must_use]
    pub fn contains(&self, tab_id: &TabId) -> bool {
        self.position(tab_id).is_some()
    }

    /// The active tab, if the selection points at a tab in this group.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        let active = self.active_tab_id.as_ref()?;
        self.tabs.iter().find(|tab| &tab.id == active)
    }

    /// Append `tab` and make it active.
    pub fn push_and_activate(&mut self, tab: Tab) {
        self.active_tab_id = Some(tab.id.clone());
        self.tabs.push(tab);
    }

    /// Select `tab_id`. Returns `false` if the tab is not in this group.
    pub fn activate(&mut self, tab_id: &TabId) -> bool {
        if !self.contains(tab_id) {
            return false;
        }
        self.active_tab_id = Some(tab_id.clone());
        true
    }

    /// Remove `tab_id` from the sequence.
    ///
    /// If the removed tab was active, the tab immediately preceding it becomes
    /// active, or the new first tab, or nothing when the group is now empty.
    pub fn remove_tab(&mut self, tab_id: &TabId) -> Option<Tab> {
        let index = self.position(tab_id)?;
        let removed = self.tabs.remove(index);
        if self.active_tab_id.as_ref() == Some(tab_id) {
            let successor = index.checked_sub(1).or(if self.tabs.is_empty() {
                None
            } else {
                Some(0)
            });
            self.active_tab_id = successor.map(|i| self.tabs[i].id.clone());
        }
        Some(removed)
    }

    /// Move `tab_id` to `index` (clamped to the sequence length).
    pub fn reorder(&mut self, tab_id: &TabId, index: usize) -> bool {
        let Some(from) = self.position(tab_id) else {
            return false;
        };
        let tab = self.tabs.remove(from);
        let to = index.min(self.tabs.len());
        self.tabs.insert(to, tab);
        true
    }
}

/// Orientation of a split node.
///
/// `Horizontal` places the children side by side (left | right) and the ratio
/// applies to the width; `Vertical` stacks them (top / bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

/// Binary split with a movable boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub id: NodeId,
    pub direction: SplitDirection,
    /// Share of the extent given to `first`, within `[0.1, 0.9]`.
    pub ratio: f64,
    pub first: Box<LayoutNode>,
    pub second: Box<LayoutNode>,
}

impl Split {
    #[must_use]
    pub fn new(
        id: NodeId,
        direction: SplitDirection,
        ratio: f64,
        first: LayoutNode,
        second: LayoutNode,
    ) -> Self {
        Self {
            id,
            direction,
            ratio: clamp_ratio(ratio),
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

/// Clamp a split ratio into `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
///
/// Non-finite input maps to [`DEFAULT_SPLIT_RATIO`].
#[must_use]
pub fn clamp_ratio(ratio: f64) -> f64 {
    if !ratio.is_finite() {
        return DEFAULT_SPLIT_RATIO;
    }
    ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
}

/// Recursive layout tree node.
///
/// Not serialized directly; persisted layouts store nodes as flat records.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    TabGroup(TabGroup),
    Split(Split),
}

impl LayoutNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::TabGroup(group) => group.id,
            Self::Split(split) => split.id,
        }
    }

    #[must_use]
    pub fn find_group(&self, group_id: NodeId) -> Option<&TabGroup> {
        match self {
            Self::TabGroup(group) => (group.id == group_id).then_some(group),
            Self::Split(split) => split
                .first
                .find_group(group_id)
                .or_else(|| split.second.find_group(group_id)),
        }
    }

    pub fn find_group_mut(&mut self, group_id: NodeId) -> Option<&mut TabGroup> {
        match self {
            Self::TabGroup(group) => (group.id == group_id).then_some(group),
            Self::Split(split) => {
                if let Some(found) = split.first.find_group_mut(group_id) {
                    return Some(found);
                }
                split.second.find_group_mut(group_id)
            }
        }
    }

    #[must_use]
    pub fn find_split(&self, split_id: NodeId) -> Option<&Split> {
        match self {
            Self::TabGroup(_) => None,
            Self::Split(split) if split.id == split_id => Some(split),
            Self::Split(split) => split
                .first
                .find_split(split_id)
                .or_else(|| split.second.find_split(split_id)),
        }
    }

    pub fn find_split_mut(&mut self, split_id: NodeId) -> Option<&mut Split> {
        match self {
            Self::TabGroup(_) => None,
            Self::Split(split) => {
                if split.id == split_id {
                    return Some(split);
                }
                if let Some(found) = split.first.find_split_mut(split_id) {
                    return Some(found);
                }
                split.second.find_split_mut(split_id)
            }
        }
    }

    /// Id of the split directly containing `node_id`, if any.
    #[must_use]
    pub fn parent_of(&self, node_id: NodeId) -> Option<NodeId> {
        match self {
            Self::TabGroup(_) => None,
            Self::Split(split) => {
                if split.first.id() == node_id || split.second.id() == node_id {
                    return Some(split.id);
                }
                split
                    .first
                    .parent_of(node_id)
                    .or_else(|| split.second.parent_of(node_id))
            }
        }
    }

    /// Tab groups in display order (`first` subtree before `second`).
    #[must_use]
    pub fn groups(&self) -> Vec<&TabGroup> {
        let mut out = Vec::new();
        self.collect_groups(&mut out);
        out
    }

    fn collect_groups<'a>(&'a self, out: &mut Vec<&'a TabGroup>) {
        match self {
            Self::TabGroup(group) => out.push(group),
            Self::Split(split) => {
                split.first.collect_groups(out);
                split.second.collect_groups(out);
            }
        }
    }

    #[must_use]
    pub fn first_group(&self) -> &TabGroup {
        match self {
            Self::TabGroup(group) => group,
            Self::Split(split) => split.first.first_group(),
        }
    }

    /// The group owning `tab_id`, if any.
    #[must_use]
    pub fn group_containing(&self, tab_id: &TabId) -> Option<&TabGroup> {
        match self {
            Self::TabGroup(group) => group.contains(tab_id).then_some(group),
            Self::Split(split) => split
                .first
                .group_containing(tab_id)
                .or_else(|| split.second.group_containing(tab_id)),
        }
    }

    /// Visit every node, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a LayoutNode)) {
        visit(self);
        if let Self::Split(split) = self {
            split.first.walk(visit);
            split.second.walk(visit);
        }
    }

    /// Replace the group `group_id` with whatever `build` makes of it.
    ///
    /// Returns `false` (leaving the tree untouched) if the group is absent.
    pub fn replace_group(
        &mut self,
        group_id: NodeId,
        build: impl FnOnce(TabGroup) -> LayoutNode,
    ) -> bool {
        let Some(slot) = self.group_slot_mut(group_id) else {
            return false;
        };
        let placeholder = LayoutNode::TabGroup(TabGroup::new(group_id));
        let LayoutNode::TabGroup(group) = std::mem::replace(slot, placeholder) else {
            unreachable!("group_slot_mut only yields tab group nodes");
        };
        *slot = build(group);
        true
    }

    fn group_slot_mut(&mut self, group_id: NodeId) -> Option<&mut LayoutNode> {
        if matches!(self, Self::TabGroup(group) if group.id == group_id) {
            return Some(self);
        }
        match self {
            Self::TabGroup(_) => None,
            Self::Split(split) => {
                if let Some(found) = split.first.group_slot_mut(group_id) {
                    return Some(found);
                }
                split.second.group_slot_mut(group_id)
            }
        }
    }

    /// Drop empty tab groups, promoting each one's sibling into its parent's
    /// position. Returns `None` when nothing with tabs remains.
    #[must_use]
    pub fn collapse_empty(self) -> Option<LayoutNode> {
        match self {
            Self::TabGroup(group) => (!group.is_empty()).then_some(Self::TabGroup(group)),
            Self::Split(split) => {
                let Split {
                    id,
                    direction,
                    ratio,
                    first,
                    second,
                } = split;
                match (first.collapse_empty(), second.collapse_empty()) {
                    (Some(first), Some(second)) => Some(Self::Split(Split {
                        id,
                        direction,
                        ratio,
                        first: Box::new(first),
                        second: Box::new(second),
                    })),
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            }
        }
    }
}

/// Find a tab group anywhere in `tree`.
#[must_use]
pub fn find_group(tree: &LayoutNode, group_id: NodeId) -> Option<&TabGroup> {
    tree.find_group(group_id)
}

/// All tabs of `tree` in display order.
#[must_use]
pub fn flatten_tabs(tree: &LayoutNode) -> Vec<&Tab> {
    tree.groups()
        .into_iter()
        .flat_map(|group| group.tabs.iter())
        .collect()
}

/// Errors from node id handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutModelError {
    ZeroNodeId,
    NodeIdOverflow { current: NodeId },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodeId => write!(f, "node id 0 is reserved"),
            Self::NodeIdOverflow { current } => write!(f, "node id overflow after {current}"),
        }
    }
}

impl std::error::Error for LayoutModelError {}
