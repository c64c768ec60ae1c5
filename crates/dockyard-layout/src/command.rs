//! Structural commands and the layout reducer.
//!
//! Every gesture resolves to one [`LayoutCommand`]. [`DockLayout::apply`]
//! executes it on a cloned working layout, re-checks the invariant report,
//! and only then commits, so a command either fully applies or leaves the
//! layout untouched.
//!
//! Commands that reference ids which no longer exist are recovered as
//! [`LayoutOutcome::Noop`] with a [`LayoutNoopReason`]; out-of-range sizes and
//! ratios are clamped. Only an invariant violation in the working copy (a bug)
//! or an exhausted id space surfaces as a [`LayoutError`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::area::{AreaSizeBounds, DockSlot};
use crate::defaults::default_layout;
use crate::dock::{DockLayout, TabLocation};
use crate::dock_zone::DropPosition;
use crate::invariants::LayoutInvariantCode;
use crate::tree::{
    DEFAULT_SPLIT_RATIO, LayoutModelError, LayoutNode, NodeId, Split, Tab, TabGroup, TabId,
    clamp_ratio,
};

/// One discrete layout mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LayoutCommand {
    /// Open `tab` in `slot`, or activate it where it already lives.
    OpenTab { tab: Tab, slot: DockSlot },
    CloseTab { tab_id: TabId },
    SetActiveTab { group_id: NodeId, tab_id: TabId },
    MarkTabDirty { tab_id: TabId, dirty: bool },
    SetSplitRatio { split_id: NodeId, ratio: f64 },
    SetAreaSize { slot: DockSlot, size: f64 },
    SetAreaVisible { slot: DockSlot, visible: bool },
    ToggleAreaVisible { slot: DockSlot },
    /// Move a tab onto `target_group`, merging (center) or splitting.
    DropTab {
        tab_id: TabId,
        target_group: NodeId,
        position: DropPosition,
    },
    /// Move a tab within its tab bar.
    ReorderTab {
        group_id: NodeId,
        tab_id: TabId,
        index: usize,
    },
    ResetLayout,
}

impl LayoutCommand {
    /// Command family.
    #[must_use]
    pub const fn kind(&self) -> LayoutCommandKind {
        match self {
            Self::OpenTab { .. } => LayoutCommandKind::OpenTab,
            Self::CloseTab { .. } => LayoutCommandKind::CloseTab,
            Self::SetActiveTab { .. } => LayoutCommandKind::SetActiveTab,
            Self::MarkTabDirty { .. } => LayoutCommandKind::MarkTabDirty,
            Self::SetSplitRatio { .. } => LayoutCommandKind::SetSplitRatio,
            Self::SetAreaSize { .. } => LayoutCommandKind::SetAreaSize,
            Self::SetAreaVisible { .. } => LayoutCommandKind::SetAreaVisible,
            Self::ToggleAreaVisible { .. } => LayoutCommandKind::ToggleAreaVisible,
            Self::DropTab { .. } => LayoutCommandKind::DropTab,
            Self::ReorderTab { .. } => LayoutCommandKind::ReorderTab,
            Self::ResetLayout => LayoutCommandKind::ResetLayout,
        }
    }
}

/// Stable command discriminator used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommandKind {
    OpenTab,
    CloseTab,
    SetActiveTab,
    MarkTabDirty,
    SetSplitRatio,
    SetAreaSize,
    SetAreaVisible,
    ToggleAreaVisible,
    DropTab,
    ReorderTab,
    ResetLayout,
}

impl LayoutCommandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenTab => "open_tab",
            Self::CloseTab => "close_tab",
            Self::SetActiveTab => "set_active_tab",
            Self::MarkTabDirty => "mark_tab_dirty",
            Self::SetSplitRatio => "set_split_ratio",
            Self::SetAreaSize => "set_area_size",
            Self::SetAreaVisible => "set_area_visible",
            Self::ToggleAreaVisible => "toggle_area_visible",
            Self::DropTab => "drop_tab",
            Self::ReorderTab => "reorder_tab",
            Self::ResetLayout => "reset_layout",
        }
    }
}

impl fmt::Display for LayoutCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a command left the layout unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutNoopReason {
    TabNotFound { tab_id: TabId },
    GroupNotFound { group_id: NodeId },
    SplitNotFound { split_id: NodeId },
    TabNotInGroup { group_id: NodeId, tab_id: TabId },
    /// Dropping a tab where it already is.
    SelfDrop { group_id: NodeId },
    /// The center area's size is derived, never set.
    AreaHasNoSize,
    CenterAlwaysVisible,
    NonFiniteValue,
    /// The command would not change anything.
    AlreadyInState,
}

impl fmt::Display for LayoutNoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TabNotFound { tab_id } => write!(f, "tab {tab_id} not found"),
            Self::GroupNotFound { group_id } => write!(f, "group {group_id} not found"),
            Self::SplitNotFound { split_id } => write!(f, "split {split_id} not found"),
            Self::TabNotInGroup { group_id, tab_id } => {
                write!(f, "tab {tab_id} is not in group {group_id}")
            }
            Self::SelfDrop { group_id } => {
                write!(f, "tab dropped onto its own group {group_id}")
            }
            Self::AreaHasNoSize => write!(f, "center area size is derived"),
            Self::CenterAlwaysVisible => write!(f, "center area cannot be hidden"),
            Self::NonFiniteValue => write!(f, "value is not finite"),
            Self::AlreadyInState => write!(f, "layout already in requested state"),
        }
    }
}

/// Result of a command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOutcome {
    Applied {
        kind: LayoutCommandKind,
        /// Nodes created, removed, or modified, ascending.
        touched: Vec<NodeId>,
    },
    Noop {
        kind: LayoutCommandKind,
        reason: LayoutNoopReason,
    },
}

impl LayoutOutcome {
    #[must_use]
    pub const fn kind(&self) -> LayoutCommandKind {
        match self {
            Self::Applied { kind, .. } | Self::Noop { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    #[must_use]
    pub fn noop_reason(&self) -> Option<&LayoutNoopReason> {
        match self {
            Self::Noop { reason, .. } => Some(reason),
            Self::Applied { .. } => None,
        }
    }
}

/// Structured reasons a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutFailure {
    Model(LayoutModelError),
    /// The working copy broke an invariant; the layout was not changed.
    InvariantViolation { codes: Vec<LayoutInvariantCode> },
}

impl fmt::Display for LayoutFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::InvariantViolation { codes } => {
                write!(f, "command would violate layout invariants: {codes:?}")
            }
        }
    }
}

impl std::error::Error for LayoutFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Model(err) = self {
            return Some(err);
        }
        None
    }
}

/// A rejected command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutError {
    pub kind: LayoutCommandKind,
    pub failure: LayoutFailure,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout command {} failed: {}", self.kind, self.failure)
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.failure)
    }
}

/// Early exit from a command body.
enum CommandFailure {
    Noop(LayoutNoopReason),
    Failed(LayoutFailure),
}

impl From<LayoutModelError> for CommandFailure {
    fn from(err: LayoutModelError) -> Self {
        Self::Failed(LayoutFailure::Model(err))
    }
}

impl From<LayoutNoopReason> for CommandFailure {
    fn from(reason: LayoutNoopReason) -> Self {
        Self::Noop(reason)
    }
}

type Touched = BTreeSet<NodeId>;

/// Apply `command` to a copy of `layout`, returning the next layout.
///
/// The returned layout equals `layout` unless the command applied.
#[must_use]
pub fn reduce(
    layout: &DockLayout,
    command: LayoutCommand,
) -> (DockLayout, Result<LayoutOutcome, LayoutError>) {
    let mut next = layout.clone();
    let result = next.apply(command);
    (next, result)
}

impl DockLayout {
    /// Apply one command atomically.
    ///
    /// The command runs on a cloned working layout. It replaces `self` only
    /// when it changed something and the result has no invariant errors.
    pub fn apply(&mut self, command: LayoutCommand) -> Result<LayoutOutcome, LayoutError> {
        let kind = command.kind();
        let mut working = self.clone();
        let mut touched = Touched::new();

        match working.apply_inner(command, &mut touched) {
            Ok(()) => {}
            Err(CommandFailure::Noop(reason)) => return Ok(LayoutOutcome::Noop { kind, reason }),
            Err(CommandFailure::Failed(failure)) => return Err(LayoutError { kind, failure }),
        }

        if working == *self {
            return Ok(LayoutOutcome::Noop {
                kind,
                reason: LayoutNoopReason::AlreadyInState,
            });
        }

        let report = working.invariant_report();
        if report.has_errors() {
            return Err(LayoutError {
                kind,
                failure: LayoutFailure::InvariantViolation {
                    codes: report.error_codes(),
                },
            });
        }

        *self = working;
        Ok(LayoutOutcome::Applied {
            kind,
            touched: touched.into_iter().collect(),
        })
    }

    fn apply_inner(
        &mut self,
        command: LayoutCommand,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        match command {
            LayoutCommand::OpenTab { tab, slot } => self.open_tab(tab, slot, touched),
            LayoutCommand::CloseTab { tab_id } => self.close_tab(&tab_id, touched),
            LayoutCommand::SetActiveTab { group_id, tab_id } => {
                self.set_active_tab(group_id, &tab_id, touched)
            }
            LayoutCommand::MarkTabDirty { tab_id, dirty } => {
                self.mark_tab_dirty(&tab_id, dirty, touched)
            }
            LayoutCommand::SetSplitRatio { split_id, ratio } => {
                self.set_split_ratio(split_id, ratio, touched)
            }
            LayoutCommand::SetAreaSize { slot, size } => self.set_area_size(slot, size),
            LayoutCommand::SetAreaVisible { slot, visible } => {
                self.set_area_visible(slot, visible)
            }
            LayoutCommand::ToggleAreaVisible { slot } => {
                let visible = !self.area(slot).visible;
                self.set_area_visible(slot, visible)
            }
            LayoutCommand::DropTab {
                tab_id,
                target_group,
                position,
            } => self.drop_tab(&tab_id, target_group, position, touched),
            LayoutCommand::ReorderTab {
                group_id,
                tab_id,
                index,
            } => self.reorder_tab(group_id, &tab_id, index, touched),
            LayoutCommand::ResetLayout => {
                *self = default_layout();
                touched.extend(self.group_ids());
                Ok(())
            }
        }
    }

    fn open_tab(
        &mut self,
        tab: Tab,
        slot: DockSlot,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        if let Some(existing) = self.locate_tab(&tab.id) {
            let area = self.area_mut(existing.slot);
            if let Some(group) = area.find_group_mut(existing.group_id) {
                group.activate(&tab.id);
            }
            area.active_group = Some(existing.group_id);
            area.visible = true;
            touched.insert(existing.group_id);
            return Ok(());
        }

        if let Some(target) = self.area(slot).target_group() {
            let area = self.area_mut(slot);
            let group = area
                .find_group_mut(target)
                .ok_or(LayoutNoopReason::GroupNotFound { group_id: target })?;
            group.push_and_activate(tab);
            area.active_group = Some(target);
            area.visible = true;
            touched.insert(target);
            return Ok(());
        }

        let group_id = self.allocate_id()?;
        let area = self.area_mut(slot);
        area.root = Some(LayoutNode::TabGroup(TabGroup::with_tab(group_id, tab)));
        area.active_group = Some(group_id);
        area.visible = true;
        touched.insert(group_id);
        Ok(())
    }

    fn close_tab(&mut self, tab_id: &TabId, touched: &mut Touched) -> Result<(), CommandFailure> {
        self.detach_tab(tab_id, touched)?;
        Ok(())
    }

    /// Remove `tab_id` from its group, collapsing the group if it empties.
    fn detach_tab(
        &mut self,
        tab_id: &TabId,
        touched: &mut Touched,
    ) -> Result<(Tab, TabLocation), CommandFailure> {
        let location = self
            .locate_tab(tab_id)
            .ok_or_else(|| LayoutNoopReason::TabNotFound {
                tab_id: tab_id.clone(),
            })?;
        let area = self.area_mut(location.slot);
        let group = area
            .find_group_mut(location.group_id)
            .ok_or(LayoutNoopReason::GroupNotFound {
                group_id: location.group_id,
            })?;
        let tab = group
            .remove_tab(tab_id)
            .ok_or_else(|| LayoutNoopReason::TabNotFound {
                tab_id: tab_id.clone(),
            })?;
        touched.insert(location.group_id);

        if group.is_empty() {
            if let Some(parent) = area
                .root
                .as_ref()
                .and_then(|root| root.parent_of(location.group_id))
            {
                touched.insert(parent);
            }
            area.root = area.root.take().and_then(LayoutNode::collapse_empty);
            area.repair_active_group();
        }
        Ok((tab, location))
    }

    fn set_active_tab(
        &mut self,
        group_id: NodeId,
        tab_id: &TabId,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        let slot = self
            .group_slot(group_id)
            .ok_or(LayoutNoopReason::GroupNotFound { group_id })?;
        let area = self.area_mut(slot);
        let activated = area
            .find_group_mut(group_id)
            .is_some_and(|group| group.activate(tab_id));
        if !activated {
            return Err(LayoutNoopReason::TabNotInGroup {
                group_id,
                tab_id: tab_id.clone(),
            }
            .into());
        }
        area.active_group = Some(group_id);
        touched.insert(group_id);
        Ok(())
    }

    fn mark_tab_dirty(
        &mut self,
        tab_id: &TabId,
        dirty: bool,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        let not_found = || LayoutNoopReason::TabNotFound {
            tab_id: tab_id.clone(),
        };
        let location = self.locate_tab(tab_id).ok_or_else(not_found)?;
        let tab = self
            .area_mut(location.slot)
            .find_group_mut(location.group_id)
            .and_then(|group| group.tabs.get_mut(location.index))
            .ok_or_else(not_found)?;
        tab.is_dirty = dirty;
        touched.insert(location.group_id);
        Ok(())
    }

    fn set_split_ratio(
        &mut self,
        split_id: NodeId,
        ratio: f64,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        if !ratio.is_finite() {
            return Err(LayoutNoopReason::NonFiniteValue.into());
        }
        let slot = self
            .split_slot(split_id)
            .ok_or(LayoutNoopReason::SplitNotFound { split_id })?;
        let split = self
            .area_mut(slot)
            .root
            .as_mut()
            .and_then(|root| root.find_split_mut(split_id))
            .ok_or(LayoutNoopReason::SplitNotFound { split_id })?;
        split.ratio = clamp_ratio(ratio);
        touched.insert(split_id);
        Ok(())
    }

    fn set_area_size(&mut self, slot: DockSlot, size: f64) -> Result<(), CommandFailure> {
        let bounds = AreaSizeBounds::for_slot(slot).ok_or(LayoutNoopReason::AreaHasNoSize)?;
        if !size.is_finite() {
            return Err(LayoutNoopReason::NonFiniteValue.into());
        }
        self.area_mut(slot).size = bounds.clamp(size);
        Ok(())
    }

    fn set_area_visible(&mut self, slot: DockSlot, visible: bool) -> Result<(), CommandFailure> {
        if slot == DockSlot::Center && !visible {
            return Err(LayoutNoopReason::CenterAlwaysVisible.into());
        }
        self.area_mut(slot).visible = visible;
        Ok(())
    }

    fn drop_tab(
        &mut self,
        tab_id: &TabId,
        target_group: NodeId,
        position: DropPosition,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        let source = self
            .locate_tab(tab_id)
            .ok_or_else(|| LayoutNoopReason::TabNotFound {
                tab_id: tab_id.clone(),
            })?;
        if self.group_slot(target_group).is_none() {
            return Err(LayoutNoopReason::GroupNotFound {
                group_id: target_group,
            }
            .into());
        }

        if source.group_id == target_group {
            // A self-drop must keep the group non-empty, otherwise the
            // collapse would remove the very node being split.
            let sole_tab = self
                .find_group(target_group)
                .is_some_and(|group| group.tabs.len() == 1);
            if position == DropPosition::Center || sole_tab {
                return Err(LayoutNoopReason::SelfDrop {
                    group_id: target_group,
                }
                .into());
            }
        }

        let (tab, _) = self.detach_tab(tab_id, touched)?;

        // Collapse keeps non-empty groups, so the target only vanishes if it
        // was an empty area root sharing the source's tree.
        let slot = self
            .group_slot(target_group)
            .ok_or(LayoutNoopReason::GroupNotFound {
                group_id: target_group,
            })?;
        touched.insert(target_group);

        // An empty area root cannot become a split child, so it absorbs the
        // tab whatever the zone.
        let target_empty = self
            .find_group(target_group)
            .is_some_and(TabGroup::is_empty);
        let direction = position.split_direction().filter(|_| !target_empty);
        let Some(direction) = direction else {
            let area = self.area_mut(slot);
            let group = area
                .find_group_mut(target_group)
                .ok_or(LayoutNoopReason::GroupNotFound {
                    group_id: target_group,
                })?;
            group.push_and_activate(tab);
            area.active_group = Some(target_group);
            return Ok(());
        };

        let split_id = self.allocate_id()?;
        let new_group = self.allocate_id()?;
        touched.insert(split_id);
        touched.insert(new_group);
        let incoming = LayoutNode::TabGroup(TabGroup::with_tab(new_group, tab));
        let area = self.area_mut(slot);
        let replaced = area.root.as_mut().is_some_and(|root| {
            root.replace_group(target_group, |existing| {
                let existing = LayoutNode::TabGroup(existing);
                let (first, second) = if position.incoming_first() {
                    (incoming, existing)
                } else {
                    (existing, incoming)
                };
                LayoutNode::Split(Split::new(
                    split_id,
                    direction,
                    DEFAULT_SPLIT_RATIO,
                    first,
                    second,
                ))
            })
        });
        if !replaced {
            return Err(LayoutNoopReason::GroupNotFound {
                group_id: target_group,
            }
            .into());
        }
        area.active_group = Some(new_group);
        Ok(())
    }

    fn reorder_tab(
        &mut self,
        group_id: NodeId,
        tab_id: &TabId,
        index: usize,
        touched: &mut Touched,
    ) -> Result<(), CommandFailure> {
        let slot = self
            .group_slot(group_id)
            .ok_or(LayoutNoopReason::GroupNotFound { group_id })?;
        let reordered = self
            .area_mut(slot)
            .find_group_mut(group_id)
            .is_some_and(|group| group.reorder(tab_id, index));
        if !reordered {
            return Err(LayoutNoopReason::TabNotInGroup {
                group_id,
                tab_id: tab_id.clone(),
            }
            .into());
        }
        touched.insert(group_id);
        Ok(())
    }
}
