//! Tab drag-and-drop gesture controller.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!    \------> Idle (click: released before the threshold)
//! ```
//!
//! A primary press on a tab only arms the machine; the drag starts once the
//! pointer has moved more than the threshold on either axis, so a plain click
//! still activates the tab. While dragging, every move re-resolves the hovered
//! drop target with [`resolve_drop_target`], and the release resolves it once
//! more with the same function, so the zone that was highlighted is the zone
//! that is committed. A middle press asks for the tab to be closed and never
//! enters the machine.
//!
//! The machine emits [`TabDragEffect`]s and never touches the layout itself;
//! [`WorkspaceStore`](crate::store::WorkspaceStore) turns effects into commands.

use dockyard_core::{Point, PointerButton, Rect};
use dockyard_layout::dock_zone::resolve_among;
use dockyard_layout::{
    DockLayout, DockRects, DropPosition, DropZoneGeometry, NodeId, Tab, TabId, drop_preview_rect,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WorkspaceConfig;

/// Live drag shared with every group that renders drop zones.
///
/// Written only by the store in response to drag effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub is_dragging: bool,
    pub tab: Option<Tab>,
    pub source_group_id: Option<NodeId>,
    /// Live cursor position, for the floating preview.
    pub x: f64,
    pub y: f64,
}

impl DragState {
    #[must_use]
    pub fn begin(tab: Tab, source_group_id: NodeId, at: Point) -> Self {
        Self {
            is_dragging: true,
            tab: Some(tab),
            source_group_id: Some(source_group_id),
            x: at.x,
            y: at.y,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Tab and group being dragged, when a drag is live.
    #[must_use]
    pub fn source(&self) -> Option<DragSource> {
        match (self.is_dragging, &self.tab, self.source_group_id) {
            (true, Some(tab), Some(group_id)) => Some(DragSource {
                tab_id: tab.id.clone(),
                group_id,
            }),
            _ => None,
        }
    }
}

/// The tab a gesture started on and the group it was in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragSource {
    pub tab_id: TabId,
    pub group_id: NodeId,
}

/// A resolved drop: target group, zone, and the ghost rectangle to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub group_id: NodeId,
    pub position: DropPosition,
    pub preview: Rect,
}

/// Resolve the drop target under `point` for a drag from `source`.
///
/// Every group offers all five zones, except the source group: it offers
/// nothing when the dragged tab is its only tab, and only the directional
/// zones otherwise (merging a tab into the group it already lives in does
/// nothing).
#[must_use]
pub fn resolve_drop_target(
    layout: &DockLayout,
    rects: &DockRects,
    point: Point,
    geometry: DropZoneGeometry,
    source: &DragSource,
) -> Option<DropTarget> {
    let group_id = rects.group_at(point)?;
    let rect = rects.group(group_id)?;
    let offered: &[DropPosition] = if group_id == source.group_id {
        let sole_tab = layout
            .find_group(group_id)
            .is_none_or(|group| group.tabs.len() <= 1);
        if sole_tab {
            return None;
        }
        &DropPosition::DIRECTIONAL
    } else {
        &DropPosition::Z_ORDER
    };
    let position = resolve_among(rect, point, geometry, offered)?;
    Some(DropTarget {
        group_id,
        position,
        preview: drop_preview_rect(rect, position),
    })
}

/// Gesture lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TabDragState {
    Idle,
    Armed {
        source: DragSource,
        origin: Point,
        current: Point,
    },
    Dragging {
        source: DragSource,
        origin: Point,
        current: Point,
        hovered: Option<DropTarget>,
    },
}

/// Explicit no-op diagnostics for events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabDragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    ThresholdNotReached,
    UnsupportedButton,
    /// The pressed tab is not in the layout.
    UnknownTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabDragCancelReason {
    /// Released over no drop zone; the tab stays where it was.
    NoDropZone,
    /// Torn down from outside (unmount, project closed).
    Programmatic,
}

/// Effect emitted by one gesture step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TabDragEffect {
    Armed {
        source: DragSource,
        origin: Point,
    },
    DragStarted {
        source: DragSource,
        origin: Point,
        current: Point,
        hovered: Option<DropTarget>,
    },
    Hovered {
        current: Point,
        target: Option<DropTarget>,
    },
    Dropped {
        source: DragSource,
        target: DropTarget,
    },
    /// Released before the threshold: a click on the tab.
    Clicked {
        source: DragSource,
    },
    Canceled {
        source: Option<DragSource>,
        reason: TabDragCancelReason,
    },
    CloseRequested {
        source: DragSource,
    },
    Noop {
        reason: TabDragNoopReason,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabDragMachineError {
    #[error("drag threshold must be finite and > 0 (got {threshold})")]
    InvalidDragThreshold { threshold: f64 },
    #[error("invalid drop-zone geometry: {0}")]
    InvalidGeometry(String),
}

/// Runtime lifecycle machine for tab drag-and-drop.
#[derive(Debug, Clone, PartialEq)]
pub struct TabDragMachine {
    state: TabDragState,
    threshold: f64,
    geometry: DropZoneGeometry,
}

impl Default for TabDragMachine {
    fn default() -> Self {
        Self {
            state: TabDragState::Idle,
            threshold: crate::config::DEFAULT_DRAG_THRESHOLD,
            geometry: DropZoneGeometry::default(),
        }
    }
}

impl TabDragMachine {
    pub fn new(threshold: f64, geometry: DropZoneGeometry) -> Result<Self, TabDragMachineError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(TabDragMachineError::InvalidDragThreshold { threshold });
        }
        geometry
            .validate()
            .map_err(TabDragMachineError::InvalidGeometry)?;
        Ok(Self {
            state: TabDragState::Idle,
            threshold,
            geometry,
        })
    }

    pub fn from_config(config: &WorkspaceConfig) -> Result<Self, TabDragMachineError> {
        Self::new(config.drag_threshold, config.drop_zones)
    }

    #[must_use]
    pub const fn state(&self) -> &TabDragState {
        &self.state
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub const fn geometry(&self) -> DropZoneGeometry {
        self.geometry
    }

    /// Whether the machine is Armed or Dragging.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, TabDragState::Idle)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, TabDragState::Dragging { .. })
    }

    /// Tab the live gesture started on.
    #[must_use]
    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            TabDragState::Idle => None,
            TabDragState::Armed { source, .. } | TabDragState::Dragging { source, .. } => {
                Some(source)
            }
        }
    }

    /// Drop target currently highlighted, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&DropTarget> {
        match &self.state {
            TabDragState::Dragging { hovered, .. } => hovered.as_ref(),
            _ => None,
        }
    }

    /// Press on the tab described by `source`.
    pub fn pointer_down(
        &mut self,
        source: DragSource,
        button: PointerButton,
        at: Point,
    ) -> TabDragEffect {
        match (button, &self.state) {
            (PointerButton::Middle, _) => TabDragEffect::CloseRequested { source },
            (PointerButton::Primary, TabDragState::Idle) => {
                self.state = TabDragState::Armed {
                    source: source.clone(),
                    origin: at,
                    current: at,
                };
                TabDragEffect::Armed { source, origin: at }
            }
            (PointerButton::Primary, _) => TabDragEffect::Noop {
                reason: TabDragNoopReason::ActiveDragAlreadyInProgress,
            },
            (PointerButton::Secondary, _) => TabDragEffect::Noop {
                reason: TabDragNoopReason::UnsupportedButton,
            },
        }
    }

    /// Window-level pointer move.
    pub fn pointer_move(
        &mut self,
        at: Point,
        layout: &DockLayout,
        rects: &DockRects,
    ) -> TabDragEffect {
        match &self.state {
            TabDragState::Idle => TabDragEffect::Noop {
                reason: TabDragNoopReason::IdleWithoutActiveDrag,
            },
            TabDragState::Armed { source, origin, .. } => {
                let (source, origin) = (source.clone(), *origin);
                if !crossed_drag_threshold(origin, at, self.threshold) {
                    self.state = TabDragState::Armed {
                        source,
                        origin,
                        current: at,
                    };
                    return TabDragEffect::Noop {
                        reason: TabDragNoopReason::ThresholdNotReached,
                    };
                }
                let hovered = resolve_drop_target(layout, rects, at, self.geometry, &source);
                self.state = TabDragState::Dragging {
                    source: source.clone(),
                    origin,
                    current: at,
                    hovered,
                };
                TabDragEffect::DragStarted {
                    source,
                    origin,
                    current: at,
                    hovered,
                }
            }
            TabDragState::Dragging { source, origin, .. } => {
                let (source, origin) = (source.clone(), *origin);
                let target = resolve_drop_target(layout, rects, at, self.geometry, &source);
                self.state = TabDragState::Dragging {
                    source,
                    origin,
                    current: at,
                    hovered: target,
                };
                TabDragEffect::Hovered {
                    current: at,
                    target,
                }
            }
        }
    }

    /// Window-level release. Always returns the machine to Idle.
    pub fn pointer_up(&mut self, at: Point, layout: &DockLayout, rects: &DockRects) -> TabDragEffect {
        match std::mem::replace(&mut self.state, TabDragState::Idle) {
            TabDragState::Idle => TabDragEffect::Noop {
                reason: TabDragNoopReason::IdleWithoutActiveDrag,
            },
            TabDragState::Armed { source, .. } => TabDragEffect::Clicked { source },
            TabDragState::Dragging { source, .. } => {
                match resolve_drop_target(layout, rects, at, self.geometry, &source) {
                    Some(target) => TabDragEffect::Dropped { source, target },
                    None => TabDragEffect::Canceled {
                        source: Some(source),
                        reason: TabDragCancelReason::NoDropZone,
                    },
                }
            }
        }
    }

    /// Unconditionally reset to Idle.
    ///
    /// Returns a `Canceled` effect if a gesture was live, `None` otherwise.
    pub fn force_cancel(&mut self) -> Option<TabDragEffect> {
        match std::mem::replace(&mut self.state, TabDragState::Idle) {
            TabDragState::Idle => None,
            TabDragState::Armed { source, .. } | TabDragState::Dragging { source, .. } => {
                Some(TabDragEffect::Canceled {
                    source: Some(source),
                    reason: TabDragCancelReason::Programmatic,
                })
            }
        }
    }
}

fn crossed_drag_threshold(origin: Point, current: Point, threshold: f64) -> bool {
    let (dx, dy) = current.delta_from(origin);
    dx.abs() > threshold || dy.abs() > threshold
}
