#![forbid(unsafe_code)]

//! Dock layout engine.
//!
//! # Role in Dockyard
//! `dockyard-layout` owns the docked content model: four fixed
//! [`DockArea`]s, each holding an optional binary tree of [`Split`]s and
//! [`TabGroup`]s. All mutation goes through [`LayoutCommand`] values applied
//! by [`DockLayout::apply`], which commits atomically and keeps every tree
//! minimal (no empty group survives as a split child).
//!
//! # How it fits in the system
//! `dockyard-runtime` turns pointer gestures into commands using
//! [`resolve_drop_position`] and the rectangles from
//! [`DockLayout::solve_layout`], and persists [`WorkspaceLayout`] snapshots.
//! Renderers read the tree and never mutate it.

pub mod area;
pub mod command;
pub mod defaults;
pub mod dock;
pub mod dock_zone;
pub mod invariants;
pub mod snapshot;
pub mod solve;
pub mod tree;

pub use area::{AreaSizeBounds, DockArea, DockSlot, find_area};
pub use command::{
    LayoutCommand, LayoutCommandKind, LayoutError, LayoutFailure, LayoutNoopReason,
    LayoutOutcome, reduce,
};
pub use defaults::default_layout;
pub use dock::{DockLayout, TabLocation};
pub use dock_zone::{DropPosition, DropZoneGeometry, drop_preview_rect, resolve_drop_position};
pub use invariants::{
    LayoutInvariantCode, LayoutInvariantIssue, LayoutInvariantReport, LayoutInvariantSeverity,
};
pub use snapshot::{
    DockAreaRecord, LayoutMigrationError, LayoutNodeRecord, LayoutRecordError,
    LayoutValidationError, MigrationResult, WORKSPACE_LAYOUT_VERSION, WorkspaceLayout,
    migrate_layout, needs_migration,
};
pub use solve::{DockRects, LayoutMetrics, SplitRect};
pub use tree::{
    ContentType, LayoutModelError, LayoutNode, NodeId, Split, SplitDirection, Tab, TabGroup,
    TabId, clamp_ratio, find_group, flatten_tabs,
};
