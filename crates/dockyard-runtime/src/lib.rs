#![forbid(unsafe_code)]

//! Runtime: the workspace store and the pointer controllers that feed it.
//!
//! # Role in Dockyard
//! `dockyard-runtime` is the single owner of workspace state. The
//! [`WorkspaceStore`] holds the [`DockLayout`](dockyard_layout::DockLayout),
//! the live [`DragState`], and the inspector [`SelectedEntity`], and is the
//! only place a layout command is applied.
//!
//! # How it fits in the system
//! Host adapters translate platform input into
//! [`dockyard_core::PointerEvent`]s. Tab presses go to
//! [`WorkspaceStore::tab_pointer_down`], splitter and area-edge presses to
//! [`WorkspaceStore::begin_split_resize`] / [`WorkspaceStore::begin_area_resize`],
//! and the global move/up stream to [`WorkspaceStore::handle_pointer`]. The
//! controllers turn those into [`LayoutCommand`](dockyard_layout::LayoutCommand)s;
//! renderers read the store and re-render when [`WorkspaceStore::revision`]
//! moves.

pub mod config;
pub mod drag;
pub mod interaction;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod persistence;
pub mod resize;
pub mod selection;
pub mod store;

pub use config::{ConfigError, WorkspaceConfig};
pub use drag::{
    DragSource, DragState, DropTarget, TabDragCancelReason, TabDragEffect, TabDragMachine,
    TabDragMachineError, TabDragNoopReason, TabDragState, resolve_drop_target,
};
pub use interaction::{
    CursorOverrides, CursorStyle, GlobalListener, InteractionOwner, ListenerId, ListenerRegistry,
};
pub use persistence::{PersistenceError, layout_path, load_layout, save_layout};
pub use resize::{AreaResizer, ResizeSession, ResizeTarget, SplitResizer};
pub use selection::SelectedEntity;
pub use store::{FallbackReason, InteractionEffect, LoadOutcome, WorkspaceStore};
