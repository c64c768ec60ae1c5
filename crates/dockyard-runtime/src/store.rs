//! The workspace store: single owner of layout, drag, and selection state.
//!
//! Every layout change goes through [`WorkspaceStore::dispatch`], which
//! applies one [`LayoutCommand`] atomically and bumps [`revision`] when the
//! layout actually changed. The named command methods (`open_tab`,
//! `close_tab`, ...) are thin wrappers over `dispatch`.
//!
//! Pointer interactions enter through three doors: a press on a tab
//! ([`tab_pointer_down`]), a press on a resize strip ([`begin_area_resize`],
//! [`begin_split_resize`]), and the window-level move/up stream
//! ([`handle_pointer`]). A live interaction holds global listeners and a
//! cursor override in the store; both are released when it ends, when it is
//! canceled, and on [`teardown_interactions`].
//!
//! [`revision`]: WorkspaceStore::revision
//! [`tab_pointer_down`]: WorkspaceStore::tab_pointer_down
//! [`begin_area_resize`]: WorkspaceStore::begin_area_resize
//! [`begin_split_resize`]: WorkspaceStore::begin_split_resize
//! [`handle_pointer`]: WorkspaceStore::handle_pointer
//! [`teardown_interactions`]: WorkspaceStore::teardown_interactions

use std::path::{Path, PathBuf};

use dockyard_core::{Point, PointerButton, PointerEvent, PointerEventKind, Rect};
use dockyard_layout::{
    DockArea, DockLayout, DockRects, DockSlot, DropPosition, LayoutCommand, LayoutError,
    LayoutOutcome, NodeId, Tab, TabId, WorkspaceLayout, default_layout,
};

use crate::config::{ConfigError, WorkspaceConfig};
use crate::drag::{
    DragSource, DragState, DropTarget, TabDragEffect, TabDragMachine, TabDragNoopReason,
};
use crate::interaction::{
    CursorOverrides, CursorStyle, GlobalListener, InteractionOwner, ListenerRegistry,
};
use crate::persistence::{PersistenceError, layout_path, load_layout, save_layout};
use crate::resize::{AreaResizer, ResizeSession, ResizeTarget, SplitResizer};
use crate::selection::SelectedEntity;

/// Why the store started from the default layout.
#[derive(Debug)]
pub enum FallbackReason {
    NoSavedLayout,
    LoadFailed(PersistenceError),
}

/// How [`WorkspaceStore::open`] obtained its layout.
#[derive(Debug)]
pub enum LoadOutcome {
    Restored { path: PathBuf },
    Defaulted { reason: FallbackReason },
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_restored(&self) -> bool {
        matches!(self, Self::Restored { .. })
    }
}

/// What a window-level pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    Drag {
        effect: TabDragEffect,
        /// Command issued for the effect (drop, click activation).
        outcome: Option<LayoutOutcome>,
    },
    Resize {
        target: ResizeTarget,
        outcome: LayoutOutcome,
        /// The pointer was released and the session is over.
        finished: bool,
    },
    /// No interaction is listening for this event.
    Ignored,
}

/// Single owner of all workspace state.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    config: WorkspaceConfig,
    layout: DockLayout,
    drag: DragState,
    gesture: TabDragMachine,
    resize: Option<ResizeSession>,
    selection: Option<SelectedEntity>,
    listeners: ListenerRegistry,
    cursors: CursorOverrides,
    revision: u64,
    project_dir: Option<PathBuf>,
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self {
            config: WorkspaceConfig::default(),
            layout: default_layout(),
            drag: DragState::default(),
            gesture: TabDragMachine::default(),
            resize: None,
            selection: None,
            listeners: ListenerRegistry::new(),
            cursors: CursorOverrides::default(),
            revision: 0,
            project_dir: None,
        }
    }
}

impl WorkspaceStore {
    /// A store with the default layout and no project directory.
    pub fn new(config: WorkspaceConfig) -> Result<Self, ConfigError> {
        Self::from_layout(default_layout(), config)
    }

    pub fn from_layout(layout: DockLayout, config: WorkspaceConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let gesture = TabDragMachine::from_config(&config)
            .map_err(|err| ConfigError::Validation(vec![err.to_string()]))?;
        Ok(Self {
            config,
            layout,
            gesture,
            ..Self::default()
        })
    }

    /// Open the workspace for `project_dir`, restoring its saved layout.
    ///
    /// A missing, unreadable, or invalid layout file is not an error: the
    /// store starts from the default layout and says why in the outcome.
    pub fn open(
        project_dir: impl AsRef<Path>,
        config: WorkspaceConfig,
    ) -> Result<(Self, LoadOutcome), ConfigError> {
        let project_dir = project_dir.as_ref();
        let config = config.validated()?;
        let path = layout_path(project_dir, &config.layout_file_name);
        let (layout, outcome) = match load_layout(&path) {
            Ok(Some(layout)) => {
                tracing::info!(
                    target: "dockyard.store",
                    path = %path.display(),
                    tabs = layout.tab_count(),
                    "workspace layout restored"
                );
                (layout, LoadOutcome::Restored { path })
            }
            Ok(None) => {
                tracing::info!(
                    target: "dockyard.store",
                    path = %path.display(),
                    "no saved layout; using default"
                );
                (
                    default_layout(),
                    LoadOutcome::Defaulted {
                        reason: FallbackReason::NoSavedLayout,
                    },
                )
            }
            Err(err) => {
                tracing::warn!(
                    target: "dockyard.store",
                    path = %path.display(),
                    error = %err,
                    "saved layout unusable; falling back to default"
                );
                (
                    default_layout(),
                    LoadOutcome::Defaulted {
                        reason: FallbackReason::LoadFailed(err),
                    },
                )
            }
        };
        let mut store = Self::from_layout(layout, config)?;
        store.project_dir = Some(project_dir.to_path_buf());
        Ok((store, outcome))
    }

    /// Write the layout into the open project directory.
    pub fn save(&self) -> Result<PathBuf, PersistenceError> {
        let dir = self
            .project_dir
            .as_deref()
            .ok_or(PersistenceError::NoProjectDirectory)?;
        self.save_to(dir)
    }

    /// Write the layout into `project_dir`.
    pub fn save_to(&self, project_dir: &Path) -> Result<PathBuf, PersistenceError> {
        let path = layout_path(project_dir, &self.config.layout_file_name);
        save_layout(&self.layout, &path)?;
        tracing::info!(
            target: "dockyard.store",
            path = %path.display(),
            revision = self.revision,
            "workspace layout saved"
        );
        Ok(path)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    #[must_use]
    pub const fn layout(&self) -> &DockLayout {
        &self.layout
    }

    #[must_use]
    pub fn areas(&self) -> &[DockArea; 4] {
        self.layout.areas()
    }

    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        &self.drag
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&SelectedEntity> {
        self.selection.as_ref()
    }

    /// Bumped on every layout change; renderers compare it to re-render.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    #[must_use]
    pub fn project_dir(&self) -> Option<&Path> {
        self.project_dir.as_deref()
    }

    #[must_use]
    pub const fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Window cursor override, if an interaction set one.
    #[must_use]
    pub fn cursor(&self) -> Option<CursorStyle> {
        self.cursors.current()
    }

    #[must_use]
    pub const fn gesture(&self) -> &TabDragMachine {
        &self.gesture
    }

    #[must_use]
    pub const fn active_resize(&self) -> Option<&ResizeSession> {
        self.resize.as_ref()
    }

    /// Drop zone to highlight while dragging.
    #[must_use]
    pub fn hovered_drop_target(&self) -> Option<&DropTarget> {
        self.gesture.hovered()
    }

    /// Snapshot for persistence.
    #[must_use]
    pub fn serialize_layout(&self) -> WorkspaceLayout {
        self.layout.to_snapshot()
    }

    /// Solve rectangles with the configured strip thicknesses.
    #[must_use]
    pub fn solve(&self, viewport: Rect) -> DockRects {
        self.layout.solve_layout(viewport, self.config.metrics())
    }

    // ---------------------------------------------------------------------
    // Layout commands
    // ---------------------------------------------------------------------

    /// Apply one layout command. The only way the layout changes.
    pub fn dispatch(&mut self, command: LayoutCommand) -> Result<LayoutOutcome, LayoutError> {
        let kind = command.kind();
        match self.layout.apply(command) {
            Ok(outcome) => {
                match &outcome {
                    LayoutOutcome::Applied { touched, .. } => {
                        self.revision = self.revision.saturating_add(1);
                        tracing::debug!(
                            target: "dockyard.store",
                            command = %kind,
                            touched = touched.len(),
                            revision = self.revision,
                            "layout command applied"
                        );
                        self.reconcile_interactions();
                    }
                    LayoutOutcome::Noop { reason, .. } => {
                        tracing::debug!(
                            target: "dockyard.store",
                            command = %kind,
                            reason = %reason,
                            "layout command was a no-op"
                        );
                    }
                }
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(
                    target: "dockyard.store",
                    command = %kind,
                    error = %err,
                    "layout command rejected"
                );
                Err(err)
            }
        }
    }

    pub fn open_tab(&mut self, tab: Tab, slot: DockSlot) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::OpenTab { tab, slot })
    }

    pub fn close_tab(&mut self, tab_id: &TabId) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::CloseTab {
            tab_id: tab_id.clone(),
        })
    }

    pub fn set_active_tab(
        &mut self,
        group_id: NodeId,
        tab_id: &TabId,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::SetActiveTab {
            group_id,
            tab_id: tab_id.clone(),
        })
    }

    pub fn mark_tab_dirty(
        &mut self,
        tab_id: &TabId,
        dirty: bool,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::MarkTabDirty {
            tab_id: tab_id.clone(),
            dirty,
        })
    }

    pub fn reorder_tab(
        &mut self,
        group_id: NodeId,
        tab_id: &TabId,
        index: usize,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::ReorderTab {
            group_id,
            tab_id: tab_id.clone(),
            index,
        })
    }

    pub fn drop_tab(
        &mut self,
        tab_id: &TabId,
        target_group: NodeId,
        position: DropPosition,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::DropTab {
            tab_id: tab_id.clone(),
            target_group,
            position,
        })
    }

    pub fn set_split_ratio(
        &mut self,
        split_id: NodeId,
        ratio: f64,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::SetSplitRatio { split_id, ratio })
    }

    pub fn set_area_size(
        &mut self,
        slot: DockSlot,
        size: f64,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::SetAreaSize { slot, size })
    }

    pub fn set_area_visible(
        &mut self,
        slot: DockSlot,
        visible: bool,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::SetAreaVisible { slot, visible })
    }

    pub fn toggle_area_visible(&mut self, slot: DockSlot) -> Result<LayoutOutcome, LayoutError> {
        self.dispatch(LayoutCommand::ToggleAreaVisible { slot })
    }

    /// Replace every area with the default layout.
    pub fn reset_layout(&mut self) -> Result<LayoutOutcome, LayoutError> {
        tracing::info!(target: "dockyard.store", "resetting workspace layout");
        self.dispatch(LayoutCommand::ResetLayout)
    }

    // ---------------------------------------------------------------------
    // Drag state
    // ---------------------------------------------------------------------

    pub fn start_drag(&mut self, tab: Tab, source_group_id: NodeId) {
        tracing::debug!(
            target: "dockyard.store",
            tab = %tab.id,
            source_group = %source_group_id,
            "drag started"
        );
        self.drag = DragState::begin(tab, source_group_id, self.drag.position());
    }

    /// Move the floating preview. Ignored when no drag is live.
    pub fn update_drag_pos(&mut self, x: f64, y: f64) {
        if self.drag.is_dragging {
            self.drag.x = x;
            self.drag.y = y;
        }
    }

    pub fn end_drag(&mut self) {
        if self.drag.is_dragging {
            tracing::debug!(target: "dockyard.store", "drag ended");
        }
        self.drag = DragState::default();
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn select(&mut self, entity: SelectedEntity) {
        self.selection = Some(entity);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ---------------------------------------------------------------------
    // Pointer interactions
    // ---------------------------------------------------------------------

    /// Press on a tab in a tab bar.
    pub fn tab_pointer_down(
        &mut self,
        tab_id: &TabId,
        button: PointerButton,
        at: Point,
    ) -> Result<TabDragEffect, LayoutError> {
        let Some(location) = self.layout.locate_tab(tab_id) else {
            return Ok(TabDragEffect::Noop {
                reason: TabDragNoopReason::UnknownTab,
            });
        };
        if self.resize.is_some() && button == PointerButton::Primary {
            return Ok(TabDragEffect::Noop {
                reason: TabDragNoopReason::ActiveDragAlreadyInProgress,
            });
        }
        let source = DragSource {
            tab_id: tab_id.clone(),
            group_id: location.group_id,
        };
        let effect = self.gesture.pointer_down(source, button, at);
        match &effect {
            TabDragEffect::Armed { .. } => {
                self.listeners.register_pointer_pair(InteractionOwner::TabDrag);
            }
            TabDragEffect::CloseRequested { source } => {
                self.close_tab(&source.tab_id)?;
            }
            _ => {}
        }
        Ok(effect)
    }

    /// Press on the strip between `slot` and the center.
    ///
    /// Returns `false` when another interaction is live or the area cannot
    /// be resized.
    pub fn begin_area_resize(&mut self, slot: DockSlot, at: Point) -> bool {
        if self.interaction_active() {
            return false;
        }
        let Some(resizer) = AreaResizer::begin(&self.layout, slot, at) else {
            return false;
        };
        self.begin_resize(ResizeSession::Area(resizer));
        true
    }

    /// Press on a split handle; the container extent is measured from `rects`.
    pub fn begin_split_resize(&mut self, split_id: NodeId, at: Point, rects: &DockRects) -> bool {
        if self.interaction_active() {
            return false;
        }
        let Some(resizer) = SplitResizer::begin(&self.layout, rects, split_id, at) else {
            return false;
        };
        self.begin_resize(ResizeSession::Split(resizer));
        true
    }

    /// Window-level pointer event, routed to the live interaction.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        rects: &DockRects,
    ) -> Result<InteractionEffect, LayoutError> {
        let listener = match event.kind {
            PointerEventKind::Move => GlobalListener::PointerMove,
            PointerEventKind::Up(_) => GlobalListener::PointerUp,
            PointerEventKind::Down(_) => return Ok(InteractionEffect::Ignored),
        };
        if !self.listeners.wants(listener) {
            return Ok(InteractionEffect::Ignored);
        }
        let at = event.position;

        if let Some(session) = self.resize {
            let finished = listener == GlobalListener::PointerUp;
            if finished {
                self.end_resize();
            }
            let outcome = self.dispatch(session.command_at(at))?;
            return Ok(InteractionEffect::Resize {
                target: session.target(),
                outcome,
                finished,
            });
        }

        if listener == GlobalListener::PointerMove {
            let effect = self.gesture.pointer_move(at, &self.layout, rects);
            match &effect {
                TabDragEffect::DragStarted { source, .. } => {
                    if let Some(tab) = self.layout.tab(&source.tab_id).cloned() {
                        self.start_drag(tab, source.group_id);
                        self.cursors
                            .push(InteractionOwner::TabDrag, CursorStyle::Grabbing);
                    }
                    self.update_drag_pos(at.x, at.y);
                }
                TabDragEffect::Hovered { .. } => self.update_drag_pos(at.x, at.y),
                _ => {}
            }
            return Ok(InteractionEffect::Drag {
                effect,
                outcome: None,
            });
        }

        let effect = self.gesture.pointer_up(at, &self.layout, rects);
        self.release(InteractionOwner::TabDrag);
        self.end_drag();
        let outcome = match &effect {
            TabDragEffect::Dropped { source, target } => {
                Some(self.drop_tab(&source.tab_id, target.group_id, target.position)?)
            }
            TabDragEffect::Clicked { source } => {
                Some(self.set_active_tab(source.group_id, &source.tab_id)?)
            }
            _ => None,
        };
        Ok(InteractionEffect::Drag { effect, outcome })
    }

    /// Abort the live interaction without committing it (Escape, blur).
    pub fn cancel_interaction(&mut self) -> bool {
        if let Some(session) = self.resize {
            tracing::debug!(
                target: "dockyard.store",
                owner = ?session.owner(),
                "resize canceled"
            );
            self.end_resize();
            return true;
        }
        if self.gesture.force_cancel().is_some() {
            self.release(InteractionOwner::TabDrag);
            self.end_drag();
            return true;
        }
        false
    }

    /// Drop every live interaction, listener, and cursor override.
    ///
    /// Call when the view owning the store goes away mid-gesture. Returns
    /// how many listeners were still registered.
    pub fn teardown_interactions(&mut self) -> usize {
        self.gesture.force_cancel();
        self.resize = None;
        self.end_drag();
        self.cursors.clear();
        let released = self.listeners.clear();
        if released > 0 {
            tracing::debug!(
                target: "dockyard.store",
                released,
                "interaction listeners torn down"
            );
        }
        released
    }

    fn interaction_active(&self) -> bool {
        self.resize.is_some() || self.gesture.is_active()
    }

    fn begin_resize(&mut self, session: ResizeSession) {
        let owner = session.owner();
        self.listeners.register_pointer_pair(owner);
        self.cursors.push(owner, session.cursor());
        self.resize = Some(session);
        tracing::debug!(target: "dockyard.store", owner = ?owner, "resize started");
    }

    fn end_resize(&mut self) {
        if let Some(session) = self.resize.take() {
            self.release(session.owner());
        }
    }

    fn release(&mut self, owner: InteractionOwner) {
        self.listeners.release_owner(owner);
        self.cursors.release(owner);
    }

    /// End interactions whose subject a command just removed or moved.
    fn reconcile_interactions(&mut self) {
        // A dragged tab that closed or left its source group ends the gesture.
        if let Some(source) = self.gesture.source()
            && self
                .layout
                .locate_tab(&source.tab_id)
                .is_none_or(|location| location.group_id != source.group_id)
        {
            self.gesture.force_cancel();
            self.release(InteractionOwner::TabDrag);
            self.end_drag();
        }
        let stale_resize = match &self.resize {
            Some(ResizeSession::Split(resizer)) => {
                self.layout.find_split(resizer.split_id()).is_none()
            }
            Some(ResizeSession::Area(resizer)) => !self.layout.area(resizer.slot()).visible,
            None => false,
        };
        if stale_resize {
            self.end_resize();
        }
    }
}
