//! Global listener and cursor bookkeeping for pointer interactions.
//!
//! A drag or resize session listens to pointer moves and releases anywhere in
//! the window, not only over the element that was pressed. Each session
//! registers those listeners here under its [`InteractionOwner`] and must
//! release them when it ends, is canceled, or the store is torn down, so
//! nothing keeps routing events to a finished session.

use std::collections::BTreeMap;
use std::fmt;

use dockyard_layout::{DockSlot, NodeId};
use serde::{Deserialize, Serialize};

/// Handle to one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Window-level event a session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalListener {
    PointerMove,
    PointerUp,
}

/// Which interaction holds a listener or cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner", rename_all = "snake_case")]
pub enum InteractionOwner {
    TabDrag,
    AreaResize { slot: DockSlot },
    SplitResize { split_id: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Registration {
    owner: InteractionOwner,
    listener: GlobalListener,
}

/// Live global listeners, keyed by registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerRegistry {
    next_id: u64,
    active: BTreeMap<ListenerId, Registration>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, owner: InteractionOwner, listener: GlobalListener) -> ListenerId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ListenerId(self.next_id);
        self.active.insert(id, Registration { owner, listener });
        id
    }

    /// Register the move/up pair every pointer session needs.
    pub fn register_pointer_pair(&mut self, owner: InteractionOwner) -> [ListenerId; 2] {
        [
            self.register(owner, GlobalListener::PointerMove),
            self.register(owner, GlobalListener::PointerUp),
        ]
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.active.remove(&id).is_some()
    }

    /// Remove every listener held by `owner`; returns how many were removed.
    pub fn release_owner(&mut self, owner: InteractionOwner) -> usize {
        let before = self.active.len();
        self.active.retain(|_, registration| registration.owner != owner);
        before - self.active.len()
    }

    /// Remove everything; returns how many listeners were live.
    pub fn clear(&mut self) -> usize {
        let count = self.active.len();
        self.active.clear();
        count
    }

    #[must_use]
    pub fn holds(&self, owner: InteractionOwner) -> bool {
        self.active
            .values()
            .any(|registration| registration.owner == owner)
    }

    /// Whether anyone is listening for `listener` events.
    #[must_use]
    pub fn wants(&self, listener: GlobalListener) -> bool {
        self.active
            .values()
            .any(|registration| registration.listener == listener)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ListenerId, InteractionOwner, GlobalListener)> + '_ {
        self.active
            .iter()
            .map(|(id, registration)| (*id, registration.owner, registration.listener))
    }
}

/// Cursor shape forced on the whole window during an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    ColResize,
    RowResize,
    Grabbing,
}

impl CursorStyle {
    /// CSS `cursor` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::ColResize => "col-resize",
            Self::RowResize => "row-resize",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Stack of cursor overrides; the most recent one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorOverrides {
    stack: Vec<(InteractionOwner, CursorStyle)>,
}

impl CursorOverrides {
    pub fn push(&mut self, owner: InteractionOwner, cursor: CursorStyle) {
        self.stack.push((owner, cursor));
    }

    /// Drop `owner`'s overrides; returns whether any were present.
    pub fn release(&mut self, owner: InteractionOwner) -> bool {
        let before = self.stack.len();
        self.stack.retain(|(held_by, _)| *held_by != owner);
        before != self.stack.len()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Cursor to show now; `None` restores the element's own cursor.
    #[must_use]
    pub fn current(&self) -> Option<CursorStyle> {
        self.stack.last().map(|(_, cursor)| *cursor)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT: InteractionOwner = InteractionOwner::SplitResize {
        split_id: NodeId::MIN,
    };

    #[test]
    fn release_owner_only_touches_that_owner() {
        let mut registry = ListenerRegistry::new();
        let [moved, up] = registry.register_pointer_pair(InteractionOwner::TabDrag);
        registry.register_pointer_pair(SPLIT);
        assert_ne!(moved, up);
        assert_eq!(registry.len(), 4);

        assert_eq!(registry.release_owner(InteractionOwner::TabDrag), 2);
        assert!(!registry.holds(InteractionOwner::TabDrag));
        assert!(registry.holds(SPLIT));
        assert!(registry.wants(GlobalListener::PointerUp));
        assert!(!registry.remove(moved));
        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = ListenerRegistry::new();
        let first = registry.register(SPLIT, GlobalListener::PointerMove);
        registry.remove(first);
        let second = registry.register(SPLIT, GlobalListener::PointerMove);
        assert!(second > first);
    }

    #[test]
    fn cursor_stack_restores_previous() {
        let mut cursors = CursorOverrides::default();
        assert_eq!(cursors.current(), None);
        cursors.push(InteractionOwner::TabDrag, CursorStyle::Grabbing);
        cursors.push(SPLIT, CursorStyle::RowResize);
        assert_eq!(cursors.current().map(CursorStyle::as_css), Some("row-resize"));
        assert!(cursors.release(SPLIT));
        assert_eq!(cursors.current(), Some(CursorStyle::Grabbing));
        assert!(!cursors.release(SPLIT));
    }
}
