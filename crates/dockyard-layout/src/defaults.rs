//! The hard-coded layout a fresh (or reset) workspace starts from.

use crate::area::{DockArea, DockSlot};
use crate::dock::DockLayout;
use crate::tree::{LayoutNode, NodeId, Tab, TabGroup, TabId};

pub const DEFAULT_LEFT_SIZE: f64 = 260.0;
pub const DEFAULT_RIGHT_SIZE: f64 = 320.0;
pub const DEFAULT_BOTTOM_SIZE: f64 = 220.0;

const LEFT_GROUP: NodeId = NodeId::MIN;
const CENTER_GROUP: NodeId = LEFT_GROUP.saturating_next();
const RIGHT_GROUP: NodeId = CENTER_GROUP.saturating_next();
const BOTTOM_GROUP: NodeId = RIGHT_GROUP.saturating_next();
const FIRST_FREE_ID: NodeId = BOTTOM_GROUP.saturating_next();

/// Default workspace: explorer on the left, the field graph in the center,
/// the inspector on the right, logs and cluster status at the bottom.
#[must_use]
pub fn default_layout() -> DockLayout {
    let mut bottom = TabGroup::with_tab(BOTTOM_GROUP, Tab::new("logs", "Logs", "logs"));
    bottom.tabs.push(Tab::new("cluster", "Cluster", "deploy"));
    bottom.active_tab_id = Some(TabId::from("logs"));

    let areas = [
        DockArea::empty(DockSlot::Left, DEFAULT_LEFT_SIZE, true).with_root(group(
            LEFT_GROUP,
            Tab::new("explorer", "Explorer", "file_tree"),
        )),
        DockArea::empty(DockSlot::Center, 0.0, true).with_root(group(
            CENTER_GROUP,
            Tab::new("graph", "Field Graph", "graph").with_graph_id("main"),
        )),
        DockArea::empty(DockSlot::Right, DEFAULT_RIGHT_SIZE, true).with_root(group(
            RIGHT_GROUP,
            Tab::new("inspector", "Inspector", "inspector"),
        )),
        DockArea::empty(DockSlot::Bottom, DEFAULT_BOTTOM_SIZE, true)
            .with_root(LayoutNode::TabGroup(bottom)),
    ];

    DockLayout::from_parts(areas, FIRST_FREE_ID)
}

fn group(id: NodeId, tab: Tab) -> LayoutNode {
    LayoutNode::TabGroup(TabGroup::with_tab(id, tab))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_clean() {
        let layout = default_layout();
        assert!(layout.invariant_report().is_clean());
        assert_eq!(layout.next_id().get(), 5);
        assert_eq!(layout.tab_count(), 5);
        for slot in DockSlot::ALL {
            assert!(layout.area(slot).visible);
            assert!(layout.area(slot).active_group.is_some());
        }
    }

    #[test]
    fn bottom_area_opens_on_logs() {
        let layout = default_layout();
        let bottom = layout.area(DockSlot::Bottom).root.as_ref().unwrap();
        let active = bottom.first_group().active_tab().unwrap();
        assert_eq!(active.id.as_str(), "logs");
        assert_eq!(bottom.first_group().tabs.len(), 2);
    }
}
