//! End-to-end command scenarios for the dock layout.

use dockyard_core::{Point, Rect};
use dockyard_layout::area::MAX_LEFT_SIZE;
use dockyard_layout::{
    DockArea, DockLayout, DockSlot, DropPosition, DropZoneGeometry, LayoutCommand, LayoutMetrics,
    LayoutNode, LayoutNoopReason, NodeId, SplitDirection, Tab, TabGroup, TabId, default_layout,
    drop_preview_rect, resolve_drop_position,
};

fn tid(name: &str) -> TabId {
    TabId::from(name)
}

fn id(raw: u64) -> NodeId {
    NodeId::new(raw).expect("non-zero id")
}

/// Left holds one group `[A, B]` with `B` active; every other area is empty.
fn left_ab_layout() -> DockLayout {
    let mut group = TabGroup::new(id(1));
    group.push_and_activate(Tab::new("A", "A", "editor"));
    group.push_and_activate(Tab::new("B", "B", "editor"));
    let areas = vec![
        DockArea::empty(DockSlot::Left, 260.0, true).with_root(LayoutNode::TabGroup(group)),
        DockArea::empty(DockSlot::Center, 0.0, true),
        DockArea::empty(DockSlot::Right, 320.0, true),
        DockArea::empty(DockSlot::Bottom, 220.0, true),
    ];
    DockLayout::from_areas(areas, id(2)).expect("one area per slot")
}

#[test]
fn closing_tabs_empties_area_root_to_null() {
    let mut layout = left_ab_layout();
    layout
        .apply(LayoutCommand::CloseTab { tab_id: tid("B") })
        .unwrap();
    let group = layout.find_group(id(1)).unwrap();
    assert_eq!(group.active_tab_id, Some(tid("A")));

    layout
        .apply(LayoutCommand::CloseTab { tab_id: tid("A") })
        .unwrap();
    assert!(layout.area(DockSlot::Left).root.is_none());
    assert!(layout.invariant_report().is_clean());
}

#[test]
fn self_directional_drop_of_sole_tab_leaves_center_unchanged() {
    let mut layout = default_layout();
    let graph = layout.locate_tab(&tid("graph")).unwrap();
    let before = layout.clone();
    let outcome = layout
        .apply(LayoutCommand::DropTab {
            tab_id: tid("graph"),
            target_group: graph.group_id,
            position: DropPosition::Right,
        })
        .unwrap();
    assert_eq!(
        outcome.noop_reason(),
        Some(&LayoutNoopReason::SelfDrop {
            group_id: graph.group_id
        })
    );
    assert_eq!(layout, before);
}

#[test]
fn dragging_left_tab_onto_bottom_center_merges_and_empties_left() {
    let mut layout = default_layout();
    let bottom = layout
        .area(DockSlot::Bottom)
        .target_group()
        .expect("bottom has content");
    layout
        .apply(LayoutCommand::DropTab {
            tab_id: tid("explorer"),
            target_group: bottom,
            position: DropPosition::Center,
        })
        .unwrap();

    let group = layout.find_group(bottom).unwrap();
    assert_eq!(group.tabs.last().unwrap().id, tid("explorer"));
    assert_eq!(group.active_tab_id, Some(tid("explorer")));
    assert!(layout.area(DockSlot::Left).root.is_none());
}

#[test]
fn resizing_left_by_large_delta_clamps_to_max() {
    let mut layout = default_layout();
    let size = layout.area(DockSlot::Left).size;
    layout
        .apply(LayoutCommand::SetAreaSize {
            slot: DockSlot::Left,
            size: size + 1000.0,
        })
        .unwrap();
    assert_eq!(layout.area(DockSlot::Left).size, MAX_LEFT_SIZE);
}

#[test]
fn hover_and_commit_agree_on_the_zone() {
    let mut layout = default_layout();
    let rects = layout.solve_layout(Rect::from_size(1200.0, 800.0), LayoutMetrics::default());
    let center = layout.area(DockSlot::Center).target_group().unwrap();
    let target = rects.group(center).unwrap();
    let pointer = Point::new(target.x + target.width * 0.9, target.y + target.height * 0.5);

    let hovered = resolve_drop_position(target, pointer, DropZoneGeometry::default()).unwrap();
    assert_eq!(hovered, DropPosition::Right);
    let ghost = drop_preview_rect(target, hovered);

    layout
        .apply(LayoutCommand::DropTab {
            tab_id: tid("inspector"),
            target_group: center,
            position: hovered,
        })
        .unwrap();
    let rects = layout.solve_layout(Rect::from_size(1200.0, 800.0), LayoutMetrics::default());
    let inspector_group = layout.locate_tab(&tid("inspector")).unwrap().group_id;
    let landed = rects.group(inspector_group).unwrap();
    // The ghost is half the target; the landed group is half minus the splitter.
    assert!((landed.right() - ghost.right()).abs() < 1e-9);
    assert!(landed.width <= ghost.width);
}

#[test]
fn nested_drops_build_a_mixed_direction_tree() {
    let mut layout = default_layout();
    let center = layout.area(DockSlot::Center).target_group().unwrap();
    for (tab, position) in [
        ("inspector", DropPosition::Right),
        ("logs", DropPosition::Bottom),
    ] {
        layout
            .apply(LayoutCommand::DropTab {
                tab_id: tid(tab),
                target_group: center,
                position,
            })
            .unwrap();
    }

    let Some(LayoutNode::Split(outer)) = &layout.area(DockSlot::Center).root else {
        panic!("center root should be a split");
    };
    assert_eq!(outer.direction, SplitDirection::Horizontal);
    let LayoutNode::Split(inner) = outer.first.as_ref() else {
        panic!("center group should have been split again");
    };
    assert_eq!(inner.direction, SplitDirection::Vertical);
    assert_eq!(inner.first.id(), center);
    assert!(layout.invariant_report().is_clean());

    // Closing the original group promotes the logs group into its place.
    layout
        .apply(LayoutCommand::CloseTab { tab_id: tid("graph") })
        .unwrap();
    let Some(LayoutNode::Split(outer)) = &layout.area(DockSlot::Center).root else {
        panic!("outer split survives");
    };
    assert!(matches!(outer.first.as_ref(), LayoutNode::TabGroup(group) if group.contains(&tid("logs"))));
}
