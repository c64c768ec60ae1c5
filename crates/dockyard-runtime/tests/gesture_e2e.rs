//! Pointer-driven scenarios through the workspace store.
//!
//! Each test feeds the same event stream a host adapter would: a press on a
//! tab or a resize strip, then window-level moves and a release.

use dockyard_core::{Point, PointerButton, PointerEvent, Rect};
use dockyard_layout::{
    DockRects, DockSlot, DropPosition, DropZoneGeometry, LayoutNode, LayoutOutcome,
    SplitDirection, TabId, resolve_drop_position,
};
use dockyard_runtime::{
    CursorStyle, InteractionEffect, TabDragCancelReason, TabDragEffect, WorkspaceStore,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1200.0, 800.0);

fn tid(raw: &str) -> TabId {
    TabId::from(raw)
}

fn store_and_rects() -> (WorkspaceStore, DockRects) {
    let store = WorkspaceStore::default();
    let rects = store.solve(VIEWPORT);
    (store, rects)
}

fn center_group_rect(store: &WorkspaceStore, rects: &DockRects) -> Rect {
    let center = store.layout().area(DockSlot::Center).target_group().unwrap();
    rects.group(center).unwrap()
}

fn at_fraction(rect: Rect, fx: f64, fy: f64) -> Point {
    Point::new(rect.x + rect.width * fx, rect.y + rect.height * fy)
}

#[test]
fn dragging_a_tab_onto_a_right_zone_splits_the_target() {
    let (mut store, rects) = store_and_rects();
    let target = center_group_rect(&store, &rects);
    let over_right = at_fraction(target, 0.9, 0.5);

    let effect = store
        .tab_pointer_down(&tid("explorer"), PointerButton::Primary, Point::new(40.0, 12.0))
        .unwrap();
    assert!(matches!(effect, TabDragEffect::Armed { .. }));
    assert_eq!(store.listeners().len(), 2);
    assert!(!store.drag_state().is_dragging);

    let effect = store
        .handle_pointer(PointerEvent::moved(120.0, 12.0), &rects)
        .unwrap();
    assert!(matches!(
        effect,
        InteractionEffect::Drag {
            effect: TabDragEffect::DragStarted { .. },
            ..
        }
    ));
    assert!(store.drag_state().is_dragging);
    assert_eq!(store.cursor(), Some(CursorStyle::Grabbing));

    store
        .handle_pointer(PointerEvent::moved(over_right.x, over_right.y), &rects)
        .unwrap();
    let hovered = *store.hovered_drop_target().expect("right zone highlighted");
    assert_eq!(hovered.position, DropPosition::Right);
    assert_eq!(store.drag_state().position(), over_right);

    let effect = store
        .handle_pointer(
            PointerEvent::up(PointerButton::Primary, over_right.x, over_right.y),
            &rects,
        )
        .unwrap();
    let InteractionEffect::Drag {
        effect: TabDragEffect::Dropped { target, .. },
        outcome: Some(outcome),
    } = effect
    else {
        panic!("expected a committed drop");
    };
    assert_eq!(target, hovered);
    assert!(outcome.is_applied());

    let Some(LayoutNode::Split(split)) = &store.layout().area(DockSlot::Center).root else {
        panic!("center should now be split");
    };
    assert_eq!(split.direction, SplitDirection::Horizontal);
    assert!(matches!(
        split.second.as_ref(),
        LayoutNode::TabGroup(group) if group.contains(&tid("explorer"))
    ));
    assert!(store.layout().area(DockSlot::Left).root.is_none());

    assert!(store.listeners().is_empty());
    assert_eq!(store.cursor(), None);
    assert!(!store.drag_state().is_dragging);
}

#[test]
fn hover_preview_and_commit_agree_with_the_pure_resolver() {
    let (mut store, rects) = store_and_rects();
    let target = center_group_rect(&store, &rects);
    store
        .tab_pointer_down(&tid("inspector"), PointerButton::Primary, Point::new(900.0, 12.0))
        .unwrap();
    store
        .handle_pointer(PointerEvent::moved(800.0, 12.0), &rects)
        .unwrap();

    for (fx, fy) in [(0.5, 0.5), (0.5, 0.1), (0.5, 0.9), (0.1, 0.5), (0.9, 0.5)] {
        let point = at_fraction(target, fx, fy);
        store
            .handle_pointer(PointerEvent::moved(point.x, point.y), &rects)
            .unwrap();
        let expected = resolve_drop_position(target, point, DropZoneGeometry::default());
        assert_eq!(
            store.hovered_drop_target().map(|hovered| hovered.position),
            expected
        );
    }
}

#[test]
fn releasing_over_no_zone_cancels_without_touching_the_layout() {
    let (mut store, rects) = store_and_rects();
    let before = store.layout().clone();
    let revision = store.revision();

    store
        .tab_pointer_down(&tid("graph"), PointerButton::Primary, Point::new(400.0, 12.0))
        .unwrap();
    store
        .handle_pointer(PointerEvent::moved(300.0, 300.0), &rects)
        .unwrap();
    // Strip between the left area and the center.
    let effect = store
        .handle_pointer(PointerEvent::up(PointerButton::Primary, 262.0, 300.0), &rects)
        .unwrap();
    assert!(matches!(
        effect,
        InteractionEffect::Drag {
            effect: TabDragEffect::Canceled {
                reason: TabDragCancelReason::NoDropZone,
                ..
            },
            outcome: None,
        }
    ));
    assert_eq!(store.layout(), &before);
    assert_eq!(store.revision(), revision);
    assert!(store.listeners().is_empty());
}

#[test]
fn click_without_drag_activates_the_tab() {
    let (mut store, rects) = store_and_rects();
    let group = store.layout().locate_tab(&tid("cluster")).unwrap().group_id;
    assert_eq!(
        store.layout().find_group(group).unwrap().active_tab_id,
        Some(tid("logs"))
    );

    store
        .tab_pointer_down(&tid("cluster"), PointerButton::Primary, Point::new(360.0, 590.0))
        .unwrap();
    let effect = store
        .handle_pointer(PointerEvent::up(PointerButton::Primary, 362.0, 591.0), &rects)
        .unwrap();
    assert!(matches!(
        effect,
        InteractionEffect::Drag {
            effect: TabDragEffect::Clicked { .. },
            outcome: Some(LayoutOutcome::Applied { .. }),
        }
    ));
    assert_eq!(
        store.layout().find_group(group).unwrap().active_tab_id,
        Some(tid("cluster"))
    );
}

#[test]
fn dragging_the_bottom_handle_resizes_the_bottom_area() {
    let (mut store, rects) = store_and_rects();
    let handle = rects.area_handle(DockSlot::Bottom).unwrap();
    let press = Point::new(handle.x + 100.0, handle.y + handle.height / 2.0);
    assert_eq!(rects.area_handle_at(press), Some(DockSlot::Bottom));

    assert!(store.begin_area_resize(DockSlot::Bottom, press));
    assert_eq!(store.cursor(), Some(CursorStyle::RowResize));

    store
        .handle_pointer(PointerEvent::moved(press.x, press.y - 100.0), &rects)
        .unwrap();
    assert_eq!(store.layout().area(DockSlot::Bottom).size, 320.0);

    // Far past the top bound, then back: the size follows the pointer again.
    store
        .handle_pointer(PointerEvent::moved(press.x, press.y - 2_000.0), &rects)
        .unwrap();
    assert_eq!(store.layout().area(DockSlot::Bottom).size, 500.0);
    let effect = store
        .handle_pointer(
            PointerEvent::up(PointerButton::Primary, press.x, press.y - 30.0),
            &rects,
        )
        .unwrap();
    assert!(matches!(effect, InteractionEffect::Resize { finished: true, .. }));
    assert_eq!(store.layout().area(DockSlot::Bottom).size, 250.0);
    assert!(store.listeners().is_empty());
    assert_eq!(store.cursor(), None);
}

#[test]
fn dragging_a_splitter_changes_its_ratio() {
    let (mut store, _) = store_and_rects();
    let center = store.layout().area(DockSlot::Center).target_group().unwrap();
    store
        .drop_tab(&tid("logs"), center, DropPosition::Bottom)
        .unwrap();
    let rects = store.solve(VIEWPORT);
    let split_id = store.layout().area(DockSlot::Center).root.as_ref().unwrap().id();
    let solved = *rects.split(split_id).unwrap();
    let press = Point::new(
        solved.handle.x + solved.handle.width / 2.0,
        solved.handle.y + solved.handle.height / 2.0,
    );
    assert_eq!(rects.splitter_at(press), Some(split_id));

    assert!(store.begin_split_resize(split_id, press, &rects));
    assert_eq!(store.cursor(), Some(CursorStyle::RowResize));
    let step = solved.extent() * 0.2;
    store
        .handle_pointer(PointerEvent::moved(press.x, press.y + step), &rects)
        .unwrap();
    let ratio = store.layout().find_split(split_id).unwrap().ratio;
    assert!((ratio - 0.7).abs() < 1e-12, "ratio {ratio}");

    store
        .handle_pointer(
            PointerEvent::up(PointerButton::Primary, press.x, press.y + 10_000.0),
            &rects,
        )
        .unwrap();
    assert_eq!(store.layout().find_split(split_id).unwrap().ratio, 0.9);
    assert!(store.listeners().is_empty());
}

#[test]
fn teardown_mid_drag_leaves_nothing_listening() {
    let (mut store, rects) = store_and_rects();
    store
        .tab_pointer_down(&tid("logs"), PointerButton::Primary, Point::new(300.0, 590.0))
        .unwrap();
    store
        .handle_pointer(PointerEvent::moved(500.0, 300.0), &rects)
        .unwrap();
    assert!(store.drag_state().is_dragging);

    assert_eq!(store.teardown_interactions(), 2);
    assert!(!store.drag_state().is_dragging);
    assert!(store.hovered_drop_target().is_none());
    let effect = store
        .handle_pointer(PointerEvent::up(PointerButton::Primary, 500.0, 300.0), &rects)
        .unwrap();
    assert_eq!(effect, InteractionEffect::Ignored);
}
