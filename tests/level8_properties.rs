//! Level 8: Property Tests
//!
//! Geometry and gesture invariants over generated inputs.

mod common;

use common::harness::EngineHarness;
use graph_gesture_core::{
    anchor_point, bezier_midpoint, bezier_path, closest_side, GraphNode, Modifiers, Point, Rect,
    Side,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Top), Just(Side::Bottom), Just(Side::Left), Just(Side::Right)]
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-2000i32..2000, -2000i32..2000).prop_map(|(x, y)| Point::new(x as f32, y as f32))
}

/// Integer-valued node boxes keep every coordinate exactly representable.
fn node_strategy() -> impl Strategy<Value = (i32, i32, i32, i32)> {
    (-1000i32..1000, -1000i32..1000, 20i32..300, 20i32..200)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]

    #[test]
    fn anchor_of_closest_side_is_on_boundary(
        (x, y, w, h) in node_strategy(),
        toward in point_strategy(),
    ) {
        let (origin, w, h) = (Point::new(x as f32, y as f32), w as f32, h as f32);
        let side = closest_side(origin, w, h, toward);
        let anchor = anchor_point(origin, w, h, side);

        let on_vertical = anchor.x == origin.x || anchor.x == origin.x + w;
        let on_horizontal = anchor.y == origin.y || anchor.y == origin.y + h;
        prop_assert!(on_vertical || on_horizontal);
        prop_assert!(Rect::new(origin.x, origin.y, w, h).contains(anchor));
    }

    #[test]
    fn midpoint_is_idempotent(
        p1 in point_strategy(),
        p2 in point_strategy(),
        s1 in side_strategy(),
        s2 in side_strategy(),
    ) {
        let first = bezier_midpoint(p1, p2, s1, s2);
        prop_assert_eq!(first, bezier_midpoint(p1, p2, s1, s2));
        prop_assert_eq!(first, bezier_path(p1, p2, s1, s2).eval(0.5));
    }

    #[test]
    fn single_drag_commits_once_at_net_delta(
        (x, y, w, h) in node_strategy(),
        grab in (0.1f32..0.9, 0.1f32..0.9),
        moves in prop::collection::vec((-500i32..500, -500i32..500), 0..30),
        (dx, dy) in (-500i32..500, -500i32..500),
    ) {
        let mut harness = EngineHarness::with_graph(
            vec![GraphNode::new("n", x as f32, y as f32, w as f32, h as f32)],
            Vec::new(),
        );
        let press = Point::new(x as f32 + (w as f32 * grab.0).round(), y as f32 + (h as f32 * grab.1).round());
        prop_assert!(harness.press(press.x, press.y, Modifiers::NONE));
        for (mx, my) in moves {
            harness.move_to(mx as f32, my as f32);
        }
        harness.release(press.x + dx as f32, press.y + dy as f32);

        let moved = harness.tracker().node_moved.borrow().clone();
        prop_assert_eq!(moved, vec![("n".to_string(), Point::new((x + dx) as f32, (y + dy) as f32))]);
        prop_assert_eq!(harness.tracker().total(), 1);
        prop_assert!(harness.engine.is_idle());
        prop_assert!(!harness.listeners.is_installed());
    }

    #[test]
    fn multi_drag_is_one_batch_with_all_ids(
        count in 2usize..8,
        moves in prop::collection::vec((-500i32..500, -500i32..500), 0..20),
        (dx, dy) in (-300i32..300, -300i32..300),
    ) {
        // A row of nodes, all selected
        let nodes: Vec<GraphNode> = (0..count)
            .map(|i| GraphNode::new(format!("n{}", i), i as f32 * 200.0, 0.0, 100.0, 60.0))
            .collect();
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let mut harness = EngineHarness::with_graph(nodes, Vec::new());
        harness.engine.selection_mut().replace_selection(ids.iter().cloned());

        harness.press(50.0, 30.0, Modifiers::NONE);
        for (mx, my) in moves {
            harness.move_to(mx as f32, my as f32);
        }
        harness.release(50.0 + dx as f32, 30.0 + dy as f32);

        let batches = harness.tracker().multi_node_moved.borrow().clone();
        prop_assert_eq!(batches.len(), 1);
        let moved: HashSet<&String> = batches[0].0.iter().collect();
        prop_assert_eq!(moved, ids.iter().collect::<HashSet<_>>());
        prop_assert_eq!(batches[0].1, Point::new(dx as f32, dy as f32));
        prop_assert!(harness.tracker().node_moved.borrow().is_empty());
    }

    #[test]
    fn box_select_matches_overlap_in_either_corner_order(
        boxes in prop::collection::vec(node_strategy(), 1..12),
        a in point_strategy(),
        b in point_strategy(),
    ) {
        let nodes: Vec<GraphNode> = boxes
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| GraphNode::new(format!("n{}", i), x as f32, y as f32, w as f32, h as f32))
            .collect();
        let selection = Rect::from_corners(a, b);
        let expected: HashSet<String> = nodes
            .iter()
            .filter(|n| n.rect().intersects(&selection))
            .map(|n| n.id.clone())
            .collect();

        for (from, to) in [(a, b), (b, a)] {
            let mut harness = EngineHarness::with_graph(nodes.clone(), Vec::new());
            // Start on canvas regardless of what lies under the first corner
            harness.press_on(graph_gesture_core::PointerTarget::Canvas, from.x, from.y, Modifiers::NONE);
            harness.move_to(to.x, to.y);
            harness.release(to.x, to.y);

            let selections = harness.tracker().box_selected.borrow().clone();
            prop_assert_eq!(selections.len(), 1);
            let got: HashSet<String> = selections[0].iter().cloned().collect();
            prop_assert_eq!(got, expected.clone());
        }
    }

    #[test]
    fn every_gesture_returns_to_idle(
        start in point_strategy(),
        path in prop::collection::vec(point_strategy(), 0..10),
        shift in any::<bool>(),
        ctrl in any::<bool>(),
    ) {
        let mut harness = EngineHarness::new();
        let modifiers = Modifiers { shift, ctrl, ..Modifiers::NONE };
        let coords: Vec<(f32, f32)> = path.iter().map(|p| (p.x, p.y)).collect();
        harness.gesture((start.x, start.y), &coords, modifiers);

        prop_assert!(harness.engine.is_idle());
        prop_assert!(!harness.listeners.is_installed());
        prop_assert!(harness.engine.snap_points().is_empty());
        prop_assert!(harness.engine.active_snap().is_none());
        prop_assert!(harness.tracker().total() <= 1);
    }
}
