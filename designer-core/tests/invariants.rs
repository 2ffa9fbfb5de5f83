//! Property tests for scene ordering, clipping, selection, and zoom bounds.

use designer_core::{
    CanvasConfig, CanvasSession, HeuristicMeasurer, InputEvent, NullSurface, Point, PrintArea,
    Size, WheelEvent,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddText(String),
    Remove(usize),
    Reorder(usize, usize),
    SetArea(f32, f32, f32, f32),
    Select(usize),
    ClearAll,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z]{0,8}".prop_map(Op::AddText),
        1 => any::<usize>().prop_map(Op::Remove),
        2 => (any::<usize>(), 0usize..12).prop_map(|(i, to)| Op::Reorder(i, to)),
        1 => (0.0f32..0.5, 0.0f32..0.5, 0.1f32..0.5, 0.1f32..0.5)
            .prop_map(|(l, t, w, h)| Op::SetArea(l, t, w, h)),
        1 => any::<usize>().prop_map(Op::Select),
        1 => Just(Op::ClearAll),
    ]
}

fn arb_wheel_delta() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => -5000.0f32..5000.0,
        1 => Just(f32::NAN),
        1 => Just(f32::INFINITY),
        1 => Just(f32::NEG_INFINITY),
    ]
}

fn session() -> CanvasSession {
    CanvasSession::new(
        CanvasConfig::default(),
        Box::new(NullSurface),
        Box::new(HeuristicMeasurer::default()),
    )
}

/// Pick an existing element by a wrapping index.
fn nth_id(session: &CanvasSession, index: usize) -> Option<designer_core::ElementId> {
    let count = session.layer_count();
    if count == 0 {
        return None;
    }
    session.scene().elements().nth(index % count).map(|e| e.id)
}

fn run(session: &mut CanvasSession, op: &Op) {
    match op {
        Op::AddText(content) => {
            session.add_text(content, None);
        }
        Op::Remove(i) => {
            if let Some(id) = nth_id(session, *i) {
                session.remove(id);
            }
        }
        Op::Reorder(i, to) => {
            if let Some(id) = nth_id(session, *i) {
                session.reorder(id, *to);
            }
        }
        Op::SetArea(l, t, w, h) => {
            let area = PrintArea::from_relative(Size::new(800.0, 600.0), *l, *t, *w, *h);
            session.set_print_area(area);
        }
        Op::Select(i) => {
            if let Some(id) = nth_id(session, *i) {
                session.select(id);
            }
        }
        Op::ClearAll => {
            session.clear_all();
        }
    }
}

proptest! {
    #[test]
    fn prop_guides_stay_below_editable_elements(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut s = session();
        for op in &ops {
            run(&mut s, op);
            let floor = s.scene().system_count();
            for element in s.scene().elements() {
                let z = s.z_index(element.id);
                prop_assert!(z.is_some_and(|z| z >= floor));
            }
        }
    }

    #[test]
    fn prop_clip_always_matches_latest_print_area(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut s = session();
        for op in &ops {
            run(&mut s, op);
        }
        let expected = s.print_area().map(PrintArea::rect);
        for element in s.scene().elements() {
            prop_assert_eq!(element.clip.map(|c| c.rect), expected);
        }
    }

    #[test]
    fn prop_selection_only_holds_live_elements(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut s = session();
        for op in &ops {
            run(&mut s, op);
            for id in s.selected_ids() {
                prop_assert!(s.scene().contains(*id));
            }
            let active_count = s.get_layers().iter().filter(|l| l.is_active).count();
            prop_assert!(active_count <= 1);
        }
    }

    #[test]
    fn prop_version_is_monotonic(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut s = session();
        let mut last = s.version();
        for op in &ops {
            run(&mut s, op);
            prop_assert!(s.version() >= last);
            last = s.version();
        }
    }

    #[test]
    fn prop_zoom_stays_within_bounds(
        steps in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0, arb_wheel_delta()), 1..30)
    ) {
        let mut s = session();
        for (x, y, delta) in steps {
            s.handle_input(&InputEvent::Wheel(WheelEvent { x, y, delta }));
            let zoom = s.viewport().zoom();
            prop_assert!((1.0..=3.0).contains(&zoom));
            prop_assert!(s.viewport().pan().is_finite());
        }
    }

    #[test]
    fn prop_wheel_keeps_anchor_fixed(
        x in 0.0f32..800.0,
        y in 0.0f32..600.0,
        delta in -500.0f32..500.0,
    ) {
        let mut s = session();
        let anchor = Point::new(x, y);
        let before = s.viewport().to_scene(anchor);
        s.handle_input(&InputEvent::Wheel(WheelEvent { x, y, delta }));
        let after = s.viewport().to_scene(anchor);
        prop_assert!((before.x - after.x).abs() < 1e-2);
        prop_assert!((before.y - after.y).abs() < 1e-2);
    }
}
