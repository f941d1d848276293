use super::*;
use crate::geometry::cover_fit;
use crate::overlay::scene::Scene;

const EPS: f64 = 1e-9;

fn two_slots() -> Vec<Slot> {
    vec![
        Slot {
            id: SlotId::from("slot1"),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        },
        Slot {
            id: SlotId::from("slot2"),
            rect: Rect::new(100.0, 0.0, 200.0, 100.0),
        },
    ]
}

fn node() -> NodeId {
    let mut scene = Scene::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
    scene.create_element("image", &[])
}

fn session_with_photo(natural: Size) -> Session {
    let mut session = Session::new(two_slots(), &BTreeMap::new());
    let slot = session.slot(&SlotId::from("slot1")).unwrap().rect;
    let (rect, scale) = cover_fit(slot, natural);
    session.place(
        &SlotId::from("slot1"),
        PlacedImage {
            natural,
            rect,
            scale,
            node: node(),
        },
    );
    session
}

fn covers(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 + EPS
        && outer.y0 <= inner.y0 + EPS
        && outer.x1 >= inner.x1 - EPS
        && outer.y1 >= inner.y1 - EPS
}

#[test]
fn hit_tests_use_slot_rects() {
    let session = Session::new(two_slots(), &BTreeMap::new());
    assert_eq!(
        session.slot_at(Point::new(150.0, 50.0)).unwrap().id.as_str(),
        "slot2"
    );
    assert!(session.slot_at(Point::new(250.0, 50.0)).is_none());
    assert!(session.image_at(Point::new(50.0, 50.0)).is_none());
}

#[test]
fn active_slot_must_exist() {
    let mut session = Session::new(two_slots(), &BTreeMap::new());
    session.set_active(Some(SlotId::from("slot2")));
    assert_eq!(session.active().unwrap().as_str(), "slot2");
    session.set_active(Some(SlotId::from("slot9")));
    assert!(session.active().is_none());
}

#[test]
fn unbound_slots_are_reported() {
    let mut markers = BTreeMap::new();
    markers.insert(SlotId::from("slot1"), node());
    let session = Session::new(two_slots(), &markers);
    assert!(session.is_bound(&SlotId::from("slot1")));
    assert!(!session.is_bound(&SlotId::from("slot2")));
}

#[test]
fn drag_moves_and_clamps_within_slot() {
    let mut session = session_with_photo(Size::new(50.0, 200.0));
    let p = PointerId(1);
    assert!(session.begin_drag(p, Point::new(50.0, 50.0)));
    assert!(!session.begin_drag(p, Point::new(50.0, 50.0)));

    // image is 100x400 at y=-150; drag down 100 -> y=-50, allowed
    assert_eq!(
        session.drag_to(p, Point::new(80.0, 150.0)).unwrap().as_str(),
        "slot1"
    );
    let rect = session.image(&SlotId::from("slot1")).unwrap().rect;
    assert_eq!(rect, Rect::new(0.0, -50.0, 100.0, 350.0));

    // drag far down: clamped to y=0, size unchanged
    session.drag_to(p, Point::new(50.0, 1000.0));
    let rect = session.image(&SlotId::from("slot1")).unwrap().rect;
    assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 400.0));

    // drag far up: bottom edge stops at the slot's bottom
    session.drag_to(p, Point::new(50.0, -1000.0));
    let rect = session.image(&SlotId::from("slot1")).unwrap().rect;
    assert_eq!(rect, Rect::new(0.0, -300.0, 100.0, 100.0));

    session.end_drag(p);
    session.end_drag(p);
    assert!(session.drag(p).is_none());
    assert!(session.drag_to(p, Point::new(0.0, 0.0)).is_none());
}

#[test]
fn drags_are_isolated_per_pointer() {
    let mut session = session_with_photo(Size::new(100.0, 300.0));
    assert!(session.begin_drag(PointerId(1), Point::new(10.0, 10.0)));
    assert!(session.drag_to(PointerId(2), Point::new(10.0, 90.0)).is_none());
    let start = session.drag(PointerId(1)).unwrap().start_rect;
    assert_eq!(session.image(&SlotId::from("slot1")).unwrap().rect, start);
}

#[test]
fn drag_outside_any_photo_does_not_start() {
    let mut session = session_with_photo(Size::new(100.0, 100.0));
    assert!(!session.begin_drag(PointerId(1), Point::new(150.0, 50.0)));
}

#[test]
fn zoom_in_then_out_never_drops_below_cover() {
    let natural = Size::new(50.0, 200.0);
    let mut session = session_with_photo(natural);
    let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
    let id = SlotId::from("slot1");

    assert_eq!(session.zoom_at(Point::new(50.0, 50.0), -1.0, 1.1), Some(id.clone()));
    let zoomed = session.image(&id).unwrap().clone();
    assert!((zoomed.scale - 2.2).abs() < EPS);
    assert!((zoomed.rect.width() - 110.0).abs() < EPS);
    assert!((zoomed.rect.height() - 440.0).abs() < EPS);
    assert!(covers(zoomed.rect, slot));

    for _ in 0..5 {
        session.zoom_at(Point::new(50.0, 50.0), 3.0, 1.1);
        let img = session.image(&id).unwrap();
        assert!(img.scale >= 2.0 - EPS);
        assert!(img.rect.width() >= 100.0 - EPS);
        assert!(covers(img.rect, slot));
    }
    assert!((session.image(&id).unwrap().scale - 2.0).abs() < EPS);
}

#[test]
fn zoom_ignores_zero_delta_and_empty_points() {
    let mut session = session_with_photo(Size::new(10.0, 10.0));
    assert!(session.zoom_at(Point::new(50.0, 50.0), 0.0, 1.1).is_none());
    assert!(session.zoom_at(Point::new(150.0, 50.0), -1.0, 1.1).is_none());
}

#[test]
fn replacing_a_photo_keeps_one_per_slot_and_cancels_its_drag() {
    let mut session = session_with_photo(Size::new(10.0, 10.0));
    let id = SlotId::from("slot1");
    assert!(session.begin_drag(PointerId(7), Point::new(5.0, 5.0)));

    let (rect, scale) = cover_fit(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(20.0, 10.0));
    let old = session.place(
        &id,
        PlacedImage {
            natural: Size::new(20.0, 10.0),
            rect,
            scale,
            node: node(),
        },
    );
    assert_eq!(old.unwrap().natural, Size::new(10.0, 10.0));
    assert_eq!(session.filled_slots(), &[id.clone()]);
    assert!(session.drag(PointerId(7)).is_none());
}

#[test]
fn zoom_during_drag_keeps_size_and_scale_in_step() {
    let natural = Size::new(100.0, 100.0);
    let mut session = session_with_photo(natural);
    let id = SlotId::from("slot1");
    let p = PointerId(3);

    assert!(session.begin_drag(p, Point::new(50.0, 50.0)));
    session.drag_to(p, Point::new(60.0, 50.0));
    assert_eq!(session.image(&id).unwrap().rect, Rect::new(0.0, 0.0, 100.0, 100.0));

    session.zoom_at(Point::new(60.0, 50.0), -1.0, 2.0);
    let zoomed = session.image(&id).unwrap().clone();
    assert_eq!(zoomed.rect, Rect::new(-50.0, -50.0, 150.0, 150.0));
    assert_eq!(session.drag(p).unwrap().start_rect, zoomed.rect);

    // the drag continues from the zoomed placement
    session.drag_to(p, Point::new(80.0, 50.0));
    let img = session.image(&id).unwrap();
    assert_eq!(img.scale, 2.0);
    assert_eq!(img.rect.size(), natural * img.scale);
    assert_eq!(img.rect, Rect::new(-30.0, -50.0, 170.0, 150.0));
}
