use super::*;

fn first_by_id<'a, 'i>(doc: &'a roxmltree::Document<'i>, id: &str) -> roxmltree::Node<'a, 'i> {
    doc.descendants()
        .find(|n| n.attribute("id") == Some(id))
        .unwrap()
}

#[test]
fn rect_from_direct_attributes() {
    let doc = roxmltree::Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
            <rect id="a" x="10" y="20px" width="30" height="40"/>
            <rect id="b" width="5" height="6"/>
            <rect id="c" x="1" y="1" width="0" height="6"/>
            <rect id="d" x="1" y="1"/>
        </svg>"#,
    )
    .unwrap();

    assert_eq!(
        rect_from_attributes(first_by_id(&doc, "a")),
        Some(Rect::new(10.0, 20.0, 40.0, 60.0))
    );
    assert_eq!(
        rect_from_attributes(first_by_id(&doc, "b")),
        Some(Rect::new(0.0, 0.0, 5.0, 6.0))
    );
    assert_eq!(rect_from_attributes(first_by_id(&doc, "c")), None);
    assert_eq!(rect_from_attributes(first_by_id(&doc, "d")), None);
}

#[test]
fn rect_from_use_resolves_reference_and_offsets() {
    let doc = roxmltree::Document::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
            <defs><rect id="tpl" x="5" y="5" width="50" height="60"/></defs>
            <use id="u1" href="#tpl"/>
            <use id="u2" xlink:href="#tpl" x="100" y="10"/>
            <use id="u3" href="#missing"/>
            <use id="loop" href="#loop"/>
        </svg>"##,
    )
    .unwrap();

    assert_eq!(
        rect_from_attributes(first_by_id(&doc, "u1")),
        Some(Rect::new(5.0, 5.0, 55.0, 65.0))
    );
    assert_eq!(
        rect_from_attributes(first_by_id(&doc, "u2")),
        Some(Rect::new(105.0, 15.0, 155.0, 75.0))
    );
    assert_eq!(rect_from_attributes(first_by_id(&doc, "u3")), None);
    assert_eq!(rect_from_attributes(first_by_id(&doc, "loop")), None);
}

#[test]
fn clamp_keeps_larger_image_covering() {
    let slot = Rect::new(0.0, 0.0, 100.0, 100.0);

    // dragged right/down past the slot origin: pulled back so no gap shows at the top-left
    let moved = Rect::from_origin_size((30.0, 40.0), (200.0, 200.0));
    assert_eq!(clamp_rect_to_container(slot, moved), Point::new(0.0, 0.0));

    // dragged left/up too far: pulled back so the right/bottom edges still cover
    let moved = Rect::from_origin_size((-150.0, -170.0), (200.0, 200.0));
    assert_eq!(clamp_rect_to_container(slot, moved), Point::new(-100.0, -100.0));

    // in range: unchanged
    let moved = Rect::from_origin_size((-20.0, -80.0), (200.0, 200.0));
    assert_eq!(clamp_rect_to_container(slot, moved), Point::new(-20.0, -80.0));
}

#[test]
fn clamp_pins_smaller_axis_to_container_origin() {
    let slot = Rect::new(10.0, 10.0, 110.0, 110.0);
    let moved = Rect::from_origin_size((50.0, -300.0), (40.0, 400.0));
    assert_eq!(clamp_rect_to_container(slot, moved), Point::new(10.0, -290.0));
}

#[test]
fn cover_fit_matches_tall_image_scenario() {
    let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
    let (placed, scale) = cover_fit(slot, Size::new(50.0, 200.0));
    assert_eq!(scale, 2.0);
    assert_eq!(placed, Rect::new(0.0, -150.0, 100.0, 250.0));
    assert!(placed.contains_rect(slot));
}

#[test]
fn cover_fit_centers_wide_image() {
    let slot = Rect::new(100.0, 0.0, 200.0, 100.0);
    let (placed, scale) = cover_fit(slot, Size::new(400.0, 100.0));
    assert_eq!(scale, 1.0);
    assert_eq!(placed, Rect::new(-50.0, 0.0, 350.0, 100.0));
}

#[test]
fn viewport_mapping_meet_letterboxes() {
    let vb = ViewBox::from_size(200.0, 100.0);
    let m = ViewportMapping::new(vb, Size::new(400.0, 400.0));
    // scale 2, vertical letterbox of 100px
    let p = m.to_frame(Point::new(200.0, 200.0));
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 50.0).abs() < 1e-9);
    let origin = m.to_frame(Point::new(0.0, 100.0));
    assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);
}

#[test]
fn viewport_mapping_degenerate_is_identity() {
    let m = ViewportMapping::new(ViewBox::ZERO, Size::new(400.0, 400.0));
    assert_eq!(m.to_frame(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
}
