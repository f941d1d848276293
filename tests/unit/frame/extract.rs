use super::*;

fn slots_of(svg: &str) -> Vec<Slot> {
    let doc = roxmltree::Document::parse(svg).unwrap();
    extract_slots(&doc)
}

#[test]
fn two_rect_markers_in_one_group() {
    let slots = slots_of(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
            <g id="slots">
                <rect x="0" y="0" width="100" height="100"/>
                <rect x="100" y="0" width="100" height="100"/>
            </g>
        </svg>"#,
    );
    assert_eq!(
        slots,
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
    );
}

#[test]
fn coordinates_are_relative_to_view_box_origin() {
    let slots = slots_of(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="50 20 200 100">
            <g class="photo-slots"><rect x="60" y="30" width="10" height="10"/></g>
        </svg>"#,
    );
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].rect, Rect::new(10.0, 10.0, 20.0, 20.0));
}

#[test]
fn named_markers_win_over_unnamed() {
    let slots = slots_of(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 100">
            <g id="Slots">
                <rect id="border" x="0" y="0" width="300" height="100"/>
                <rect id="slot_a" x="0" y="0" width="100" height="100"/>
            </g>
            <g data-name="slot-group-2">
                <rect data-name="Slot 2" x="200" y="0" width="100" height="100"/>
            </g>
        </svg>"#,
    );
    let rects: Vec<Rect> = slots.iter().map(|s| s.rect).collect();
    assert_eq!(
        rects,
        vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(200.0, 0.0, 300.0, 100.0)
        ]
    );
    assert_eq!(slots[1].id.as_str(), "slot2");
}

#[test]
fn templates_and_ungrouped_rects_are_ignored() {
    let slots = slots_of(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 100">
            <rect x="0" y="0" width="300" height="100"/>
            <g id="slots">
                <defs><rect id="tpl" x="0" y="0" width="100" height="100"/></defs>
                <clipPath id="c"><rect x="0" y="0" width="50" height="50"/></clipPath>
                <use href="#tpl" x="100"/>
            </g>
        </svg>"##,
    );
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].rect, Rect::new(100.0, 0.0, 200.0, 100.0));
}

#[test]
fn unresolvable_markers_are_dropped_before_numbering() {
    let slots = slots_of(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 100">
            <g id="slots">
                <use href="#nowhere"/>
                <rect x="0" y="0" width="100"/>
                <rect x="200" y="0" width="100" height="100"/>
            </g>
        </svg>"##,
    );
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].id.as_str(), "slot1");
    assert_eq!(slots[0].rect.x0, 200.0);
}

#[test]
fn nested_groups_follow_document_order_without_duplicates() {
    let slots = slots_of(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 100">
            <g id="slots-outer">
                <rect x="0" y="0" width="10" height="10"/>
                <g id="slots-inner"><rect x="20" y="0" width="10" height="10"/></g>
                <rect x="40" y="0" width="10" height="10"/>
            </g>
        </svg>"#,
    );
    let xs: Vec<f64> = slots.iter().map(|s| s.rect.x0).collect();
    assert_eq!(xs, vec![0.0, 20.0, 40.0]);
}

#[test]
fn missing_view_box_falls_back_to_size_then_zero() {
    let doc = roxmltree::Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="600px" height="900"/>"#,
    )
    .unwrap();
    assert_eq!(
        read_view_box(doc.root_element()),
        ViewBox::from_size(600.0, 900.0)
    );

    let doc = roxmltree::Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="bogus"/>"#,
    )
    .unwrap();
    assert_eq!(read_view_box(doc.root_element()), ViewBox::ZERO);
}

#[test]
fn slot_contains_includes_edges() {
    let slot = Slot {
        id: SlotId::from_index(0),
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    };
    assert!(slot.contains(Point::new(10.0, 0.0)));
    assert!(!slot.contains(Point::new(10.1, 5.0)));
}
