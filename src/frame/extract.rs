use crate::foundation::core::{Point, Rect, SlotId, ViewBox};
use crate::geometry::rect_from_attributes;

/// A named rectangular region of a frame that holds one photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slot {
    /// `slot1`, `slot2`, ... in extraction order.
    pub id: SlotId,
    /// Slot bounds in frame coordinates (view-box origin at `(0, 0)`).
    pub rect: Rect,
}

/// A slot together with the byte offset of the marker element that declared it.
///
/// The offset identifies the same element across independent parses of the same document text,
/// which is how the live overlay finds the marker to tag.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Marker {
    pub(crate) slot: Slot,
    pub(crate) source: usize,
}

/// Containers whose descendants are templates rather than placed geometry.
const TEMPLATE_CONTAINERS: &[&str] = &["defs", "clipPath", "symbol", "mask", "pattern"];

/// Extract the ordered slot list from a parsed frame document.
pub fn extract_slots(doc: &roxmltree::Document<'_>) -> Vec<Slot> {
    extract_markers(doc).into_iter().map(|m| m.slot).collect()
}

pub(crate) fn extract_markers(doc: &roxmltree::Document<'_>) -> Vec<Marker> {
    let origin = read_view_box(doc.root_element()).origin().to_vec2();

    let candidates: Vec<roxmltree::Node<'_, '_>> = doc
        .descendants()
        .filter(|n| matches!(n.tag_name().name(), "rect" | "use"))
        .filter(|n| !is_template(*n))
        .filter(|n| n.ancestors().skip(1).any(is_marker_group))
        .collect();

    let named: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|n| has_slot_name(*n))
        .collect();
    let chosen = if named.is_empty() { candidates } else { named };

    chosen
        .into_iter()
        .filter_map(|n| match rect_from_attributes(n) {
            Some(rect) => Some((rect - origin, n.range().start)),
            None => {
                tracing::debug!(
                    id = n.attribute("id").unwrap_or(""),
                    offset = n.range().start,
                    "dropping slot marker without resolvable geometry"
                );
                None
            }
        })
        .enumerate()
        .map(|(i, (rect, source))| Marker {
            slot: Slot {
                id: SlotId::from_index(i),
                rect,
            },
            source,
        })
        .collect()
}

/// Read the frame's view box, falling back to root `width`/`height`, then to a zero box.
pub fn read_view_box(root: roxmltree::Node<'_, '_>) -> ViewBox {
    if let Some(vb) = root.attribute("viewBox").and_then(ViewBox::parse) {
        return vb;
    }
    let dim = |name: &str| {
        root.attribute(name)
            .and_then(crate::geometry::parse_length)
            .filter(|v| *v > 0.0)
    };
    match (dim("width"), dim("height")) {
        (Some(w), Some(h)) => ViewBox::from_size(w, h),
        _ => {
            tracing::debug!("frame has no usable viewBox or size; using an empty box");
            ViewBox::ZERO
        }
    }
}

/// The naming attributes an authoring tool may use to label an element.
pub(crate) fn name_hints<'a>(node: roxmltree::Node<'a, '_>) -> impl Iterator<Item = &'a str> {
    ["id", "class", "data-name"]
        .into_iter()
        .filter_map(move |a| node.attribute(a))
}

fn is_marker_group(node: roxmltree::Node<'_, '_>) -> bool {
    node.is_element()
        && node.tag_name().name() == "g"
        && name_hints(node).any(|v| v.to_ascii_lowercase().contains("slot"))
}

fn is_template(node: roxmltree::Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| TEMPLATE_CONTAINERS.contains(&a.tag_name().name()))
}

fn has_slot_name(node: roxmltree::Node<'_, '_>) -> bool {
    ["id", "data-name"]
        .into_iter()
        .filter_map(|a| node.attribute(a))
        .any(|v| v.to_ascii_lowercase().starts_with("slot"))
}

impl Slot {
    /// Return `true` when `p` lies inside the slot (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.rect.x0 && p.x <= self.rect.x1 && p.y >= self.rect.y0 && p.y <= self.rect.y1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/extract.rs"]
mod tests;
