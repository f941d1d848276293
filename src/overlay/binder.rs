use std::collections::BTreeMap;

use crate::foundation::core::{LogoColor, SlotId};
use crate::frame::extract::Marker;
use crate::overlay::scene::{NodeId, Scene};

/// Attribute tagging live marker and image elements with their slot id.
pub const SLOT_ATTR: &str = "data-slot";

/// Id of the group that holds placed photos.
pub const PHOTO_LAYER_ID: &str = "photoframe-photos";

/// Hide every marker's fill and tag it with its slot id.
///
/// Returns the live marker element of each slot. Markers the scene did not import are skipped.
pub(crate) fn bind_markers(scene: &mut Scene, markers: &[Marker]) -> BTreeMap<SlotId, NodeId> {
    let mut bound = BTreeMap::new();
    for marker in markers {
        let Some(node) = scene.node_from_source(marker.source) else {
            tracing::debug!(slot = %marker.slot.id, "slot marker missing from live overlay");
            continue;
        };
        scene.set_style_property(node, "fill", "none");
        scene.set_attr(node, SLOT_ATTR, marker.slot.id.as_str());
        bound.insert(marker.slot.id.clone(), node);
    }
    bound
}

/// The root-level `<defs>`, created as the first root child if absent.
pub(crate) fn ensure_defs(scene: &mut Scene) -> NodeId {
    let root = scene.root();
    if let Some(defs) = scene
        .children(root)
        .iter()
        .copied()
        .find(|c| scene.name(*c) == Some("defs"))
    {
        return defs;
    }
    let defs = scene.create_element("defs", &[]);
    scene.insert_child(root, 0, defs);
    defs
}

/// The photo layer, created if absent.
///
/// It is placed right after the last top-level subtree holding a slot marker, so frame decoration
/// that follows the slots in document order keeps painting above the photos. Without markers the
/// layer goes at the end of the root.
pub(crate) fn ensure_photo_layer(
    scene: &mut Scene,
    markers: &BTreeMap<SlotId, NodeId>,
) -> NodeId {
    if let Some(layer) = scene.find_by_attr("id", PHOTO_LAYER_ID) {
        return layer;
    }
    let root = scene.root();
    let view: &Scene = scene;
    let index = markers
        .values()
        .filter_map(|m| top_level_ancestor(view, *m))
        .filter_map(|top| view.children(root).iter().position(|c| *c == top))
        .max()
        .map_or(view.children(root).len(), |i| i + 1);

    let layer = scene.create_element("g", &[("id", PHOTO_LAYER_ID.to_string())]);
    scene.insert_child(root, index, layer);
    layer
}

fn top_level_ancestor(scene: &Scene, node: NodeId) -> Option<NodeId> {
    let root = scene.root();
    let mut top = node;
    while let Some(parent) = scene.parent(top) {
        if parent == root {
            return Some(top);
        }
        top = parent;
    }
    None
}

/// First element labelled as the logo (`id`, `class` or `data-name` containing `logo`).
pub(crate) fn find_logo(scene: &Scene) -> Option<NodeId> {
    scene.descendants(scene.root()).into_iter().find(|n| {
        ["id", "class", "data-name"]
            .into_iter()
            .filter_map(|a| scene.attr(*n, a))
            .any(|v| v.to_ascii_lowercase().contains("logo"))
    })
}

/// Move the logo's top-level subtree to the end of the root so it paints above photos.
///
/// The top-level ancestor moves rather than the logo itself so inherited transforms stay intact.
pub(crate) fn raise_logo(scene: &mut Scene, logo: NodeId) {
    if let Some(top) = top_level_ancestor(scene, logo) {
        scene.raise(top);
    }
}

/// Recolor the logo subtree.
///
/// The logo element always gets the fill; descendants only where their fill (or stroke) is not
/// `none`. Inline style is used so stylesheet class rules cannot override it.
pub(crate) fn apply_logo_color(scene: &mut Scene, logo: NodeId, color: &LogoColor) {
    for node in scene.descendants(logo) {
        if scene.name(node).is_none() {
            continue;
        }
        let fill = scene.presentation(node, "fill");
        if node == logo || fill.as_deref() != Some("none") {
            scene.set_style_property(node, "fill", color.as_str());
        }
        if scene
            .presentation(node, "stroke")
            .is_some_and(|s| s != "none")
        {
            scene.set_style_property(node, "stroke", color.as_str());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/binder.rs"]
mod tests;
