//! Geometry helpers shared by slot extraction, drag/zoom and image insertion.
//!
//! All rectangles are `kurbo::Rect`s in frame coordinates, i.e. document user units translated so
//! the frame's view-box origin sits at `(0, 0)`.

use crate::foundation::core::{Affine, Point, Rect, Size, ViewBox};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// `<use>` chains longer than this are treated as unresolvable.
const MAX_USE_DEPTH: usize = 8;

/// Parse a length attribute in user units. A trailing `px` is accepted; other units are not.
pub fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolve the rectangle declared by a marker element.
///
/// Explicit `x`/`y`/`width`/`height` win (missing `x`/`y` default to `0`). A `<use>` element without
/// its own size is resolved through its `href` target, offset by the `<use>` element's `x`/`y`.
/// Returns `None` when no positive-size rectangle can be determined.
pub fn rect_from_attributes(node: roxmltree::Node<'_, '_>) -> Option<Rect> {
    rect_from_attributes_at_depth(node, 0)
}

fn rect_from_attributes_at_depth(node: roxmltree::Node<'_, '_>, depth: usize) -> Option<Rect> {
    if depth > MAX_USE_DEPTH {
        return None;
    }

    let num = |name: &str| node.attribute(name).and_then(parse_length);
    let x = num("x").unwrap_or(0.0);
    let y = num("y").unwrap_or(0.0);

    match (num("width"), num("height")) {
        (Some(w), Some(h)) => positive_rect(x, y, w, h),
        _ if node.tag_name().name() == "use" => {
            let target = href_target(node)?;
            let base = rect_from_attributes_at_depth(target, depth + 1)?;
            Some(base + crate::foundation::core::Vec2::new(x, y))
        }
        _ => None,
    }
}

fn positive_rect(x: f64, y: f64, w: f64, h: f64) -> Option<Rect> {
    (w > 0.0 && h > 0.0).then(|| Rect::new(x, y, x + w, y + h))
}

/// Find the element referenced by a `<use>` element's `href` (or legacy `xlink:href`).
pub fn href_target<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
) -> Option<roxmltree::Node<'a, 'input>> {
    let href = node
        .attribute("href")
        .or_else(|| node.attribute((XLINK_NS, "href")))?;
    let id = href.trim().strip_prefix('#')?;
    node.document()
        .descendants()
        .find(|n| n.is_element() && n.attribute("id") == Some(id))
}

/// Closest position for `moving` (at its current size) such that it stays within `container`.
///
/// Per axis: `x = min(container.x, max(container.x + container.w - moving.w, moving.x))`. When
/// `moving` is larger than `container` it keeps covering it; when smaller it pins to the
/// container origin on that axis.
pub fn clamp_rect_to_container(container: Rect, moving: Rect) -> Point {
    let x = container
        .x0
        .min((container.x0 + container.width() - moving.width()).max(moving.x0));
    let y = container
        .y0
        .min((container.y0 + container.height() - moving.height()).max(moving.y0));
    Point::new(x, y)
}

/// Smallest uniform scale at which an image of `natural` size covers `slot` on both axes.
pub fn cover_scale(slot: Size, natural: Size) -> f64 {
    (slot.width / natural.width).max(slot.height / natural.height)
}

/// Cover-fit placement of an image of `natural` size over `slot`, centered.
///
/// Returns the placement rectangle and the scale that produced it.
pub fn cover_fit(slot: Rect, natural: Size) -> (Rect, f64) {
    let scale = cover_scale(slot.size(), natural);
    let size = natural * scale;
    let origin = Point::new(
        slot.x0 + (slot.width() - size.width) / 2.0,
        slot.y0 + (slot.height() - size.height) / 2.0,
    );
    (Rect::from_origin_size(origin, size), scale)
}

/// Maps host (on-screen preview) pixel coordinates into frame coordinates.
///
/// The frame is fitted into the viewport with `xMidYMid meet` semantics, which is how the overlay
/// SVG is displayed by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMapping {
    to_frame: Affine,
}

impl Default for ViewportMapping {
    fn default() -> Self {
        Self {
            to_frame: Affine::IDENTITY,
        }
    }
}

impl ViewportMapping {
    /// Mapping for a frame with `view_box` displayed in a `viewport` of host pixels.
    ///
    /// Degenerate sizes fall back to the identity mapping.
    pub fn new(view_box: ViewBox, viewport: Size) -> Self {
        if view_box.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Self::default();
        }
        let s = (viewport.width / view_box.width).min(viewport.height / view_box.height);
        let tx = (viewport.width - view_box.width * s) / 2.0;
        let ty = (viewport.height - view_box.height * s) / 2.0;
        let to_viewport = Affine::translate((tx, ty)) * Affine::scale(s);
        Self {
            to_frame: to_viewport.inverse(),
        }
    }

    /// Convert a host point into frame coordinates.
    pub fn to_frame(&self, p: Point) -> Point {
        self.to_frame * p
    }
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
