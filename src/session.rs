//! Per-frame editing state: slots, the active selection, placed photos and drag sessions.
//!
//! The session is pure state. It never touches the overlay; the editor writes the slots it reports
//! as changed back into the scene.

use std::collections::{BTreeMap, HashMap};

use crate::foundation::core::{Point, PointerId, Rect, Size, SlotId};
use crate::frame::extract::Slot;
use crate::geometry::{clamp_rect_to_container, cover_scale};
use crate::overlay::scene::NodeId;

/// A photo placed in a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedImage {
    /// Natural pixel size of the photo.
    pub natural: Size,
    /// Current placement in frame coordinates. Always covers the owning slot.
    pub rect: Rect,
    /// Current uniform scale relative to `natural`.
    pub scale: f64,
    pub(crate) node: NodeId,
}

/// In-progress drag of one placed photo by one pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    /// Slot whose photo is being dragged (and which constrains it).
    pub slot: SlotId,
    /// Photo placement when the drag started.
    pub start_rect: Rect,
    /// Pointer position (frame coordinates) when the drag started.
    pub start_point: Point,
    /// Most recent pointer position of this drag.
    pub last_point: Point,
}

#[derive(Clone, Debug)]
struct SlotRecord {
    slot: Slot,
    marker: Option<NodeId>,
    image: Option<PlacedImage>,
}

/// Editing state for one loaded frame.
#[derive(Clone, Debug, Default)]
pub struct Session {
    slots: Vec<Slot>,
    index: BTreeMap<SlotId, SlotRecord>,
    active: Option<SlotId>,
    drags: HashMap<PointerId, DragSession>,
    // paint order of placed photos, bottom to top
    stacking: Vec<SlotId>,
}

impl Session {
    /// Fresh session over `slots`. `markers` maps slots to their live marker elements.
    pub(crate) fn new(slots: Vec<Slot>, markers: &BTreeMap<SlotId, NodeId>) -> Self {
        let index = slots
            .iter()
            .map(|s| {
                let record = SlotRecord {
                    slot: s.clone(),
                    marker: markers.get(&s.id).copied(),
                    image: None,
                };
                (s.id.clone(), record)
            })
            .collect();
        Self {
            slots,
            index,
            ..Self::default()
        }
    }

    /// Slots in extraction order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Look up a slot by id.
    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.index.get(id).map(|r| &r.slot)
    }

    /// The slot selected for the next photo, if any.
    pub fn active(&self) -> Option<&SlotId> {
        self.active.as_ref()
    }

    /// Select `id` as the active slot. Unknown ids clear the selection.
    pub fn set_active(&mut self, id: Option<SlotId>) {
        self.active = id.filter(|id| self.index.contains_key(id));
    }

    /// Photo placed in `id`, if any.
    pub fn image(&self, id: &SlotId) -> Option<&PlacedImage> {
        self.index.get(id).and_then(|r| r.image.as_ref())
    }

    /// Slots holding a photo, bottom to top.
    pub fn filled_slots(&self) -> &[SlotId] {
        &self.stacking
    }

    /// Active drag session of `pointer`, if any.
    pub fn drag(&self, pointer: PointerId) -> Option<&DragSession> {
        self.drags.get(&pointer)
    }

    pub(crate) fn is_bound(&self, id: &SlotId) -> bool {
        self.index.get(id).is_some_and(|r| r.marker.is_some())
    }

    /// First slot (extraction order) containing frame point `p`.
    pub fn slot_at(&self, p: Point) -> Option<&Slot> {
        self.slots.iter().find(|s| s.contains(p))
    }

    /// Topmost placed photo whose visible (clipped) area contains `p`.
    pub fn image_at(&self, p: Point) -> Option<&SlotId> {
        self.stacking
            .iter()
            .rev()
            .find(|id| self.index.get(*id).is_some_and(|r| r.slot.contains(p)))
    }

    /// Store `image` in `id`, returning the photo it replaced.
    pub(crate) fn place(&mut self, id: &SlotId, image: PlacedImage) -> Option<PlacedImage> {
        let record = self.index.get_mut(id)?;
        let previous = record.image.replace(image);
        self.stacking.retain(|s| s != id);
        self.stacking.push(id.clone());
        self.drags.retain(|_, d| &d.slot != id);
        previous
    }

    /// Start dragging the photo under `p` with `pointer`.
    ///
    /// Returns `false` when nothing is under the point or the pointer is already dragging.
    pub fn begin_drag(&mut self, pointer: PointerId, p: Point) -> bool {
        if self.drags.contains_key(&pointer) {
            return false;
        }
        let Some(slot) = self.image_at(p).cloned() else {
            return false;
        };
        let Some(image) = self.image(&slot) else {
            return false;
        };
        let session = DragSession {
            slot,
            start_rect: image.rect,
            start_point: p,
            last_point: p,
        };
        self.drags.insert(pointer, session);
        true
    }

    /// Move the photo dragged by `pointer` so it follows `p`, clamped to its slot.
    ///
    /// Returns the slot whose photo moved.
    pub fn drag_to(&mut self, pointer: PointerId, p: Point) -> Option<SlotId> {
        let drag = self.drags.get_mut(&pointer)?;
        let record = self.index.get_mut(&drag.slot)?;
        let image = record.image.as_mut()?;

        let moved = drag.start_rect + (p - drag.start_point);
        let origin = clamp_rect_to_container(record.slot.rect, moved);
        image.rect = Rect::from_origin_size(origin, image.rect.size());
        drag.last_point = p;
        Some(drag.slot.clone())
    }

    /// End the drag of `pointer`. Idempotent.
    pub fn end_drag(&mut self, pointer: PointerId) {
        self.drags.remove(&pointer);
    }

    /// Zoom the photo under `p` by `step` (`delta_y < 0`) or `1 / step` (`delta_y > 0`).
    ///
    /// Scales about the photo's center, never below cover scale, then clamps to the slot. Drags of
    /// the same photo continue from the zoomed placement. Returns the slot whose photo changed.
    pub fn zoom_at(&mut self, p: Point, delta_y: f64, step: f64) -> Option<SlotId> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }
        let id = self.image_at(p)?.clone();
        let record = self.index.get_mut(&id)?;
        let image = record.image.as_mut()?;

        let factor = if delta_y < 0.0 { step } else { 1.0 / step };
        let min_scale = cover_scale(record.slot.rect.size(), image.natural);
        let scale = (image.scale * factor).max(min_scale);
        let size = image.natural * scale;
        let centered = Rect::from_center_size(image.rect.center(), size);
        let origin = clamp_rect_to_container(record.slot.rect, centered);

        image.rect = Rect::from_origin_size(origin, size);
        image.scale = scale;

        let rect = image.rect;
        for drag in self.drags.values_mut().filter(|d| d.slot == id) {
            drag.start_rect = rect;
            drag.start_point = drag.last_point;
        }
        Some(id)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
