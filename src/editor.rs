use crate::config::EditorConfig;
use crate::export::{ExportedImage, render_svg_png};
use crate::foundation::core::{LogoColor, Point, PointerId, Rect, Size, SlotId, Vec2};
use crate::foundation::error::{FrameError, FrameResult};
use crate::frame::FrameDefinition;
use crate::frame::extract::Slot;
use crate::frame::source::FrameSource;
use crate::geometry::{ViewportMapping, cover_fit};
use crate::overlay::binder::{
    apply_logo_color, bind_markers, ensure_defs, ensure_photo_layer, find_logo, raise_logo,
};
use crate::overlay::insert::{append_image, decode_photo, upsert_clip, write_rect};
use crate::overlay::scene::{NodeId, Scene};
use crate::session::{PlacedImage, Session};

/// A frame mounted into the live overlay.
#[derive(Clone, Debug)]
struct LoadedFrame {
    def: FrameDefinition,
    scene: Scene,
    defs: NodeId,
    layer: NodeId,
    logo: Option<NodeId>,
}

/// Photo-frame editor controller.
///
/// Owns the live overlay of the current frame and the [`Session`] state, and is the single entry
/// point for host events. Every event handler takes `&mut self`, so events apply strictly in the
/// order the host delivers them.
#[derive(Clone, Debug)]
pub struct Editor {
    config: EditorConfig,
    frame: Option<LoadedFrame>,
    session: Session,
    viewport: Option<Size>,
    mapping: ViewportMapping,
    logo_override: Option<LogoColor>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with no frame loaded.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            frame: None,
            session: Session::default(),
            viewport: None,
            mapping: ViewportMapping::default(),
            logo_override: None,
        }
    }

    /// Editor configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The loaded frame definition, if any.
    pub fn frame(&self) -> Option<&FrameDefinition> {
        self.frame.as_ref().map(|f| &f.def)
    }

    /// Slots of the loaded frame.
    pub fn slots(&self) -> &[Slot] {
        self.session.slots()
    }

    /// Fetch `name` from `source` and load it.
    ///
    /// On failure the previously loaded frame and its session are left untouched.
    #[tracing::instrument(skip(self, source))]
    pub fn load_frame(&mut self, source: &dyn FrameSource, name: &str) -> FrameResult<()> {
        let bytes = source.fetch(name)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| FrameError::parse(format!("frame '{name}' is not UTF-8: {e}")))?;
        self.load_frame_text(name, &text)
    }

    /// Load an already fetched frame document, replacing the session wholesale.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn load_frame_text(&mut self, name: &str, text: &str) -> FrameResult<()> {
        let def = FrameDefinition::parse(name, text)?;
        let mut scene = Scene::parse(text)?;

        let markers = bind_markers(&mut scene, def.markers());
        let defs = ensure_defs(&mut scene);
        let layer = ensure_photo_layer(&mut scene, &markers);
        let logo = find_logo(&scene);

        let mut frame = LoadedFrame {
            def,
            scene,
            defs,
            layer,
            logo,
        };
        if let Some(logo) = frame.logo {
            let color = self
                .logo_override
                .as_ref()
                .or(frame.def.default_logo_color());
            if let Some(color) = color {
                apply_logo_color(&mut frame.scene, logo, color);
            }
            raise_logo(&mut frame.scene, logo);
        }

        self.session = Session::new(frame.def.slots(), &markers);
        tracing::debug!(
            slots = self.session.slots().len(),
            bound = markers.len(),
            "frame loaded"
        );
        self.frame = Some(frame);
        self.refresh_mapping();
        Ok(())
    }

    /// Set the on-screen size (host pixels) the overlay is displayed at.
    ///
    /// Pointer positions passed to event handlers are in this space. Without a viewport, pointer
    /// positions are taken as document coordinates.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some(Size::new(width, height));
        self.refresh_mapping();
    }

    fn refresh_mapping(&mut self) {
        let view_box = self.frame.as_ref().map(|f| f.def.view_box());
        self.mapping = match (view_box, self.viewport) {
            (Some(vb), Some(viewport)) => ViewportMapping::new(vb, viewport),
            _ => ViewportMapping::default(),
        };
    }

    /// Convert a host point into frame coordinates (view-box origin at `(0, 0)`).
    pub fn to_frame_point(&self, p: Point) -> Point {
        let mapped = self.mapping.to_frame(p);
        match (&self.frame, self.viewport) {
            // without a viewport the host already speaks document coordinates
            (Some(f), None) => mapped - f.def.view_box().origin().to_vec2(),
            _ => mapped,
        }
    }

    /// Double-click/double-tap: select the slot under `p`.
    ///
    /// Returns the selected slot; the host should then prompt for a photo.
    pub fn double_activate(&mut self, p: Point) -> Option<SlotId> {
        let p = self.to_frame_point(p);
        let id = self.session.slot_at(p)?.id.clone();
        self.session.set_active(Some(id.clone()));
        Some(id)
    }

    /// Select (or clear) the active slot directly.
    pub fn set_active_slot(&mut self, id: Option<SlotId>) {
        self.session.set_active(id);
    }

    /// Pointer pressed: start dragging the photo under `p`, if any.
    pub fn pointer_down(&mut self, pointer: PointerId, p: Point) -> bool {
        let p = self.to_frame_point(p);
        self.session.begin_drag(pointer, p)
    }

    /// Pointer moved: continue this pointer's drag.
    pub fn pointer_move(&mut self, pointer: PointerId, p: Point) -> bool {
        let p = self.to_frame_point(p);
        match self.session.drag_to(pointer, p) {
            Some(slot) => {
                self.sync_placement(&slot);
                true
            }
            None => false,
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, pointer: PointerId) {
        self.session.end_drag(pointer);
    }

    /// Pointer cancelled by the host.
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        self.session.end_drag(pointer);
    }

    /// Wheel/pinch over `p`: zoom in for `delta_y < 0`, out for `delta_y > 0`.
    pub fn wheel(&mut self, p: Point, delta_y: f64) -> bool {
        let p = self.to_frame_point(p);
        match self.session.zoom_at(p, delta_y, self.config.zoom_step) {
            Some(slot) => {
                self.sync_placement(&slot);
                true
            }
            None => false,
        }
    }

    /// Insert a photo into the active slot.
    ///
    /// Returns `Ok(None)` without touching anything when no slot is active or the active slot has
    /// no live marker. Decode failures are errors and leave the session unchanged.
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn insert_image(&mut self, bytes: &[u8]) -> FrameResult<Option<SlotId>> {
        let Some(slot) = self.session.active().cloned() else {
            tracing::debug!("no active slot; ignoring photo");
            return Ok(None);
        };
        if !self.session.is_bound(&slot) {
            tracing::debug!(%slot, "active slot has no live marker; ignoring photo");
            return Ok(None);
        }
        let Some(slot_rect) = self.session.slot(&slot).map(|s| s.rect) else {
            return Ok(None);
        };
        let Some(frame) = self.frame.as_mut() else {
            return Ok(None);
        };

        let photo = decode_photo(bytes)?;
        let (rect, scale) = cover_fit(slot_rect, photo.natural);
        let offset = frame.def.view_box().origin().to_vec2();

        let clip = upsert_clip(&mut frame.scene, frame.defs, &slot, slot_rect + offset);
        let node = append_image(
            &mut frame.scene,
            frame.layer,
            &slot,
            &photo,
            rect + offset,
            &clip,
        );
        let placed = PlacedImage {
            natural: photo.natural,
            rect,
            scale,
            node,
        };
        if let Some(old) = self.session.place(&slot, placed) {
            frame.scene.remove(old.node);
        }
        if let Some(logo) = frame.logo {
            raise_logo(&mut frame.scene, logo);
        }
        tracing::debug!(%slot, scale, "photo inserted");
        Ok(Some(slot))
    }

    /// Select `slot` and insert a photo into it.
    pub fn insert_image_into(
        &mut self,
        slot: &SlotId,
        bytes: &[u8],
    ) -> FrameResult<Option<SlotId>> {
        self.session.set_active(Some(slot.clone()));
        self.insert_image(bytes)
    }

    /// Set the logo color. The choice persists across frame loads until changed again.
    pub fn set_logo_color(&mut self, color: LogoColor) {
        if let Some(frame) = self.frame.as_mut()
            && let Some(logo) = frame.logo
        {
            apply_logo_color(&mut frame.scene, logo, &color);
        }
        self.logo_override = Some(color);
    }

    /// The user-chosen logo color, if one was set.
    pub fn logo_color(&self) -> Option<&LogoColor> {
        self.logo_override.as_ref()
    }

    /// Serialize the live overlay (template plus photos, clips and logo color).
    pub fn overlay_svg(&self) -> Option<String> {
        self.frame.as_ref().map(|f| f.scene.to_svg_string())
    }

    /// Render the live overlay at the configured print size.
    #[tracing::instrument(skip(self))]
    pub fn export_png(&self) -> FrameResult<ExportedImage> {
        let svg = self
            .overlay_svg()
            .ok_or_else(|| FrameError::validation("no frame loaded"))?;
        render_svg_png(&svg, &self.config.export_opts())
    }

    fn sync_placement(&mut self, slot: &SlotId) {
        let (Some(frame), Some(image)) = (self.frame.as_mut(), self.session.image(slot)) else {
            return;
        };
        let offset: Vec2 = frame.def.view_box().origin().to_vec2();
        let rect: Rect = image.rect + offset;
        write_rect(&mut frame.scene, image.node, rect);
    }
}

#[cfg(test)]
#[path = "../tests/unit/editor.rs"]
mod tests;
