use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::{Rect, Size, SlotId};
use crate::foundation::error::{FrameError, FrameResult};
use crate::overlay::binder::SLOT_ATTR;
use crate::overlay::scene::{NodeId, Scene};

/// A decoded user photo, ready to embed into the overlay.
#[derive(Clone, Debug)]
pub struct DecodedPhoto {
    /// Natural pixel size.
    pub natural: Size,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl DecodedPhoto {
    /// `data:` URI embedding the photo.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Decode a user-chosen image file.
///
/// PNG, JPEG and GIF are embedded as-is; any other format `image` can read is re-encoded as PNG so
/// the rasterizer can consume it.
pub fn decode_photo(bytes: &[u8]) -> FrameResult<DecodedPhoto> {
    let format = image::guess_format(bytes)
        .map_err(|e| FrameError::decode(format!("unrecognized image format: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| FrameError::decode(format!("decode image: {e}")))?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(FrameError::decode("image has zero size"));
    }
    let natural = Size::new(f64::from(width), f64::from(height));

    let passthrough = match format {
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::Gif => Some("image/gif"),
        _ => None,
    };
    if let Some(mime) = passthrough {
        return Ok(DecodedPhoto {
            natural,
            mime,
            bytes: bytes.to_vec(),
        });
    }

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img.to_rgba8())
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("re-encode photo as png")?;
    Ok(DecodedPhoto {
        natural,
        mime: "image/png",
        bytes: png,
    })
}

/// Id of the clip path bounding `slot`'s photo.
pub fn clip_id(slot: &SlotId) -> String {
    format!("photoframe-clip-{slot}")
}

/// Create, or update in place, the clip path of `slot` so it equals `rect` (document coordinates).
pub(crate) fn upsert_clip(scene: &mut Scene, defs: NodeId, slot: &SlotId, rect: Rect) -> String {
    let id = clip_id(slot);
    let clip = match scene.find_by_attr("id", &id) {
        Some(clip) => clip,
        None => {
            let clip = scene.create_element(
                "clipPath",
                &[
                    ("id", id.clone()),
                    ("clipPathUnits", "userSpaceOnUse".to_string()),
                ],
            );
            scene.append_child(defs, clip);
            clip
        }
    };

    let shape = match scene.children(clip).first().copied() {
        Some(shape) => shape,
        None => {
            let shape = scene.create_element("rect", &[]);
            scene.append_child(clip, shape);
            shape
        }
    };
    write_rect(scene, shape, rect);
    id
}

/// Append a new `<image>` for `slot` to `layer`.
pub(crate) fn append_image(
    scene: &mut Scene,
    layer: NodeId,
    slot: &SlotId,
    photo: &DecodedPhoto,
    rect: Rect,
    clip: &str,
) -> NodeId {
    let node = scene.create_element(
        "image",
        &[
            (SLOT_ATTR, slot.to_string()),
            ("preserveAspectRatio", "none".to_string()),
            ("clip-path", format!("url(#{clip})")),
            ("href", photo.data_uri()),
        ],
    );
    write_rect(scene, node, rect);
    scene.append_child(layer, node);
    node
}

/// Write `x`/`y`/`width`/`height` of `node`.
pub(crate) fn write_rect(scene: &mut Scene, node: NodeId, rect: Rect) {
    scene.set_attr(node, "x", fmt_num(rect.x0));
    scene.set_attr(node, "y", fmt_num(rect.y0));
    scene.set_attr(node, "width", fmt_num(rect.width()));
    scene.set_attr(node, "height", fmt_num(rect.height()));
}

fn fmt_num(v: f64) -> String {
    // shortest round-trip representation; avoids `-0`
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/insert.rs"]
mod tests;
