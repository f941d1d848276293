//! Frame definitions: the SVG templates that declare photo slots, and where to find them.

/// Available frames: manifest, directory listing, default.
pub mod catalog;
/// Slot extraction from frame documents.
pub mod extract;
/// Where frame documents come from.
pub mod source;

use crate::foundation::core::{LogoColor, ViewBox};
use crate::foundation::error::{FrameError, FrameResult};

use self::extract::{Marker, Slot, extract_markers, name_hints, read_view_box};

/// Attribute a frame may carry (on its logo element or root) to declare the initial logo color.
pub const LOGO_COLOR_ATTR: &str = "data-logo-color";

/// Parse SVG/XML text into an inert document.
///
/// DTDs are allowed since several authoring tools emit a `DOCTYPE`.
pub(crate) fn parse_document(text: &str) -> FrameResult<roxmltree::Document<'_>> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, opts)
        .map_err(|e| FrameError::parse(format!("frame document is not valid XML: {e}")))?;
    if doc.root_element().tag_name().name() != "svg" {
        return Err(FrameError::parse(format!(
            "frame document root is <{}>, expected <svg>",
            doc.root_element().tag_name().name()
        )));
    }
    Ok(doc)
}

/// A parsed frame template: geometry only, no live state.
#[derive(Clone, Debug)]
pub struct FrameDefinition {
    name: String,
    view_box: ViewBox,
    markers: Vec<Marker>,
    default_logo_color: Option<LogoColor>,
    source: String,
}

impl FrameDefinition {
    /// Parse a frame document and extract its slots.
    pub fn parse(name: impl Into<String>, text: &str) -> FrameResult<Self> {
        let doc = parse_document(text)?;
        let root = doc.root_element();

        let default_logo_color = find_logo(&doc)
            .and_then(|n| n.attribute(LOGO_COLOR_ATTR))
            .or_else(|| root.attribute(LOGO_COLOR_ATTR))
            .and_then(|c| match LogoColor::parse(c) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring declared logo color");
                    None
                }
            });

        Ok(Self {
            name: name.into(),
            view_box: read_view_box(root),
            markers: extract_markers(&doc),
            default_logo_color,
            source: text.to_string(),
        })
    }

    /// Name the frame was loaded under (usually its file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The document's view box.
    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Ordered slots.
    pub fn slots(&self) -> Vec<Slot> {
        self.markers.iter().map(|m| m.slot.clone()).collect()
    }

    /// Logo color declared by the frame, if any.
    pub fn default_logo_color(&self) -> Option<&LogoColor> {
        self.default_logo_color.as_ref()
    }

    /// Original document text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// First element labelled as the logo (`id`, `class` or `data-name` containing `logo`).
pub(crate) fn find_logo<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
) -> Option<roxmltree::Node<'a, 'input>> {
    doc.descendants().find(|n| {
        n.is_element() && name_hints(*n).any(|v| v.to_ascii_lowercase().contains("logo"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/frame/definition.rs"]
mod tests;
