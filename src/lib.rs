//! photoframe is the editing core of a photo-collage frame tool.
//!
//! A frame is an SVG template whose marker groups declare photo slots. The public API is
//! editor-oriented:
//!
//! - Load a frame from a [`FrameSource`] into an [`Editor`]
//! - Feed it host events (double-activation, pointer drag, wheel zoom) and photo bytes
//! - Export the live overlay as a PNG at a fixed physical print size
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Editor configuration.
pub mod config;
/// Editor controller.
pub mod editor;
/// Print-resolution rasterization.
pub mod export;
/// Frame definitions, sources and catalog.
pub mod frame;
/// Slot geometry helpers.
pub mod geometry;
/// Live overlay scene graph.
pub mod overlay;
/// Per-frame editing state.
pub mod session;

pub use crate::foundation::core::{
    Affine, LogoColor, Point, PointerId, PrintSize, Rect, Size, SlotId, Vec2, ViewBox,
};
pub use crate::foundation::error::{FrameError, FrameResult};

pub use crate::config::EditorConfig;
pub use crate::editor::Editor;
pub use crate::export::{ExportOpts, ExportedImage, render_svg_png};
pub use crate::frame::FrameDefinition;
pub use crate::frame::catalog::{DEFAULT_FRAME, list_frames};
pub use crate::frame::extract::{Slot, extract_slots};
pub use crate::frame::source::{DirSource, FrameSource, MemorySource};
pub use crate::geometry::{ViewportMapping, clamp_rect_to_container, rect_from_attributes};
pub use crate::session::{DragSession, PlacedImage, Session};
