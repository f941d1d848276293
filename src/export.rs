use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::PrintSize;
use crate::foundation::error::{FrameError, FrameResult};

/// Avoid pathological allocations from absurd print sizes.
const MAX_DIM: u32 = 16_384;

/// How an export is rasterized.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOpts {
    /// Physical output size; fixes the pixel dimensions.
    pub print: PrintSize,
    /// Straight-alpha RGBA painted under the composite; `None` keeps transparency.
    pub background: Option<[u8; 4]>,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files, on top of the system fonts.
    pub font_dirs: Vec<PathBuf>,
}

/// A flattened export.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// Write the PNG to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> FrameResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Rasterize SVG text to a PNG at exactly the print pixel size.
///
/// The document is stretched to the output on each axis independently, so the frame's aspect
/// ratio should match the print's.
pub fn render_svg_png(svg: &str, opts: &ExportOpts) -> FrameResult<ExportedImage> {
    let (width, height) = opts.print.pixels()?;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(FrameError::render(format!(
            "export size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let usvg_opts = usvg::Options {
        fontdb: build_fontdb(&opts.font_dirs),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &usvg_opts)
        .map_err(|e| FrameError::render(format!("parse overlay svg: {e}")))?;
    let size = tree.size();

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FrameError::render("failed to allocate export pixmap"))?;
    if let Some([r, g, b, a]) = opts.background {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let straight: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| FrameError::render("export buffer size mismatch"))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode export png")?;

    tracing::debug!(width, height, bytes = png.len(), "export rendered");
    Ok(ExportedImage { width, height, png })
}

fn build_fontdb(font_dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in font_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    tracing::debug!(faces = db.len(), "export fontdb ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory unreadable");
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && path.is_file() {
            let _ = db.load_font_file(&path);
        }
    }
}

/// usvg's family matching, then any loaded face, so frame text never silently disappears when
/// the requested family is not installed.
fn font_resolver() -> usvg::FontResolver<'static> {
    let select = usvg::FontResolver::default_font_selector();
    usvg::FontResolver {
        select_font: Box::new(move |font, fontdb| {
            if let Some(id) = select(font, &mut *fontdb) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
