use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::export::ExportOpts;
use crate::foundation::core::PrintSize;
use crate::foundation::error::{FrameError, FrameResult};
use crate::frame::catalog::DEFAULT_FRAME;

/// Editor settings, loadable from JSON. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Frame base directory.
    pub frames_dir: PathBuf,
    /// Frame loaded when none is requested.
    pub default_frame: String,
    /// Physical export size.
    pub print: PrintSize,
    /// Wheel zoom ratio per step (> 1).
    pub zoom_step: f64,
    /// Straight-alpha RGBA painted under the composite; `None` keeps transparency.
    pub background: Option<[u8; 4]>,
    /// File name used when saving an export without an explicit path.
    pub output_name: String,
    /// Extra font directories for frame text, searched after the system fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from("frames"),
            default_frame: DEFAULT_FRAME.to_string(),
            print: PrintSize::default(),
            zoom_step: 1.1,
            background: Some([0x11, 0x11, 0x11, 0xff]),
            output_name: "photo_frame.png".to_string(),
            font_dirs: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FrameResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| FrameError::validation(format!("parse editor config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FrameResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FrameError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> FrameResult<()> {
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(FrameError::validation("zoom_step must be finite and > 1"));
        }
        if self.default_frame.trim().is_empty() {
            return Err(FrameError::validation("default_frame must be non-empty"));
        }
        if self.output_name.trim().is_empty() {
            return Err(FrameError::validation("output_name must be non-empty"));
        }
        self.print.pixels()?;
        Ok(())
    }

    /// Export options derived from this config.
    pub fn export_opts(&self) -> ExportOpts {
        ExportOpts {
            print: self.print,
            background: self.background,
            font_dirs: self.font_dirs.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
