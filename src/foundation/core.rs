use std::fmt;

use crate::foundation::error::{FrameError, FrameResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Stable identifier of a slot within a loaded frame (`slot1`, `slot2`, ...).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Identifier for the 0-based position `index` in extraction order.
    pub fn from_index(index: usize) -> Self {
        Self(format!("slot{}", index + 1))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Host-assigned pointer identifier (mouse, pen or one touch contact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// The `viewBox` of a frame document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewBox {
    /// Left edge of the coordinate space.
    pub min_x: f64,
    /// Top edge of the coordinate space.
    pub min_y: f64,
    /// Width in user units.
    pub width: f64,
    /// Height in user units.
    pub height: f64,
}

impl ViewBox {
    /// Zero-sized box at the origin.
    pub const ZERO: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Parse `"min-x min-y width height"` (whitespace and/or comma separated).
    ///
    /// Returns `None` unless exactly four finite numbers with non-negative size are present.
    pub fn parse(s: &str) -> Option<Self> {
        let nums = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()?;
        let [min_x, min_y, width, height] = nums.as_slice() else {
            return None;
        };
        if *width < 0.0 || *height < 0.0 {
            return None;
        }
        Some(Self {
            min_x: *min_x,
            min_y: *min_y,
            width: *width,
            height: *height,
        })
    }

    /// Box of the given size anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    /// Origin of the document coordinate space.
    pub fn origin(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Size of the box.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Physical output size of an export.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrintSize {
    /// Output width in millimetres.
    pub width_mm: f64,
    /// Output height in millimetres.
    pub height_mm: f64,
    /// Print resolution in dots per inch.
    pub dpi: f64,
}

impl Default for PrintSize {
    /// 4x6 inch photo print at 300 DPI.
    fn default() -> Self {
        Self {
            width_mm: 101.6,
            height_mm: 152.4,
            dpi: 300.0,
        }
    }
}

impl PrintSize {
    /// Output dimensions in pixels: `round(mm / 25.4 * dpi)` per axis.
    pub fn pixels(self) -> FrameResult<(u32, u32)> {
        fn to_px(mm: f64, dpi: f64) -> FrameResult<u32> {
            let px = (mm / 25.4 * dpi).round();
            if !px.is_finite() || px < 1.0 || px > f64::from(u32::MAX) {
                return Err(FrameError::validation(format!(
                    "print size {mm}mm at {dpi}dpi does not give a usable pixel size"
                )));
            }
            Ok(px as u32)
        }

        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(FrameError::validation("print dpi must be finite and > 0"));
        }
        Ok((
            to_px(self.width_mm, self.dpi)?,
            to_px(self.height_mm, self.dpi)?,
        ))
    }
}

/// Logo color as a normalized `#rrggbb` string.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogoColor(String);

impl LogoColor {
    /// Parse `#rgb` or `#rrggbb` (case-insensitive).
    pub fn parse(s: &str) -> FrameResult<Self> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| FrameError::validation(format!("logo color '{s}' is not a hex color")))?;
        let full = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => {
                return Err(FrameError::validation(format!(
                    "logo color '{s}' must have 3 or 6 hex digits"
                )));
            }
        };
        Ok(Self(format!("#{}", full.to_ascii_lowercase())))
    }

    /// Borrow the `#rrggbb` text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Straight-alpha RGB channels.
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[1 + 2 * i..3 + 2 * i], 16).unwrap_or(0);
        [channel(0), channel(1), channel(2)]
    }
}

impl TryFrom<String> for LogoColor {
    type Error = FrameError;

    fn try_from(s: String) -> FrameResult<Self> {
        Self::parse(&s)
    }
}

impl From<LogoColor> for String {
    fn from(c: LogoColor) -> Self {
        c.0
    }
}

impl fmt::Display for LogoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
