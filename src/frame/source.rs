use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::foundation::error::{FrameError, FrameResult};

/// Where frame documents and the frame manifest are fetched from.
///
/// A resource that does not exist (the HTTP equivalent of a non-2xx response) is a
/// [`FrameError::Fetch`].
pub trait FrameSource {
    /// Fetch the raw bytes of `name` relative to the frame base location.
    fn fetch(&self, name: &str) -> FrameResult<Vec<u8>>;

    /// Fetch the directory listing of the frame base location (an HTML index).
    fn listing(&self) -> FrameResult<String>;
}

/// Normalize and validate a frame name relative to the frame base location.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(name: &str) -> FrameResult<String> {
    let s = name.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FrameError::validation("frame names must be relative"));
    }

    let parts: Vec<&str> = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.contains(&"..") {
        return Err(FrameError::validation("frame names must not contain '..'"));
    }
    if parts.is_empty() {
        return Err(FrameError::validation("frame name must contain a file name"));
    }

    Ok(parts.join("/"))
}

/// Frames stored in a directory on disk.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Serve frames from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The frame base directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl FrameSource for DirSource {
    fn fetch(&self, name: &str) -> FrameResult<Vec<u8>> {
        let rel = normalize_rel_path(name)?;
        let path = self.root.join(&rel);
        std::fs::read(&path)
            .map_err(|e| FrameError::fetch(format!("read '{}': {e}", path.display())))
    }

    fn listing(&self) -> FrameResult<String> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            FrameError::fetch(format!("list '{}': {e}", self.root.display()))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();

        let mut html = String::from("<html><body><ul>\n");
        for name in &names {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                percent_encode(name),
                escape_html(name)
            );
        }
        html.push_str("</ul></body></html>\n");
        Ok(html)
    }
}

/// Frames held in memory, for embedding hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, Vec<u8>>,
    listing: Option<String>,
}

impl MemorySource {
    /// Create an empty source (every fetch fails).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    /// Set the directory listing body returned by [`FrameSource::listing`].
    pub fn set_listing(&mut self, html: impl Into<String>) -> &mut Self {
        self.listing = Some(html.into());
        self
    }
}

impl FrameSource for MemorySource {
    fn fetch(&self, name: &str) -> FrameResult<Vec<u8>> {
        let rel = normalize_rel_path(name)?;
        self.entries
            .get(&rel)
            .cloned()
            .ok_or_else(|| FrameError::fetch(format!("'{rel}' not found")))
    }

    fn listing(&self) -> FrameResult<String> {
        self.listing
            .clone()
            .ok_or_else(|| FrameError::fetch("no directory listing available"))
    }
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b))
            }
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "../../tests/unit/frame/source.rs"]
mod tests;
