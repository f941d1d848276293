use crate::foundation::error::{FrameError, FrameResult};
use crate::frame::source::FrameSource;

/// Manifest listing the available frames, as a JSON array of file names.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Frame used when neither the manifest nor the directory listing yields anything.
pub const DEFAULT_FRAME: &str = "layout1.svg";

/// List available frame file names.
///
/// Tries the manifest, then scrapes the directory listing, then falls back to
/// [`DEFAULT_FRAME`]. Never fails.
#[tracing::instrument(skip(source))]
pub fn list_frames(source: &dyn FrameSource) -> Vec<String> {
    match from_manifest(source) {
        Ok(names) => return names,
        Err(e) => tracing::debug!(error = %e, "frame manifest unavailable"),
    }
    match from_listing(source) {
        Ok(names) => return names,
        Err(e) => tracing::debug!(error = %e, "frame directory listing unavailable"),
    }
    vec![DEFAULT_FRAME.to_string()]
}

fn from_manifest(source: &dyn FrameSource) -> FrameResult<Vec<String>> {
    let bytes = source.fetch(MANIFEST_NAME)?;
    let names: Vec<String> = serde_json::from_slice(&bytes)
        .map_err(|e| FrameError::parse(format!("parse {MANIFEST_NAME}: {e}")))?;
    let names: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err(FrameError::parse(format!("{MANIFEST_NAME} lists no frames")));
    }
    Ok(names)
}

fn from_listing(source: &dyn FrameSource) -> FrameResult<Vec<String>> {
    let names = scrape_svg_links(&source.listing()?);
    if names.is_empty() {
        return Err(FrameError::parse("directory listing has no .svg links"));
    }
    Ok(names)
}

/// Extract `.svg` file names from the `href` attributes of an HTML directory index.
///
/// Names are reduced to their last path segment and percent-decoded; a name that does not decode
/// is kept as written. Duplicates are dropped, first occurrence wins.
pub fn scrape_svg_links(html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find("href=") {
        rest = &rest[pos + "href=".len()..];
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        rest = &rest[1..];
        let Some(end) = rest.find(quote) else {
            break;
        };
        let href = &rest[..end];
        rest = &rest[end + 1..];

        let path = href.split(['?', '#']).next().unwrap_or("");
        let file = path.rsplit('/').next().unwrap_or("");
        let name = percent_decode(file).unwrap_or_else(|| file.to_string());
        if name.to_ascii_lowercase().ends_with(".svg") && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Decode `%XX` escapes. Returns `None` on a malformed escape or non-UTF-8 result.
pub fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
#[path = "../../tests/unit/frame/catalog.rs"]
mod tests;
