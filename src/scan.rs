//! Sized-image discovery.
//!
//! Finds `<img>` tags that carry both `width` and `height` so the build can
//! produce a copy of the source image at exactly that size. Runs on minified
//! markup, so attribute values may be double-quoted, single-quoted, or bare,
//! and attributes may come in any order.

use crate::types::ImageRef;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// A `>` inside a quoted value does not end the tag.
static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("img pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("attribute pattern is valid")
});

/// Every `<img>` in `html` with a usable `src`, `width` and `height`, in
/// document order. Duplicates are kept; see [`dedupe_refs`].
pub fn find_sized_images(html: &str) -> Vec<ImageRef> {
    IMG_TAG_RE
        .find_iter(html)
        .filter_map(|tag| parse_img_tag(tag.as_str()))
        .collect()
}

fn parse_img_tag(tag: &str) -> Option<ImageRef> {
    // Skip the leading "<img" and trailing ">".
    let body = &tag[4..tag.len() - 1];

    let mut src = None;
    let mut width = None;
    let mut height = None;

    for caps in ATTR_RE.captures_iter(body) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str());
        let Some(value) = value else { continue };

        match caps[1].to_ascii_lowercase().as_str() {
            "src" if src.is_none() => src = Some(value),
            "width" if width.is_none() => width = Some(value),
            "height" if height.is_none() => height = Some(value),
            _ => {}
        }
    }

    Some(ImageRef {
        src: normalize_src(src?)?,
        width: parse_dimension(width?)?,
        height: parse_dimension(height?)?,
    })
}

/// Parse a pixel dimension the way HTML does: leading digits only, so
/// `"300px"` reads as 300. Zero and non-numeric values are rejected.
pub fn parse_dimension(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u32>().ok().filter(|&n| n > 0)
}

/// Reduce a `src` attribute to a path relative to the site root.
///
/// Remote and `data:` URLs yield `None`. Query strings and fragments are
/// dropped, `&amp;` and percent-escapes are decoded, and a leading `/` is
/// treated as site-root relative. Empty and `.` segments are removed so
/// `./images/a.jpg` and `images/./a.jpg` both read as `images/a.jpg`; `..`
/// segments are kept for the caller to reject.
pub fn normalize_src(src: &str) -> Option<String> {
    let src = src.trim();
    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("//")
        || lower.starts_with("data:")
    {
        return None;
    }

    let end = src.find(['?', '#']).unwrap_or(src.len());
    let raw = src[..end].replace("&amp;", "&");
    let decoded = urlencoding::decode(&raw).ok()?;

    let path = decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    (!path.is_empty()).then_some(path)
}

/// Keep the first reference to each `src`.
///
/// A later reference asking for different dimensions cannot be honored
/// (both would write the same output file), so it is logged and dropped.
pub fn dedupe_refs(refs: impl IntoIterator<Item = ImageRef>) -> Vec<ImageRef> {
    let mut seen: HashMap<String, (u32, u32)> = HashMap::new();
    let mut unique = Vec::new();

    for r in refs {
        match seen.get(&r.src) {
            Some(&(w, h)) if (w, h) != (r.width, r.height) => {
                tracing::warn!(
                    "{} is referenced at {}x{} and {}x{}; keeping {}x{}",
                    r.src,
                    w,
                    h,
                    r.width,
                    r.height,
                    w,
                    h
                );
            }
            Some(_) => {}
            None => {
                seen.insert(r.src.clone(), (r.width, r.height));
                unique.push(r);
            }
        }
    }
    unique
}
