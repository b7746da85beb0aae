//! Component inlining.
//!
//! A page pulls in shared fragments with a placeholder element:
//!
//! ```html
//! <component src="header.html"></component>
//! <component src="footer.html" />
//! ```
//!
//! Each placeholder is replaced by the verbatim contents of
//! `<components_dir>/<src>`. Replacement is a single pass: a fragment that
//! itself contains placeholders is inserted as-is and never expanded.

use crate::config::is_contained_relative;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("component '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("component '{0}' must be a relative path inside the components directory")]
    InvalidName(String),
    #[error("failed to read component {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<component\s+src\s*=\s*"([^"]+)"\s*(?:/>|>\s*</component\s*>)"#,
    )
    .expect("component pattern is valid")
});

/// A page with its components inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub html: String,
    /// Component names in document order, one entry per placeholder.
    pub components: Vec<String>,
}

/// Inline every component placeholder in `html`.
pub fn compose_page(html: &str, components_dir: &Path) -> Result<Composed, ComposeError> {
    let mut out = String::with_capacity(html.len());
    let mut components = Vec::new();
    let mut last = 0;

    for caps in COMPONENT_RE.captures_iter(html) {
        let whole = caps.get(0).expect("group 0 always matches");
        let name = &caps[1];

        out.push_str(&html[last..whole.start()]);
        out.push_str(&read_component(components_dir, name)?);
        last = whole.end();

        components.push(name.to_string());
    }
    out.push_str(&html[last..]);

    Ok(Composed {
        html: out,
        components,
    })
}

fn read_component(components_dir: &Path, name: &str) -> Result<String, ComposeError> {
    if !is_contained_relative(Path::new(name)) {
        return Err(ComposeError::InvalidName(name.to_string()));
    }
    let path = components_dir.join(name);
    if !path.is_file() {
        return Err(ComposeError::NotFound {
            name: name.to_string(),
            path,
        });
    }
    tracing::debug!("Inlining component {}", name);
    fs::read_to_string(&path).map_err(|source| ComposeError::Read { path, source })
}
