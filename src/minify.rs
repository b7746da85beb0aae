//! HTML minification.
//!
//! Delegates to [`minify_html`], which collapses whitespace, drops comments,
//! and minifies inline CSS and JS.

use crate::config::MinifyConfig;
use minify_html::{Cfg, minify};

fn cfg_for(config: &MinifyConfig) -> Cfg {
    let mut cfg = Cfg::new();
    cfg.minify_css = config.minify_css;
    cfg.minify_js = config.minify_js;
    cfg.keep_comments = config.keep_comments;
    cfg
}

/// Minify a composed page. Returns the input unchanged when disabled.
pub fn minify_html(html: &str, config: &MinifyConfig) -> String {
    if !config.enabled {
        return html.to_string();
    }
    let minified = minify(html.as_bytes(), &cfg_for(config));
    // minify-html only ever emits UTF-8 for UTF-8 input.
    String::from_utf8_lossy(&minified).into_owned()
}
