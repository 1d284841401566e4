//! Markup sanitizing for user supplied text.
//!
//! A small set of formatting tags survives with an attribute allowlist; every
//! other tag (including `<script>`) is escaped so it renders as text. Angle
//! brackets outside of tags are escaped too.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^<>"']|"[^"]*"|'[^']*')*)>"#).expect("valid tag regex")
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("code", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

const LINK_ATTRS: &[&str] = &["href", "src", "cite"];

const SAFE_LINK_PREFIXES: &[&str] = &[
    "#", "/", "./", "../", "http://", "https://", "mailto:", "tel:", "ftp://",
];

fn escape_html(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr_value(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

fn is_safe_link(tag: &str, attr: &str, value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || SAFE_LINK_PREFIXES.iter().any(|prefix| value.starts_with(prefix)) {
        return true;
    }

    // Inline raster images only; svg can carry script.
    tag == "img" && attr == "src" && value.starts_with("data:image/") && !value.starts_with("data:image/svg")
}

fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
}

fn rebuild_tag(closing: bool, tag: &str, raw_attrs: &str, attrs: &[&str]) -> String {
    if closing {
        return format!("</{}>", tag);
    }

    let mut out = format!("<{}", tag);
    for cap in ATTR_RE.captures_iter(raw_attrs) {
        let name = cap[1].to_ascii_lowercase();
        if !attrs.contains(&name.as_str()) {
            continue;
        }

        let value = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4)).map(|m| m.as_str());
        match value {
            Some(v) if LINK_ATTRS.contains(&name.as_str()) && !is_safe_link(tag, &name, v) => continue,
            Some(v) => out.push_str(&format!(" {}=\"{}\"", name, escape_attr_value(v))),
            None => out.push_str(&format!(" {}", name)),
        }
    }

    if raw_attrs.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
    out
}

fn filter_tag(cap: &Captures) -> String {
    let closing = !cap[1].is_empty();
    let tag = cap[2].to_ascii_lowercase();

    match allowed_attrs(&tag) {
        Some(attrs) => rebuild_tag(closing, &tag, &cap[3], attrs),
        None => escape_html(&cap[0]),
    }
}

/// Returns `input` with disallowed markup escaped and unsafe attributes removed.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for cap in TAG_RE.captures_iter(input) {
        let Some(m) = cap.get(0) else { continue };
        out.push_str(&escape_html(&input[last..m.start()]));
        out.push_str(&filter_tag(&cap));
        last = m.end();
    }

    out.push_str(&escape_html(&input[last..]));
    out
}
