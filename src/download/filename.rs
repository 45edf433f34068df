//! Filename sanitization for downloaded media files.
//!
//! Names come from the last segment of a media URL, so they are usually
//! percent-encoded (`01%20-%20Title%20Screen.mp3`). The sanitized form keeps
//! only word characters and single underscores in the stem, plus a lowercase
//! extension.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Any run of non-word characters and underscores.
static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"[\W_]+"));

/// Sanitizes a suggested filename for the download directory.
///
/// 1. Percent-decode (invalid UTF-8 is replaced, not rejected).
/// 2. Split into stem and extension at the last dot of the final path
///    component; leading dots never start an extension.
/// 3. Collapse every run of non-word characters in the stem to one `_`.
/// 4. Lowercase the extension and collapse non-word runs after its dot.
///
/// The result is stable: sanitizing it again returns it unchanged.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let decoded = urlencoding::decode_binary(name.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let (stem, extension) = split_extension(&decoded);
    let stem = SEPARATOR_RUN_RE.replace_all(stem, "_");

    let extension = match extension.strip_prefix('.') {
        Some(body) => format!(
            ".{}",
            SEPARATOR_RUN_RE.replace_all(&body.to_lowercase(), "_")
        ),
        None => String::new(),
    };

    format!("{stem}{extension}")
}

/// Splits `name` into `(stem, extension)`, where the extension includes its dot.
fn split_extension(name: &str) -> (&str, &str) {
    let component_start = name.rfind('/').map_or(0, |index| index + 1);
    let Some(dot) = name.rfind('.') else {
        return (name, "");
    };
    if dot < component_start || name[component_start..dot].chars().all(|c| c == '.') {
        return (name, "");
    }
    name.split_at(dot)
}
