//! Filename canonicalization.

use std::fmt;

/// Image extensions accepted as-is (lower case, without dot).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Extension substituted for anything not in [`ALLOWED_EXTENSIONS`].
pub const FALLBACK_EXTENSION: &str = "png";

/// A filename in canonical form: `[a-z0-9-]*` stem plus an allowed image extension.
///
/// Only produced by [`sanitize_filename`]. The stem may be empty; callers that
/// store files must treat that as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalFilename {
    name: String,
    stem_len: usize,
}

impl CanonicalFilename {
    /// The full canonical name, e.g. `my-photo.jpg`.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The part before the extension dot.
    pub fn stem(&self) -> &str {
        &self.name[..self.stem_len]
    }

    /// The extension without its dot.
    pub fn extension(&self) -> &str {
        &self.name[self.stem_len + 1..]
    }

    pub fn has_empty_stem(&self) -> bool {
        self.stem_len == 0
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for CanonicalFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for CanonicalFilename {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Convert a string to lower-case hyphen-separated ASCII tokens.
///
/// Every run of characters outside `[A-Za-z0-9]` becomes a single hyphen and
/// hyphens never appear at either end: `"My  Photo!!"` becomes `"my-photo"`.
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out
}

/// Sanitize a raw uploaded filename into its canonical form.
///
/// Never fails. Directory components are dropped, the stem is lower-cased and
/// kebab-cased, and the extension is kept only when it is an allowed image
/// extension, otherwise it becomes `.png`.
pub fn sanitize_filename(raw: &str) -> CanonicalFilename {
    let basename = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(raw)
        .trim();

    let (stem, ext) = match basename.rfind('.') {
        Some(dot) => (&basename[..dot], &basename[dot + 1..]),
        None => (basename, ""),
    };

    let stem: String = kebab_case(stem.trim().to_lowercase().as_str())
        .chars()
        .filter(|c| matches!(*c, 'a'..='z' | '0'..='9' | '-'))
        .collect();

    let ext = ext.to_lowercase();
    let ext = match ALLOWED_EXTENSIONS.iter().find(|allowed| **allowed == ext) {
        Some(allowed) => *allowed,
        None => FALLBACK_EXTENSION,
    };

    CanonicalFilename {
        stem_len: stem.len(),
        name: format!("{}.{}", stem, ext),
    }
}
