//! Accent-insensitive text helpers.
//!
//! Search in the storefront is a plain substring test over normalized text:
//! canonical decomposition (NFD), combining marks dropped, then lower-cased.
//! `"Açúcar Cristal"` and `"acucar"` therefore match.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize text for matching: strip diacritics and lower-case.
///
/// ```
/// use ecofeira_core::text::normalize;
///
/// assert_eq!(normalize("Feijão Preto"), "feijao preto");
/// ```
#[must_use]
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `haystack`, once normalized, contains an already-normalized needle.
#[must_use]
pub fn contains_normalized(haystack: &str, normalized_needle: &str) -> bool {
    normalize(haystack).contains(normalized_needle)
}

/// Build a URL slug: lower-case ASCII words joined by single dashes.
///
/// Whitespace runs become `-`, characters outside `[A-Za-z0-9_-]` are dropped
/// and repeated dashes collapse.
///
/// ```
/// use ecofeira_core::text::slugify;
///
/// assert_eq!(slugify("  Hortifrúti & Cia  "), "hortifruti-cia");
/// ```
#[must_use]
pub fn slugify(s: &str) -> String {
    let normalized = normalize(s.trim());
    let mut slug = String::with_capacity(normalized.len());
    let mut last_dash = false;

    for c in normalized.chars() {
        let mapped = if c.is_whitespace() || c == '-' {
            Some('-')
        } else if c.is_ascii_alphanumeric() || c == '_' {
            Some(c)
        } else {
            None
        };

        match mapped {
            Some('-') if last_dash => {}
            Some('-') => {
                slug.push('-');
                last_dash = true;
            }
            Some(other) => {
                slug.push(other);
                last_dash = false;
            }
            None => {}
        }
    }

    slug
}
