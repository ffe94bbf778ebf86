//! Scanned code resolution.
//!
//! The camera lives outside this crate; its only contract is handing a
//! decoded string to [`resolve_scan`].

use std::time::Duration;

use ecofeira_core::Product;
use ecofeira_core::text::{contains_normalized, normalize};
use tokio::time::Instant;

/// How long the unmatched-scan notice stays visible.
pub const SCAN_NOTICE_TTL: Duration = Duration::from_secs(4);

/// Notice shown when a code matches nothing.
pub const UNMATCHED_SCAN_MESSAGE: &str =
    "O código escaneado não foi identificado como um Produto, ID ou Categoria válida.";

/// Outcome of resolving a scanned code against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResolution {
    /// Use the raw code as the search query.
    Matched(String),
    Unmatched,
}

/// Resolve a decoded code.
///
/// Matches when the code is exactly a product id, or its normalized form is
/// contained in some product's normalized name or category.
///
/// Blank codes never match. Plain containment would accept them, since the
/// empty string is a substring of every name, and an empty scan would then
/// show the whole catalog.
#[must_use]
pub fn resolve_scan(code: &str, products: &[Product]) -> ScanResolution {
    if code.trim().is_empty() {
        return ScanResolution::Unmatched;
    }

    let normalized = normalize(code);
    let matched = products.iter().any(|p| {
        p.id.as_str() == code
            || contains_normalized(&p.name, &normalized)
            || contains_normalized(&p.category, &normalized)
    });

    if matched {
        ScanResolution::Matched(code.to_owned())
    } else {
        ScanResolution::Unmatched
    }
}

/// A transient notice that disappears after [`SCAN_NOTICE_TTL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanNotice {
    pub message: String,
    raised_at: Instant,
}

impl ScanNotice {
    #[must_use]
    pub fn unmatched(now: Instant) -> Self {
        Self {
            message: UNMATCHED_SCAN_MESSAGE.to_owned(),
            raised_at: now,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= SCAN_NOTICE_TTL
    }

    /// When the notice should disappear.
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.raised_at + SCAN_NOTICE_TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::product;

    fn catalog() -> Vec<Product> {
        vec![
            product("7891000100103", "Leite Condensado", "Laticínios", "Super A", 700),
            product("A2", "Café Pilão", "Mercearia", "Super B", 1890),
        ]
    }

    #[test]
    fn test_exact_id_matches() {
        assert_eq!(
            resolve_scan("7891000100103", &catalog()),
            ScanResolution::Matched("7891000100103".to_owned())
        );
    }

    #[test]
    fn test_name_and_category_substrings_match() {
        assert!(matches!(resolve_scan("CAFE", &catalog()), ScanResolution::Matched(_)));
        assert!(matches!(resolve_scan("laticinio", &catalog()), ScanResolution::Matched(_)));
    }

    #[test]
    fn test_prefix_of_id_does_not_match() {
        assert_eq!(resolve_scan("7891000", &catalog()), ScanResolution::Unmatched);
    }

    #[test]
    fn test_blank_code_is_unmatched() {
        assert_eq!(resolve_scan("  ", &catalog()), ScanResolution::Unmatched);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_four_seconds() {
        let notice = ScanNotice::unmatched(Instant::now());
        tokio::time::advance(Duration::from_millis(3999)).await;
        assert!(!notice.is_expired(Instant::now()));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(notice.is_expired(Instant::now()));
    }
}
