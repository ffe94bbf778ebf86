//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Whether a store is currently open.
///
/// The spreadsheet column holds free text; [`StoreStatus::parse_label`] maps
/// the Portuguese and English labels seen in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    #[default]
    Open,
    Closed,
}

impl StoreStatus {
    /// Map a spreadsheet label to a status. Unknown labels count as open.
    #[must_use]
    pub fn parse_label(label: &str) -> Self {
        match crate::text::normalize(label.trim()).as_str() {
            "fechado" | "fechada" | "closed" | "false" | "0" => Self::Closed,
            _ => Self::Open,
        }
    }

    /// Whether the store is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Aberto",
            Self::Closed => "Fechado",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(StoreStatus::parse_label("Fechado"), StoreStatus::Closed);
        assert_eq!(StoreStatus::parse_label(" CLOSED "), StoreStatus::Closed);
        assert_eq!(StoreStatus::parse_label("aberto"), StoreStatus::Open);
        assert_eq!(StoreStatus::parse_label(""), StoreStatus::Open);
    }

    #[test]
    fn test_is_open() {
        assert!(StoreStatus::Open.is_open());
        assert!(!StoreStatus::Closed.is_open());
    }
}
