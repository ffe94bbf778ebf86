//! Supermarket records.

use serde::{Deserialize, Serialize};

use super::{StoreId, StoreStatus};

/// A supermarket listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub status: StoreStatus,
    /// Link to the current weekly flyer, when the store publishes one.
    #[serde(default)]
    pub flyer_url: Option<String>,
}

impl Store {
    /// One-line address, skipping empty parts.
    #[must_use]
    pub fn address(&self) -> String {
        [&self.street, &self.neighborhood, &self.city]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_skips_empty_parts() {
        let store = Store {
            id: StoreId::new("s1"),
            name: "Super Bom".to_owned(),
            logo: String::new(),
            street: "Rua das Flores, 10".to_owned(),
            neighborhood: String::new(),
            city: "Recife".to_owned(),
            status: StoreStatus::Open,
            flyer_url: None,
        };
        assert_eq!(store.address(), "Rua das Flores, 10, Recife");
    }
}
