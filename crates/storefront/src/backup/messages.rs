//! Wire format of the backup partner messages.
//!
//! Inbound:
//!
//! ```json
//! { "type": "READY" }
//! { "type": "RESTORE_DATA", "payload": { "favorites": [...], "shoppingList": [...] } }
//! ```
//!
//! Outbound:
//!
//! ```json
//! { "type": "ECOFEIRA_BACKUP_INIT", "user": {...}, "timestamp": "...", "favorites": [...], "shoppingList": [...] }
//! ```

use chrono::{DateTime, Utc};
use ecofeira_core::{ProductId, ShoppingListItem, UserProfile};
use serde::{Deserialize, Serialize};

/// Messages the partner frame sends to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// The partner finished loading and can receive the export.
    #[serde(rename = "READY")]
    Ready,

    /// The partner wants local data replaced with a stored backup.
    #[serde(rename = "RESTORE_DATA")]
    RestoreData { payload: RestorePayload },
}

/// Data to write back. Absent collections leave the local slot untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePayload {
    #[serde(default)]
    pub favorites: Option<Vec<ProductId>>,
    #[serde(default)]
    pub shopping_list: Option<Vec<ShoppingListItem>>,
}

/// Messages the storefront sends to the partner frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "ECOFEIRA_BACKUP_INIT")]
    BackupInit(BackupInitPayload),
}

/// Profile and local data handed to the partner once it is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInitPayload {
    pub user: UserProfile,
    pub timestamp: DateTime<Utc>,
    pub favorites: Vec<ProductId>,
    pub shopping_list: Vec<ShoppingListItem>,
}

/// Local data at the moment of export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSnapshot {
    pub favorites: Vec<ProductId>,
    pub shopping_list: Vec<ShoppingListItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecofeira_core::{ListItemId, Price};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_ready() {
        let msg: InboundMessage = serde_json::from_str(r#"{"type":"READY"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Ready);
    }

    #[test]
    fn test_parse_restore_with_partial_payload() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "type": "RESTORE_DATA",
            "payload": { "favorites": ["A1", "B2"] }
        }))
        .unwrap();

        let InboundMessage::RestoreData { payload } = msg else {
            panic!("expected restore");
        };
        assert_eq!(payload.favorites.unwrap().len(), 2);
        assert!(payload.shopping_list.is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"HELLO"}"#).is_err());
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"RESTORE_DATA"}"#).is_err());
    }

    #[test]
    fn test_backup_init_wire_shape() {
        let msg = OutboundMessage::BackupInit(BackupInitPayload {
            user: UserProfile {
                uid: "u1".to_owned(),
                display_name: Some("Ana".to_owned()),
                email: None,
                photo_url: Some("https://img.example/ana.png".to_owned()),
            },
            timestamp: DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
            favorites: vec![ProductId::new("A1")],
            shopping_list: vec![ShoppingListItem {
                id: ListItemId::new("l1"),
                product_name: "Arroz 5kg".to_owned(),
                quantity: 2,
                checked: false,
                original_price: Price::from_cents(2500),
                original_store: "Super B".to_owned(),
            }],
        });

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "ECOFEIRA_BACKUP_INIT");
        assert_eq!(value["user"]["uid"], "u1");
        assert_eq!(value["user"]["photoURL"], "https://img.example/ana.png");
        assert_eq!(value["user"]["email"], serde_json::Value::Null);
        assert_eq!(value["favorites"], json!(["A1"]));
        assert_eq!(value["shoppingList"][0]["productName"], "Arroz 5kg");
        assert!(value["shoppingList"][0]["originalPrice"].is_number());
        assert_eq!(value["shoppingList"][0]["originalPrice"], 25.0);
        assert!(value["timestamp"].as_str().unwrap().starts_with("2026-01-02T03:04:05"));
    }
}
