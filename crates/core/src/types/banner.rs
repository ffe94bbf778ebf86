//! Promotional banners shown on the home page.

use serde::{Deserialize, Serialize};

use super::BannerId;

/// A banner image with an optional title and link.
///
/// Used for both the main carousel and the grid below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub image_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}
