use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// One place candidate as stored by the backend. Coordinates arrive as the
/// upstream place API emits them: decimal strings in separate x/y fields.
/// Fields prefixed with an underscore on the wire are enrichments computed
/// server-side and rendered verbatim here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuggestionItem {
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub address_name: Option<String>,
    #[serde(default)]
    pub road_address_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, rename = "_phone")]
    pub enriched_phone: Option<String>,
    #[serde(default, rename = "_centroid_dist_km")]
    pub centroid_dist_km: Option<f64>,
    #[serde(default, rename = "_open_minutes_left")]
    pub open_minutes_left: Option<i64>,
    #[serde(default, rename = "_closes_at")]
    pub closes_at: Option<String>,
    #[serde(default, rename = "_open_enough")]
    pub open_enough: Option<bool>,
    #[serde(default, rename = "_photo_url")]
    pub photo_url: Option<String>,
}

impl SuggestionItem {
    /// x is longitude, y is latitude.
    pub fn position(&self) -> Option<Coordinates> {
        Coordinates::parse(&self.y, &self.x)
    }

    /// Road address preferred over the lot-number address.
    pub fn address(&self) -> Option<&str> {
        self.road_address_name
            .as_deref()
            .filter(|a| !a.is_empty())
            .or(self.address_name.as_deref().filter(|a| !a.is_empty()))
    }

    pub fn phone(&self) -> Option<&str> {
        self.enriched_phone
            .as_deref()
            .or(self.phone.as_deref())
            .filter(|p| !p.is_empty())
    }
}
