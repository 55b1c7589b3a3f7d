use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub pid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub mode: TravelMode,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// The participant's reported position, if one has been submitted and
    /// it is renderable.
    pub fn position(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.lat?, self.lng?);
        coords.is_valid().then_some(coords)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walk,
    Car,
    Bus,
    Subway,
}

// Unrecognized modes from older or foreign clients collapse to the default
// instead of failing the whole snapshot.
impl<'de> Deserialize<'de> for TravelMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "car" => Self::Car,
            "bus" => Self::Bus,
            "subway" => Self::Subway,
            _ => Self::Walk,
        })
    }
}

impl TravelMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Car => "car",
            Self::Bus => "bus",
            Self::Subway => "subway",
        }
    }

    /// Marker color for this travel mode. Unknown modes deserialize to the
    /// default variant, so every participant gets a defined color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Car => "#2563eb",
            Self::Bus => "#f59e0b",
            Self::Subway => "#8b5cf6",
            Self::Walk => "#10b981",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(lat: Option<f64>, lng: Option<f64>) -> Participant {
        Participant {
            pid: "p-1".into(),
            nickname: "Alice".into(),
            mode: TravelMode::Bus,
            lat,
            lng,
            updated_at: None,
        }
    }

    #[test]
    fn position_requires_both_components() {
        assert!(participant(Some(37.5), Some(127.0)).position().is_some());
        assert!(participant(Some(37.5), None).position().is_none());
        assert!(participant(None, None).position().is_none());
        assert!(participant(Some(f64::NAN), Some(127.0)).position().is_none());
    }

    #[test]
    fn unknown_mode_falls_back_to_default() {
        let mode: TravelMode = serde_json::from_str("\"hoverboard\"").unwrap();
        assert_eq!(mode, TravelMode::Walk);

        let mode: TravelMode = serde_json::from_str("\"subway\"").unwrap();
        assert_eq!(mode, TravelMode::Subway);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"subway\"");
    }

    #[test]
    fn every_mode_has_a_color() {
        for mode in [
            TravelMode::Walk,
            TravelMode::Car,
            TravelMode::Bus,
            TravelMode::Subway,
        ] {
            assert!(mode.color().starts_with('#'));
        }
        assert_eq!(TravelMode::default().color(), TravelMode::Walk.color());
    }
}
