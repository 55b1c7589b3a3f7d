use crate::entities::Coordinates;

/// Where the canonical "my location" last came from.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationSource {
    Gps,
    Search { label: String },
    MapClick,
    MarkerDrag,
}

/// Merges the four location sources into one canonical coordinate pair.
/// Last write wins, no averaging. Mirrors a pair of lat/lng input fields
/// plus a status line; the own-marker position serves as a fallback when
/// the fields have been cleared or hold garbage.
#[derive(Debug, Default)]
pub struct LocationInput {
    lat: Option<f64>,
    lng: Option<f64>,
    status: String,
    picking: bool,
}

impl LocationInput {
    pub fn apply_gps(&mut self, coords: Coordinates) {
        self.apply(LocationSource::Gps, coords);
    }

    pub fn apply_search(&mut self, coords: Coordinates, label: &str) {
        self.apply(
            LocationSource::Search {
                label: label.to_string(),
            },
            coords,
        );
    }

    /// Accepted only while picking mode is armed; the first accepted click
    /// disarms it. Returns whether the click was consumed.
    pub fn apply_map_click(&mut self, coords: Coordinates) -> bool {
        if !self.picking {
            return false;
        }
        self.picking = false;
        self.apply(LocationSource::MapClick, coords);
        true
    }

    /// Drags act on an existing own marker, so they bypass the picking
    /// flag entirely.
    pub fn apply_marker_drag(&mut self, coords: Coordinates) {
        self.apply(LocationSource::MarkerDrag, coords);
    }

    fn apply(&mut self, source: LocationSource, coords: Coordinates) {
        self.lat = Some(coords.lat);
        self.lng = Some(coords.lng);
        self.status = match source {
            LocationSource::Gps => "GPS position applied".to_string(),
            LocationSource::Search { label } => format!("search result applied: {}", label),
            LocationSource::MapClick => "picked from map".to_string(),
            LocationSource::MarkerDrag => "marker moved".to_string(),
        };
    }

    /// Arms one-shot picking mode; the next accepted map click disarms it.
    pub fn arm_picking(&mut self) {
        self.picking = true;
    }

    pub fn disarm_picking(&mut self) {
        self.picking = false;
    }

    pub fn picking(&self) -> bool {
        self.picking
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// The canonical coordinate: the input fields when they hold a usable
    /// pair, else the own-marker position, else nothing. Callers that get
    /// `None` must refuse to submit rather than send garbage.
    pub fn current(&self, marker_fallback: Option<Coordinates>) -> Option<Coordinates> {
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            let coords = Coordinates::new(lat, lng);
            if coords.is_valid() {
                return Some(coords);
            }
        }
        marker_fallback.filter(Coordinates::is_valid)
    }
}
