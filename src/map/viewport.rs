use crate::entities::Coordinates;
use crate::map::MapWidget;

pub const FIT_PADDING: f64 = 24.0;

/// Axis-aligned bounding box over latitude/longitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn of(coords: Coordinates) -> Self {
        Self {
            south: coords.lat,
            west: coords.lng,
            north: coords.lat,
            east: coords.lng,
        }
    }

    pub fn extend(&mut self, coords: Coordinates) {
        self.south = self.south.min(coords.lat);
        self.west = self.west.min(coords.lng);
        self.north = self.north.max(coords.lat);
        self.east = self.east.max(coords.lng);
    }

    pub fn contains(&self, coords: Coordinates) -> bool {
        coords.lat >= self.south
            && coords.lat <= self.north
            && coords.lng >= self.west
            && coords.lng <= self.east
    }
}

/// Frames the widget around every valid point in the set. Absent or
/// non-finite entries are skipped; when nothing remains the viewport is
/// left untouched.
pub fn fit(widget: &mut dyn MapWidget, points: &[Option<Coordinates>]) {
    let mut valid = points
        .iter()
        .flatten()
        .copied()
        .filter(Coordinates::is_valid);

    let Some(first) = valid.next() else {
        return;
    };

    let mut bounds = Bounds::of(first);
    for coords in valid {
        bounds.extend(coords);
    }

    widget.fit_bounds(bounds, FIT_PADDING);
}
