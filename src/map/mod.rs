mod layers;
pub mod viewport;

#[cfg(test)]
pub(crate) use layers::test_support;
pub use layers::{MapLayerController, PinPolicy};
pub use viewport::{fit, Bounds, FIT_PADDING};

use uuid::Uuid;

use crate::entities::Coordinates;

pub type MarkerId = Uuid;

/// How a circle marker is drawn. Colors are hex strings passed through to
/// the widget untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub radius: f64,
}

/// Seam to the concrete map widget (Leaflet behind WASM bindings, a test
/// double, a headless stub). Object-safe so the controller can hold it as a
/// trait object.
pub trait MapWidget {
    fn add_marker(
        &mut self,
        coords: Coordinates,
        style: MarkerStyle,
        tooltip: String,
        draggable: bool,
    ) -> MarkerId;
    fn move_marker(&mut self, id: MarkerId, coords: Coordinates);
    fn remove_marker(&mut self, id: MarkerId);
    fn pan_to(&mut self, coords: Coordinates, min_zoom: f64);
    fn fit_bounds(&mut self, bounds: Bounds, padding: f64);
}

/// Events the widget pushes back at the application. Delivered over an
/// async channel so widget internals never call into the engine directly.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    Click(Coordinates),
    OwnMarkerDragged(Coordinates),
}

pub type MapEventSender = async_channel::Sender<MapEvent>;
pub type MapEventReceiver = async_channel::Receiver<MapEvent>;

pub fn event_channel() -> (MapEventSender, MapEventReceiver) {
    async_channel::unbounded()
}

/// Widget that draws nothing, for headless runs.
#[derive(Debug, Default)]
pub struct NullWidget;

impl MapWidget for NullWidget {
    fn add_marker(
        &mut self,
        _coords: Coordinates,
        _style: MarkerStyle,
        _tooltip: String,
        _draggable: bool,
    ) -> MarkerId {
        Uuid::new_v4()
    }

    fn move_marker(&mut self, _id: MarkerId, _coords: Coordinates) {}

    fn remove_marker(&mut self, _id: MarkerId) {}

    fn pan_to(&mut self, _coords: Coordinates, _min_zoom: f64) {}

    fn fit_bounds(&mut self, _bounds: Bounds, _padding: f64) {}
}
