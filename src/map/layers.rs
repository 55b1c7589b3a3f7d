use crate::entities::{Coordinates, Participant};
use crate::map::{MapWidget, MarkerId, MarkerStyle};

const OWN_PAN_MIN_ZOOM: f64 = 14.0;

const CENTROID_STYLE: MarkerStyle = MarkerStyle {
    color: "#111827",
    radius: 10.0,
};
const BEST_STYLE: MarkerStyle = MarkerStyle {
    color: "#e11d48",
    radius: 10.0,
};
const PIN_STYLE: MarkerStyle = MarkerStyle {
    color: "#22d3ee",
    radius: 9.0,
};

/// What happens to transient result pins when the room layers are cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinPolicy {
    /// Pins accumulate as an exploration trail across reconcile passes.
    #[default]
    Keep,
    ClearOnReconcile,
}

/// Owner of every marker on the map. Room-state layers (participants,
/// centroid, best point) are rebuilt wholesale on each reconcile pass; the
/// own marker lives outside that cycle so its drag listeners survive.
pub struct MapLayerController {
    widget: Box<dyn MapWidget + Send>,
    own: Option<(MarkerId, Coordinates)>,
    participants: Vec<MarkerId>,
    centroid: Option<MarkerId>,
    best: Option<MarkerId>,
    pins: Vec<MarkerId>,
    pin_policy: PinPolicy,
}

impl MapLayerController {
    pub fn new(widget: Box<dyn MapWidget + Send>) -> Self {
        Self::with_pin_policy(widget, PinPolicy::default())
    }

    pub fn with_pin_policy(widget: Box<dyn MapWidget + Send>, pin_policy: PinPolicy) -> Self {
        Self {
            widget,
            own: None,
            participants: Vec::new(),
            centroid: None,
            best: None,
            pins: Vec::new(),
            pin_policy,
        }
    }

    /// Removes every room-state layer from the previous reconcile pass.
    /// The own marker is never touched here.
    pub fn clear_marks(&mut self) {
        for id in self.participants.drain(..) {
            self.widget.remove_marker(id);
        }
        if let Some(id) = self.centroid.take() {
            self.widget.remove_marker(id);
        }
        if let Some(id) = self.best.take() {
            self.widget.remove_marker(id);
        }
        if self.pin_policy == PinPolicy::ClearOnReconcile {
            for id in self.pins.drain(..) {
                self.widget.remove_marker(id);
            }
        }
    }

    /// Creates the draggable own marker on first use, repositions it in
    /// place afterwards. The marker is never recreated, which keeps its
    /// identity and drag listeners stable.
    pub fn upsert_own(&mut self, coords: Coordinates, pan: bool) {
        match &mut self.own {
            Some((id, pos)) => {
                self.widget.move_marker(*id, coords);
                *pos = coords;
            }
            None => {
                let id = self.widget.add_marker(
                    coords,
                    MarkerStyle {
                        color: "#3b82f6",
                        radius: 8.0,
                    },
                    "my location".into(),
                    true,
                );
                self.own = Some((id, coords));
            }
        }

        if pan {
            self.widget.pan_to(coords, OWN_PAN_MIN_ZOOM);
        }
    }

    /// Records a drag reported by the widget, which has already moved the
    /// marker itself.
    pub fn own_dragged(&mut self, coords: Coordinates) {
        if let Some((_, pos)) = &mut self.own {
            *pos = coords;
        }
    }

    pub fn own_position(&self) -> Option<Coordinates> {
        self.own.map(|(_, pos)| pos)
    }

    /// Always a fresh marker; callers must pass a participant with a valid
    /// position. Participants are redrawn wholesale, never diffed.
    pub fn add_participant(&mut self, p: &Participant) {
        let Some(coords) = p.position() else {
            return;
        };

        let id = self.widget.add_marker(
            coords,
            MarkerStyle {
                color: p.mode.color(),
                radius: 8.0,
            },
            format!("{} ({})\n{}", p.nickname, p.mode.name(), p.pid),
            false,
        );
        self.participants.push(id);
    }

    pub fn set_centroid(&mut self, coords: Option<Coordinates>) {
        if let Some(id) = self.centroid.take() {
            self.widget.remove_marker(id);
        }
        if let Some(coords) = coords {
            self.centroid =
                Some(
                    self.widget
                        .add_marker(coords, CENTROID_STYLE, "Centroid".into(), false),
                );
        }
    }

    pub fn set_best(&mut self, coords: Option<Coordinates>) {
        if let Some(id) = self.best.take() {
            self.widget.remove_marker(id);
        }
        if let Some(coords) = coords {
            self.best =
                Some(
                    self.widget
                        .add_marker(coords, BEST_STYLE, "ETA Midpoint".into(), false),
                );
        }
    }

    /// Transient pin dropped when a suggestion card is selected.
    pub fn drop_pin(&mut self, coords: Coordinates) {
        let id = self
            .widget
            .add_marker(coords, PIN_STYLE, String::new(), false);
        self.pins.push(id);
    }

    pub fn pan_to(&mut self, coords: Coordinates, min_zoom: f64) {
        self.widget.pan_to(coords, min_zoom);
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn widget_mut(&mut self) -> &mut dyn MapWidget {
        self.widget.as_mut()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::map::Bounds;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// Recording widget shared between the controller (which owns a handle)
    /// and the test body (which inspects it).
    #[derive(Default)]
    pub struct Recording {
        pub markers: BTreeMap<MarkerId, (Coordinates, MarkerStyle, String, bool)>,
        pub fitted: Vec<(Bounds, f64)>,
        pub panned: Vec<(Coordinates, f64)>,
        pub added: usize,
    }

    #[derive(Clone, Default)]
    pub struct RecordingWidget(pub Arc<Mutex<Recording>>);

    impl RecordingWidget {
        pub fn state(&self) -> std::sync::MutexGuard<'_, Recording> {
            self.0.lock().unwrap()
        }
    }

    impl MapWidget for RecordingWidget {
        fn add_marker(
            &mut self,
            coords: Coordinates,
            style: MarkerStyle,
            tooltip: String,
            draggable: bool,
        ) -> MarkerId {
            let id = Uuid::new_v4();
            let mut state = self.0.lock().unwrap();
            state.markers.insert(id, (coords, style, tooltip, draggable));
            state.added += 1;
            id
        }

        fn move_marker(&mut self, id: MarkerId, coords: Coordinates) {
            if let Some(entry) = self.0.lock().unwrap().markers.get_mut(&id) {
                entry.0 = coords;
            }
        }

        fn remove_marker(&mut self, id: MarkerId) {
            self.0.lock().unwrap().markers.remove(&id);
        }

        fn pan_to(&mut self, coords: Coordinates, min_zoom: f64) {
            self.0.lock().unwrap().panned.push((coords, min_zoom));
        }

        fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
            self.0.lock().unwrap().fitted.push((bounds, padding));
        }
    }
}
