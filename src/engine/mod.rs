mod reconcile;
mod room;
mod suggest;

pub use reconcile::{ParticipantRow, RoomSummary};
pub use suggest::SuggestionCard;

use crate::{
    api::DynAPI,
    entities::Coordinates,
    input::LocationInput,
    map::{MapEvent, MapEventReceiver, MapLayerController},
    session::Session,
};

/// Reconciliation state: Idle until a room code is known, Polling after
/// create/join/restore, back to Idle only on an explicit leave of the room
/// (close) clearing the code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Polling,
}

/// The application controller. Owns the session, the canonical location
/// input, the map layers, and the rendered room/suggestion view state, and
/// talks to the backend through the API trait object.
///
/// All methods take `&mut self`; the engine is meant to live on one event
/// loop, with suspension only at network awaits.
pub struct Engine {
    api: DynAPI,
    session: Session,
    input: LocationInput,
    map: MapLayerController,
    summary: RoomSummary,
    cards: Vec<SuggestionCard>,
    suggest_centroid: Option<Coordinates>,
    eta_summary: Option<String>,
    public_base: Option<String>,
    refresh_seq: u64,
    applied_seq: u64,
}

impl Engine {
    pub fn new(api: DynAPI, session: Session, map: MapLayerController) -> Self {
        Self {
            api,
            session,
            input: LocationInput::default(),
            map,
            summary: RoomSummary::default(),
            cards: Vec::new(),
            suggest_centroid: None,
            eta_summary: None,
            public_base: None,
            refresh_seq: 0,
            applied_seq: 0,
        }
    }

    /// Origin used to synthesize invite links when the backend omits one.
    pub fn public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = Some(base.into());
        self
    }

    pub fn phase(&self) -> Phase {
        match self.session.code() {
            Some(_) => Phase::Polling,
            None => Phase::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn summary(&self) -> &RoomSummary {
        &self.summary
    }

    pub fn cards(&self) -> &[SuggestionCard] {
        &self.cards
    }

    pub fn eta_summary(&self) -> Option<&str> {
        self.eta_summary.as_deref()
    }

    /// Centroid the current suggestion set was searched around.
    pub fn suggest_centroid(&self) -> Option<Coordinates> {
        self.suggest_centroid
    }

    pub fn status(&self) -> &str {
        self.input.status()
    }

    pub fn picking(&self) -> bool {
        self.input.picking()
    }

    /// Arms one-shot map picking; the next click on the map becomes the
    /// canonical location.
    pub fn arm_picking(&mut self) {
        self.input.arm_picking();
    }

    pub fn disarm_picking(&mut self) {
        self.input.disarm_picking();
    }

    /// The canonical coordinate: input fields first, own marker second.
    pub fn current_coordinate(&self) -> Option<Coordinates> {
        self.input.current(self.map.own_position())
    }

    /// A geolocation fix from the platform.
    #[tracing::instrument(skip(self))]
    pub fn apply_gps(&mut self, coords: Coordinates) {
        self.input.apply_gps(coords);
        self.map.upsert_own(coords, true);
    }

    /// Routes one widget event. Clicks feed the picking flow, drags always
    /// move the canonical location.
    pub fn handle_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Click(coords) => {
                if self.input.apply_map_click(coords) {
                    self.map.upsert_own(coords, true);
                }
            }
            MapEvent::OwnMarkerDragged(coords) => {
                self.input.apply_marker_drag(coords);
                self.map.own_dragged(coords);
            }
        }
    }

    /// Drains widget events until the channel closes.
    pub async fn run_events(&mut self, events: MapEventReceiver) {
        while let Ok(event) = events.recv().await {
            self.handle_map_event(event);
        }
    }

    /// Resumes a persisted session: with a stored room code the engine goes
    /// straight to Polling and fetches state once.
    #[tracing::instrument(skip(self))]
    pub async fn restore_session(&mut self) -> Result<Phase, crate::error::Error> {
        if self.session.code().is_some() {
            self.refresh().await?;
        }
        Ok(self.phase())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{engine_with, StubApi};
    use super::*;
    use crate::entities::{Participant, RoomSnapshot, TravelMode};
    use crate::map::event_channel;
    use std::sync::Arc;
    use tokio_test::block_on;

    #[test]
    fn unarmed_click_is_ignored() {
        let api = Arc::new(StubApi::default());
        let (mut engine, widget) = engine_with(api);

        engine.handle_map_event(MapEvent::Click(Coordinates::new(37.5, 127.0)));

        assert_eq!(engine.current_coordinate(), None);
        assert!(widget.state().markers.is_empty());
    }

    #[test]
    fn armed_click_picks_once_then_disarms() {
        let api = Arc::new(StubApi::default());
        let (mut engine, widget) = engine_with(api);

        engine.arm_picking();
        engine.handle_map_event(MapEvent::Click(Coordinates::new(37.5, 127.0)));
        assert!(!engine.picking());
        assert_eq!(engine.status(), "picked from map");
        assert_eq!(
            engine.current_coordinate(),
            Some(Coordinates::new(37.5, 127.0))
        );
        assert_eq!(widget.state().markers.len(), 1);

        engine.handle_map_event(MapEvent::Click(Coordinates::new(37.9, 127.9)));
        assert_eq!(
            engine.current_coordinate(),
            Some(Coordinates::new(37.5, 127.0))
        );
    }

    #[test]
    fn events_flow_through_the_channel() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api);
        let (tx, rx) = event_channel();

        engine.arm_picking();
        tx.try_send(MapEvent::Click(Coordinates::new(37.5, 127.0)))
            .unwrap();
        tx.try_send(MapEvent::OwnMarkerDragged(Coordinates::new(37.6, 127.1)))
            .unwrap();
        drop(tx);

        block_on(engine.run_events(rx));

        assert_eq!(engine.status(), "marker moved");
        assert_eq!(
            engine.current_coordinate(),
            Some(Coordinates::new(37.6, 127.1))
        );
    }

    #[test]
    fn restore_session_refreshes_when_a_code_was_persisted() {
        let api = Arc::new(StubApi::default());
        api.push_snapshot(RoomSnapshot {
            participants: vec![Participant {
                pid: "a".into(),
                nickname: "Alice".into(),
                mode: TravelMode::Walk,
                lat: Some(37.5),
                lng: Some(127.0),
                updated_at: None,
            }],
            ..Default::default()
        });

        let (mut engine, widget) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");

        assert_eq!(block_on(engine.restore_session()).unwrap(), Phase::Polling);
        assert_eq!(widget.state().markers.len(), 1);
        assert_eq!(api.calls(), vec!["state:ABC123"]);
    }

    #[test]
    fn restore_session_without_a_code_stays_idle() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        assert_eq!(block_on(engine.restore_session()).unwrap(), Phase::Idle);
        assert!(api.calls().is_empty());
    }
}
