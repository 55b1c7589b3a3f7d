use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Coordinates, Participant, SuggestionItem};

/// One atomic room state fetch. The client never mutates a snapshot, it
/// replaces the previous one wholesale on each reconcile pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoomSnapshot {
    #[serde(default)]
    pub meta: Value,
    pub centroid: Option<Coordinates>,
    pub eta: Option<EtaBlock>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    pub results: Option<StoredResults>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EtaBlock {
    pub best: Option<Coordinates>,
    pub participants_eta: Option<Vec<ParticipantEta>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantEta {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub index: u32,
    pub eta_min: f64,
}

/// Suggestion results the server stored alongside room state, replayed on
/// every refresh so late joiners see the last search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoredResults {
    #[serde(default)]
    pub items: Vec<SuggestionItem>,
    pub centroid: Option<Coordinates>,
}

impl RoomSnapshot {
    pub fn best(&self) -> Option<Coordinates> {
        self.eta.as_ref().and_then(|eta| eta.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_snapshot() {
        let snapshot: RoomSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.participants.is_empty());
        assert!(snapshot.centroid.is_none());
        assert!(snapshot.best().is_none());
        assert!(snapshot.results.is_none());
    }

    #[test]
    fn deserializes_full_snapshot() {
        let snapshot: RoomSnapshot = serde_json::from_str(
            r#"{
                "meta": {"purpose": "lunch", "meetingTime": "12:30"},
                "centroid": {"lat": 37.55, "lng": 126.99},
                "eta": {
                    "best": {"lat": 37.56, "lng": 126.98},
                    "participants_eta": [{"nickname": "Alice", "index": 0, "eta_min": 12.5}]
                },
                "participants": [
                    {"pid": "a", "nickname": "Alice", "mode": "bus", "lat": 37.5, "lng": 127.0, "updated_at": null},
                    {"pid": "b", "nickname": "Bob", "mode": "walk", "lat": null, "lng": null, "updated_at": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.participants.len(), 2);
        assert!(snapshot.participants[0].position().is_some());
        assert!(snapshot.participants[1].position().is_none());
        assert_eq!(snapshot.best().unwrap().lat, 37.56);
        assert_eq!(snapshot.meta["purpose"], "lunch");
    }
}
