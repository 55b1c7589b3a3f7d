use super::Engine;

use crate::entities::{Coordinates, Participant, RoomSnapshot};
use crate::error::Error;
use crate::map::viewport;

/// View model for the room side panel, rebuilt atomically from each
/// snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomSummary {
    pub meta_text: String,
    pub centroid_text: String,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticipantRow {
    pub pid: String,
    pub nickname: String,
    pub mode: String,
    pub updated_at: Option<String>,
}

impl RoomSummary {
    fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        Self {
            meta_text: if snapshot.meta.is_null() {
                "{}".to_string()
            } else {
                snapshot.meta.to_string()
            },
            centroid_text: match snapshot.centroid {
                Some(c) => format!("{:.5}, {:.5}", c.lat, c.lng),
                None => "-".to_string(),
            },
            participants: snapshot.participants.iter().map(ParticipantRow::from).collect(),
        }
    }
}

impl From<&Participant> for ParticipantRow {
    fn from(p: &Participant) -> Self {
        Self {
            pid: p.pid.clone(),
            nickname: p.nickname.clone(),
            mode: p.mode.name().to_string(),
            updated_at: p.updated_at.map(|t| t.format("%H:%M:%S").to_string()),
        }
    }
}

impl Engine {
    /// One reconcile pass. A no-op while Idle; while Polling, fetches the
    /// snapshot and redraws everything from it. Fetch failures are logged
    /// and swallowed so last-known-good layers stay on the map.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let Some(code) = self.session.code() else {
            return Ok(());
        };

        self.refresh_seq += 1;
        let seq = self.refresh_seq;

        match self.api.room_state(&code).await {
            Ok(snapshot) => {
                // Completions racing an already-applied newer fetch are
                // dropped instead of overwriting the display.
                if seq <= self.applied_seq {
                    tracing::debug!(seq, applied = self.applied_seq, "stale room state discarded");
                    return Ok(());
                }
                self.applied_seq = seq;
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::error!(code = %code, error = ?err, "room state fetch failed");
                Ok(())
            }
        }
    }

    /// Full clear-and-redraw from one atomic snapshot; no diffing against
    /// the previous pass.
    fn apply_snapshot(&mut self, snapshot: RoomSnapshot) {
        self.summary = RoomSummary::from_snapshot(&snapshot);

        self.map.clear_marks();
        for p in &snapshot.participants {
            self.map.add_participant(p);
        }
        self.map.set_centroid(snapshot.centroid);
        self.map.set_best(snapshot.best());

        let mut points: Vec<Option<Coordinates>> =
            snapshot.participants.iter().map(|p| p.position()).collect();
        points.push(snapshot.centroid);
        points.push(snapshot.best());
        viewport::fit(self.map.widget_mut(), &points);

        if let Some(results) = snapshot.results {
            self.render_suggestions(results.items, results.centroid);
        }
    }
}
