use super::Engine;

use crate::{
    api::{CreateRoomParams, CreatedRoom},
    entities::TravelMode,
    error::{validation_error, Error},
};

const DEFAULT_HOST_NICKNAME: &str = "host";
const DEFAULT_GUEST_NICKNAME: &str = "guest";

impl Engine {
    /// Creates a room and immediately joins it as host. The invite link is
    /// taken from the response when present, otherwise synthesized from the
    /// configured public origin.
    #[tracing::instrument(skip(self))]
    pub async fn create_room(
        &mut self,
        purpose: &str,
        meeting_time: &str,
        ttl_minutes: u32,
    ) -> Result<CreatedRoom, Error> {
        let created = self
            .api
            .create_room(CreateRoomParams {
                purpose: purpose.trim().to_string(),
                meeting_time: meeting_time.trim().to_string(),
                ttl_minutes,
            })
            .await?;

        self.session.set_code(&created.code);
        self.session.set_host_secret(&created.host_secret);

        let join_url = created.join_url.clone().unwrap_or_else(|| match &self.public_base {
            Some(base) => format!("{}/?code={}", base, created.code),
            None => format!("/?code={}", created.code),
        });
        self.session.set_join_url(&join_url);

        let nickname = self
            .session
            .nickname()
            .unwrap_or_else(|| DEFAULT_HOST_NICKNAME.to_string());
        let joined = self.api.join_room(&created.code, &nickname, None).await?;
        self.session.set_pid(&joined.pid);

        self.refresh().await?;
        Ok(created)
    }

    /// Joins an existing room. Codes are case-insensitive on entry; a
    /// previously issued pid is reused so a rejoin keeps identity.
    #[tracing::instrument(skip(self))]
    pub async fn join_room(&mut self, code: &str, nickname: &str) -> Result<String, Error> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(validation_error("room code required"));
        }

        let nickname = match nickname.trim() {
            "" => DEFAULT_GUEST_NICKNAME.to_string(),
            n => n.to_string(),
        };

        let previous_pid = self.session.pid();
        let joined = self
            .api
            .join_room(&code, &nickname, previous_pid.as_deref())
            .await?;

        self.session.set_code(&code);
        self.session.set_nickname(&nickname);
        self.session.set_pid(&joined.pid);

        self.refresh().await?;
        Ok(joined.pid)
    }

    /// Sends the canonical coordinate and travel mode to the server.
    /// Validation failures abort before any network call.
    #[tracing::instrument(skip(self))]
    pub async fn submit_update(&mut self, mode: TravelMode) -> Result<(), Error> {
        let code = self
            .session
            .code()
            .ok_or_else(|| validation_error("join a room first"))?;
        let pid = self
            .session
            .pid()
            .ok_or_else(|| validation_error("join a room first"))?;

        let coords = self
            .current_coordinate()
            .ok_or_else(|| validation_error("set a location first (GPS, search, or map pick)"))?;

        self.api.update_location(&code, &pid, coords, mode).await?;
        self.input
            .set_status(format!("saved to server ({})", mode.name()));

        self.refresh().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn leave_room(&mut self) -> Result<(), Error> {
        let code = self
            .session
            .code()
            .ok_or_else(|| validation_error("not currently joined"))?;
        let pid = self
            .session
            .pid()
            .ok_or_else(|| validation_error("not currently joined"))?;

        self.api.leave_room(&code, &pid).await?;
        self.session.clear_membership();

        self.refresh().await
    }

    /// Closes the room with the host secret and drops all room-bound
    /// session state; the engine returns to Idle.
    #[tracing::instrument(skip(self))]
    pub async fn close_room(&mut self, host_secret: &str) -> Result<(), Error> {
        let code = self
            .session
            .code()
            .ok_or_else(|| validation_error("no room code to close"))?;

        let host_secret = host_secret.trim();
        if host_secret.is_empty() {
            return Err(validation_error("host secret required"));
        }

        self.api.close_room(&code, host_secret).await?;

        self.session.clear_room();
        self.summary = Default::default();
        self.map.clear_marks();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{engine_with, StubApi};
    use crate::engine::Phase;
    use crate::entities::Coordinates;
    use std::sync::Arc;
    use tokio_test::block_on;

    #[test]
    fn create_room_joins_as_host_and_polls() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        let created = block_on(engine.create_room("lunch", "12:30", 120)).unwrap();
        assert_eq!(created.code.len(), 6);
        assert_eq!(engine.phase(), Phase::Polling);
        assert_eq!(engine.session().pid(), Some("pid-0".to_string()));
        assert_eq!(
            engine.session().join_url(),
            Some("/?code=ABC123".to_string())
        );

        let calls = api.calls();
        assert_eq!(calls[0], "create:lunch");
        assert_eq!(calls[1], "join:ABC123:host:-");
        assert_eq!(calls[2], "state:ABC123");
    }

    #[test]
    fn join_uppercases_code_and_defaults_nickname() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        block_on(engine.join_room(" abc123 ", "  ")).unwrap();
        assert_eq!(engine.session().code(), Some("ABC123".to_string()));
        assert_eq!(api.calls()[0], "join:ABC123:guest:-");
    }

    #[test]
    fn rejoin_reuses_previous_pid() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        let first = block_on(engine.join_room("abc123", "Alice")).unwrap();
        let second = block_on(engine.join_room("abc123", "Alice")).unwrap();
        assert_ne!(first, second, "stub issues distinct pids");
        assert_eq!(api.calls()[2], format!("join:ABC123:Alice:{}", first));
    }

    #[test]
    fn join_requires_a_code() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        let err = block_on(engine.join_room("  ", "Alice")).unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn update_without_membership_is_rejected_offline() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());

        let err = block_on(engine.submit_update(TravelMode::Walk)).unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn update_without_a_location_is_rejected_offline() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");
        engine.session_mut().set_pid("pid-9");

        let err = block_on(engine.submit_update(TravelMode::Car)).unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn update_sends_canonical_coordinate_then_refreshes() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");
        engine.session_mut().set_pid("pid-9");
        engine.apply_gps(Coordinates::new(37.5, 127.0));

        block_on(engine.submit_update(TravelMode::Bus)).unwrap();
        assert_eq!(engine.status(), "saved to server (bus)");

        let calls = api.calls();
        assert_eq!(calls[0], "update:ABC123:pid-9:37.5:127:bus");
        assert_eq!(calls[1], "state:ABC123");
    }

    #[test]
    fn update_falls_back_to_marker_after_drag() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");
        engine.session_mut().set_pid("pid-9");

        engine.apply_gps(Coordinates::new(37.5, 127.0));
        engine.handle_map_event(crate::map::MapEvent::OwnMarkerDragged(Coordinates::new(
            37.6, 127.1,
        )));

        block_on(engine.submit_update(TravelMode::Walk)).unwrap();
        assert!(api.calls()[0].starts_with("update:ABC123:pid-9:37.6:127.1"));
    }

    #[test]
    fn leave_clears_pid_but_keeps_code() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");
        engine.session_mut().set_pid("pid-9");

        block_on(engine.leave_room()).unwrap();
        assert_eq!(engine.session().pid(), None);
        assert_eq!(engine.phase(), Phase::Polling);
    }

    #[test]
    fn close_requires_secret_and_returns_to_idle() {
        let api = Arc::new(StubApi::default());
        let (mut engine, _) = engine_with(api.clone());
        engine.session_mut().set_code("ABC123");

        let err = block_on(engine.close_room("  ")).unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls().is_empty());

        block_on(engine.close_room("s3cret")).unwrap();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.session().host_secret(), None);
        assert!(engine.summary().participants.is_empty());
    }
}
