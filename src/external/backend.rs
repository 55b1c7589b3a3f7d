use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::env;

use crate::{
    api::{
        CreateRoomParams, CreatedRoom, EtaResults, GeocodeAPI, JoinedRoom, PlaceHit, RoomAPI,
        SuggestAPI, SuggestResults, API,
    },
    entities::{Coordinates, RoomSnapshot, TravelMode},
    error::{upstream_error, validation_error, Error},
    external::nominatim,
};

/// HTTP client for the meeting-midpoint backend.
#[derive(Debug, Clone)]
pub struct Backend {
    base: String,
    client: reqwest::Client,
}

impl Backend {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(env::var("MIDPOINT_API_BASE")?))
    }

    /// Liveness probe against `/api/health`.
    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> Result<(), Error> {
        let res = self
            .client
            .get(format!("{}/api/health", self.base))
            .send()
            .await?;

        check_status(&res)?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let res = self
            .client
            .get(format!("{}{}", self.base, path))
            .query(query)
            .send()
            .await?;

        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let res = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await?;

        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn post_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let res = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await?;

        check_status(&res)?;
        Ok(())
    }
}

fn check_status(res: &reqwest::Response) -> Result<(), Error> {
    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(validation_error(format!("request rejected ({})", status_code)));
    } else if status_code < 200 || status_code >= 300 {
        return Err(upstream_error(format!("upstream error ({})", status_code)));
    }

    Ok(())
}

#[async_trait]
impl RoomAPI for Backend {
    #[tracing::instrument(skip(self))]
    async fn room_state(&self, code: &str) -> Result<RoomSnapshot, Error> {
        self.get_json("/api/room/state", &[("code", code)]).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_room(&self, params: CreateRoomParams) -> Result<CreatedRoom, Error> {
        self.post_json("/api/room/create", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn join_room(
        &self,
        code: &str,
        nickname: &str,
        pid: Option<&str>,
    ) -> Result<JoinedRoom, Error> {
        let mut body = json!({ "code": code, "nickname": nickname });
        if let Some(pid) = pid {
            body["pid"] = json!(pid);
        }
        self.post_json("/api/room/join", &body).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_location(
        &self,
        code: &str,
        pid: &str,
        coords: Coordinates,
        mode: TravelMode,
    ) -> Result<(), Error> {
        self.post_ack(
            "/api/room/update",
            &json!({
                "code": code,
                "pid": pid,
                "lat": coords.lat,
                "lng": coords.lng,
                "mode": mode,
            }),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn leave_room(&self, code: &str, pid: &str) -> Result<(), Error> {
        self.post_ack("/api/room/leave", &json!({ "code": code, "pid": pid }))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn close_room(&self, code: &str, host_secret: &str) -> Result<(), Error> {
        self.post_ack(
            "/api/room/close",
            &json!({ "code": code, "hostSecret": host_secret }),
        )
        .await
    }
}

#[async_trait]
impl SuggestAPI for Backend {
    #[tracing::instrument(skip(self))]
    async fn meeting_suggest(
        &self,
        room_code: &str,
        category: &str,
        radius: u32,
        query: &str,
    ) -> Result<SuggestResults, Error> {
        self.post_json(
            "/api/meeting-suggest",
            &json!({
                "roomCode": room_code,
                "category": category,
                "radius": radius,
                "query": query,
            }),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn eta_centroid(
        &self,
        room_code: &str,
        search_radius: u32,
        include_top_n: u32,
    ) -> Result<EtaResults, Error> {
        self.post_json(
            "/api/eta-centroid",
            &json!({
                "roomCode": room_code,
                "searchRadius": search_radius,
                "includeTopN": include_top_n,
                "twoStage": true,
            }),
        )
        .await
    }
}

#[async_trait]
impl GeocodeAPI for Backend {
    #[tracing::instrument(skip(self))]
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceHit>, Error> {
        nominatim::search(&self.client, query).await
    }
}

impl API for Backend {}
