use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{Coordinates, ParticipantEta, RoomSnapshot, SuggestionItem, TravelMode};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomParams {
    pub purpose: String,
    pub meeting_time: String,
    pub ttl_minutes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoom {
    pub code: String,
    pub host_secret: String,
    pub join_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinedRoom {
    pub pid: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestResults {
    #[serde(default)]
    pub items: Vec<SuggestionItem>,
    pub centroid: Option<Coordinates>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EtaResults {
    pub participants_eta: Option<Vec<ParticipantEta>>,
    #[serde(default)]
    pub candidate_count_stage1: u32,
    #[serde(default)]
    pub candidate_count_stage2: u32,
    pub best: Option<Coordinates>,
}

/// A free-text geocoder hit. Coordinates arrive as decimal strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceHit {
    #[serde(default)]
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

impl PlaceHit {
    pub fn position(&self) -> Option<Coordinates> {
        Coordinates::parse(&self.lat, &self.lon)
    }
}

#[async_trait]
pub trait RoomAPI {
    async fn room_state(&self, code: &str) -> Result<RoomSnapshot, Error>;
    async fn create_room(&self, params: CreateRoomParams) -> Result<CreatedRoom, Error>;
    async fn join_room(
        &self,
        code: &str,
        nickname: &str,
        pid: Option<&str>,
    ) -> Result<JoinedRoom, Error>;
    async fn update_location(
        &self,
        code: &str,
        pid: &str,
        coords: Coordinates,
        mode: TravelMode,
    ) -> Result<(), Error>;
    async fn leave_room(&self, code: &str, pid: &str) -> Result<(), Error>;
    async fn close_room(&self, code: &str, host_secret: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait SuggestAPI {
    async fn meeting_suggest(
        &self,
        room_code: &str,
        category: &str,
        radius: u32,
        query: &str,
    ) -> Result<SuggestResults, Error>;
    async fn eta_centroid(
        &self,
        room_code: &str,
        search_radius: u32,
        include_top_n: u32,
    ) -> Result<EtaResults, Error>;
}

#[async_trait]
pub trait GeocodeAPI {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceHit>, Error>;
}

pub trait API: RoomAPI + SuggestAPI + GeocodeAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
