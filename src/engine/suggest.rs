use super::Engine;

use crate::{
    api::PlaceHit,
    entities::{Coordinates, ParticipantEta, SuggestionItem},
    error::{validation_error, Error},
};

const CARD_PAN_MIN_ZOOM: f64 = 15.0;

/// One suggestion projected for display. Absent upstream metadata stays
/// absent; nothing is rendered as a placeholder string.
#[derive(Clone, Debug, PartialEq)]
pub struct SuggestionCard {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening: Option<String>,
    pub photo_url: Option<String>,
    pub tags: Vec<String>,
    pub position: Option<Coordinates>,
}

impl SuggestionCard {
    fn from_item(item: &SuggestionItem) -> Self {
        let mut tags = Vec::new();
        if let Some(category) = item.category_name.as_deref().filter(|c| !c.is_empty()) {
            tags.push(category.to_string());
        }
        if item.open_enough == Some(true) {
            tags.push("open long enough".to_string());
        }
        if let Some(dist) = item.centroid_dist_km {
            tags.push(format!("{}km", dist));
        }

        let opening = item.open_minutes_left.map(|minutes| {
            format!(
                "open for {} more min (closes {})",
                minutes,
                item.closes_at.as_deref().unwrap_or("")
            )
        });

        Self {
            name: item.place_name.clone(),
            address: item.address().map(str::to_string),
            phone: item.phone().map(str::to_string),
            opening,
            photo_url: item.photo_url.clone(),
            tags,
            position: item.position(),
        }
    }
}

impl Engine {
    /// Asks the backend for place suggestions near the centroid and renders
    /// the result. Returns the number of cards.
    #[tracing::instrument(skip(self))]
    pub async fn suggest(
        &mut self,
        category: &str,
        radius: u32,
        query: &str,
    ) -> Result<usize, Error> {
        let code = self
            .session
            .code()
            .ok_or_else(|| validation_error("create or join a room first"))?;

        let results = self
            .api
            .meeting_suggest(&code, category, radius, query.trim())
            .await?;
        self.render_suggestions(results.items, results.centroid);

        Ok(self.cards.len())
    }

    /// Runs the two-stage ETA midpoint search. The best point itself comes
    /// back through room state, so the pass ends with a full reconcile.
    #[tracing::instrument(skip(self))]
    pub async fn eta(&mut self, search_radius: u32, include_top_n: u32) -> Result<String, Error> {
        let code = self
            .session
            .code()
            .ok_or_else(|| validation_error("create or join a room first"))?;

        let results = self
            .api
            .eta_centroid(&code, search_radius, include_top_n)
            .await?;

        let summary = format!(
            "ETA midpoint computed. candidates (stage1 {} / stage2 {}){}",
            results.candidate_count_stage1,
            results.candidate_count_stage2,
            eta_suffix(results.participants_eta.as_deref()),
        );
        self.eta_summary = Some(summary.clone());

        self.map.clear_marks();
        self.refresh().await?;

        Ok(summary)
    }

    /// Pure projection of items into display cards.
    pub fn render_suggestions(
        &mut self,
        items: Vec<SuggestionItem>,
        centroid: Option<Coordinates>,
    ) {
        self.cards = items.iter().map(SuggestionCard::from_item).collect();
        self.suggest_centroid = centroid;
    }

    /// Card selection pans the map there and drops a transient pin.
    pub fn select_card(&mut self, index: usize) -> Result<(), Error> {
        let card = self
            .cards
            .get(index)
            .ok_or_else(|| validation_error("no such suggestion"))?;
        let coords = card
            .position
            .ok_or_else(|| validation_error("suggestion has no usable coordinates"))?;

        self.map.pan_to(coords, CARD_PAN_MIN_ZOOM);
        self.map.drop_pin(coords);
        Ok(())
    }

    /// Free-text geocoder lookup. An empty query short-circuits to no hits.
    #[tracing::instrument(skip(self))]
    pub async fn search_location(&mut self, query: &str) -> Result<Vec<PlaceHit>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.api.search_places(query).await
    }

    /// Applies a chosen geocoder hit as the canonical location.
    pub fn select_search_result(&mut self, hit: &PlaceHit) -> Result<(), Error> {
        let coords = hit
            .position()
            .ok_or_else(|| validation_error("search result has no usable coordinates"))?;

        self.input.apply_search(coords, &hit.display_name);
        self.map.upsert_own(coords, true);
        Ok(())
    }
}

fn eta_suffix(participants: Option<&[ParticipantEta]>) -> String {
    let Some(participants) = participants.filter(|p| !p.is_empty()) else {
        return String::new();
    };

    let parts: Vec<String> = participants
        .iter()
        .map(|p| {
            let who = if p.nickname.is_empty() {
                p.index.to_string()
            } else {
                p.nickname.clone()
            };
            format!("{}: {}min", who, p.eta_min)
        })
        .collect();

    format!(" | {}", parts.join(" · "))
}
