use std::env;

use crate::{
    api::PlaceHit,
    error::{upstream_error, validation_error, Error},
};

const DEFAULT_API_BASE: &str = "nominatim.openstreetmap.org";
const RESULT_LIMIT: u32 = 8;

/// Free-text place search against the OSM Nominatim endpoint.
#[tracing::instrument(skip(client))]
pub async fn search(client: &reqwest::Client, query: &str) -> Result<Vec<PlaceHit>, Error> {
    let api_base =
        env::var("NOMINATIM_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let url = format!("https://{}/search", api_base);

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .query(&[("format", "json")])
        .query(&[("q", query)])
        .query(&[("limit", RESULT_LIMIT)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(validation_error(format!("search rejected ({})", status_code)));
    } else if status_code != 200 {
        return Err(upstream_error(format!("search failed ({})", status_code)));
    }

    Ok(res.json().await?)
}
