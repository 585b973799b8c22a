use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, Uri, header},
    response::IntoResponse,
};
use ringflake::{SnowflakeGeneratorAsyncExt, TokioSleep, is_base62_key};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AppState;
use crate::server::{
    error::ApiError,
    store::UrlRecord,
};

#[derive(Debug, Deserialize)]
pub struct NewUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUrlResponse {
    pub url: String,
    #[serde(rename = "shortenUrl")]
    pub shorten_url: String,
}

pub async fn ping() -> Json<&'static str> {
    Json("pong")
}

/// Answers peers asking which identity this process took.
pub async fn node(State(state): State<AppState>) -> String {
    state.node().to_string()
}

/// Mints a short key for a URL.
#[instrument(level = "debug", skip(state, payload))]
pub async fn new_url(
    State(state): State<AppState>,
    payload: Result<Json<NewUrlRequest>, JsonRejection>,
) -> Result<Json<NewUrlResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    validate_url(&request.url)?;

    let id = state
        .generator
        .generate_async::<TokioSleep>()
        .await
        .map_err(ApiError::Generate)?;
    let key = id.to_base62(state.short_id_width);

    state.store.put(UrlRecord {
        id: key.clone(),
        url: request.url.clone(),
    })?;
    tracing::debug!(%id, %key, "stored short url");

    Ok(Json(NewUrlResponse {
        shorten_url: format!("http://{}/{}", state.url_domain, key),
        url: request.url,
    }))
}

/// Redirects a short key to its URL.
#[instrument(level = "debug", skip(state))]
pub async fn redirect(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_base62_key(&key, state.short_id_width) {
        return Err(ApiError::InvalidKey);
    }

    let target = match state.cache.get(&key) {
        Some(url) => url,
        None => {
            let record = state
                .store
                .get(&key)?
                .ok_or_else(|| ApiError::NotFound(key.clone()))?;
            state.cache.add(record.id, record.url.clone());
            record.url
        }
    };

    validate_url(&target)?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]))
}

/// Accepts absolute URLs only: a scheme and an authority are required.
fn validate_url(url: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::InvalidUrl(url.to_owned());
    let uri = url.parse::<Uri>().map_err(|_| invalid())?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(invalid());
    }
    Ok(())
}
