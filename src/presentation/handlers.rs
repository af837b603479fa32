// HTTP request handlers
use crate::application::chart_service::{DatasetRequest, SeriesView, ServiceError, ViewOptions};
use crate::application::dataset_repository::FetchErrorCode;
use crate::domain::events::EventsOverlay;
use crate::domain::offset::Offset;
use crate::domain::point_series::Role;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub url: String,
    pub gaps: Option<bool>,
    pub threshold: Option<f64>,
    pub theme: Option<String>,
    /// Milliseconds, or a duration such as `3 d`.
    pub offset: Option<String>,
    pub synthetic_range: Option<bool>,
    /// Comma-separated role per tuple position; empty entries are unused.
    pub roles: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub url: String,
    pub types: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError::Service(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "message": message })),
            ApiError::Service(ServiceError::Upstream(e)) => {
                let status = match e.code {
                    FetchErrorCode::ProxyTimeout | FetchErrorCode::GatewayTimeout | FetchErrorCode::RequestFailed => {
                        StatusCode::BAD_GATEWAY
                    }
                    FetchErrorCode::Latis => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, json!(e))
            }
            ApiError::Service(ServiceError::Configuration(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "message": e.to_string() }))
            }
            ApiError::Service(ServiceError::Events(e)) => (StatusCode::BAD_GATEWAY, json!({ "message": e.to_string() })),
        };
        tracing::warn!("Request failed with {}: {}", status, body);
        (status, Json(body)).into_response()
    }
}

fn parse_role(tag: &str) -> Result<Option<Role>, ApiError> {
    match tag.trim() {
        "" => Ok(None),
        "x" => Ok(Some(Role::X)),
        "y" => Ok(Some(Role::Y)),
        "yMin" => Ok(Some(Role::YMin)),
        "yMax" => Ok(Some(Role::YMax)),
        other => Err(ApiError::BadRequest(format!("Unknown role '{}'", other))),
    }
}

fn parse_roles(text: &str) -> Result<Vec<Option<Role>>, ApiError> {
    text.split(',').map(parse_role).collect()
}

fn parse_offset(text: &str) -> Offset {
    match text.trim().parse::<f64>() {
        Ok(ms) => Offset::from(ms),
        Err(_) => Offset::from(text),
    }
}

fn parse_type_ids(text: &str) -> Result<Vec<i64>, ApiError> {
    text.split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| {
            t.trim()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Invalid event type id '{}'", t)))
        })
        .collect()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Fetch one dataset and return every derived view of it
pub async fn get_series(
    Query(query): Query<SeriesQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeriesView>, ApiError> {
    let config = &state.config;
    let theme = config
        .themes
        .resolve(query.theme.as_deref())
        .ok_or_else(|| ApiError::BadRequest("No color theme configured".to_string()))?;

    let request = DatasetRequest {
        access_url: query.url.clone(),
        roles: query.roles.as_deref().map(parse_roles).transpose()?,
        offset: query.offset.as_deref().map(parse_offset).unwrap_or_default(),
        link_url: query.link.clone(),
    };
    let options = ViewOptions {
        gap_threshold: query
            .gaps
            .unwrap_or(config.gaps.enabled)
            .then(|| query.threshold.unwrap_or(config.gaps.threshold)),
        synthetic_range: query.synthetic_range.unwrap_or(false),
        zones: theme.zones.clone(),
        bands: theme.bands.clone(),
    };

    let view = state.chart_service.series_view(&request, &options).await?;
    Ok(Json(view))
}

/// Fetch an events dataset and lay it out for the requested types
pub async fn get_events(
    Query(query): Query<EventsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventsOverlay>, ApiError> {
    let type_ids = match query.types.as_deref() {
        Some(types) => parse_type_ids(types)?,
        None => Vec::new(),
    };
    let overlay = state.chart_service.events_overlay(&query.url, &type_ids).await?;
    Ok(Json(overlay))
}
