//! Concert API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use concerts_core::{Concert, ConcertError, ConcertPatch, NewConcert, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a concert
#[derive(Debug, Deserialize)]
pub struct CreateConcertBody {
    /// Optional caller-chosen id
    pub id: Option<String>,
    pub name: String,
    pub band: String,
    pub concert_date: DateTime<Utc>,
}

/// Request body for updating a concert. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateConcertBody {
    pub name: Option<String>,
    pub band: Option<String>,
    pub concert_date: Option<DateTime<Utc>>,
}

/// Query parameters for name search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
}

/// Response for concert operations
#[derive(Debug, Serialize)]
pub struct ConcertResponse {
    pub id: String,
    pub name: String,
    pub band: String,
    pub concert_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tickets: Option<String>,
    pub is_deleted: bool,
}

impl From<Concert> for ConcertResponse {
    fn from(concert: Concert) -> Self {
        Self {
            id: concert.id,
            name: concert.name,
            band: concert.band,
            concert_date: concert.concert_date.to_rfc3339(),
            available_tickets: concert.available_tickets,
            is_deleted: concert.is_deleted,
        }
    }
}

/// Response for listing concerts
#[derive(Debug, Serialize)]
pub struct ListConcertsResponse {
    pub concerts: Vec<ConcertResponse>,
    pub total: usize,
}

impl From<Vec<Concert>> for ListConcertsResponse {
    fn from(concerts: Vec<Concert>) -> Self {
        let concerts: Vec<ConcertResponse> =
            concerts.into_iter().map(ConcertResponse::from).collect();
        Self {
            total: concerts.len(),
            concerts,
        }
    }
}

/// Response for delete
#[derive(Debug, Serialize)]
pub struct DeleteConcertResponse {
    pub deleted: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ConcertErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

type ApiError = (StatusCode, Json<ConcertErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ConcertErrorResponse {
            error: message.into(),
            kind: "invalid_request".to_string(),
            candidates: None,
        }),
    )
}

fn status_for(err: &ConcertError) -> StatusCode {
    match err {
        ConcertError::NotFound(_) | ConcertError::NoMatchByName(_) => StatusCode::NOT_FOUND,
        ConcertError::AmbiguousService(_) => StatusCode::CONFLICT,
        ConcertError::ServiceUnavailable | ConcertError::Discovery(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ConcertError::RemoteCallFailure(_) => StatusCode::BAD_GATEWAY,
        ConcertError::Storage(StoreError::Conflict(_)) => StatusCode::CONFLICT,
        ConcertError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ConcertError> for ConcertErrorResponse {
    fn from(err: ConcertError) -> Self {
        let candidates = match &err {
            ConcertError::AmbiguousService(names) => Some(names.clone()),
            _ => None,
        };
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            candidates,
        }
    }
}

fn error_response(err: ConcertError) -> ApiError {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(kind = err.kind(), "Concert request failed: {}", err);
    } else {
        debug!(kind = err.kind(), "Concert request rejected: {}", err);
    }
    (status, Json(ConcertErrorResponse::from(err)))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(bad_request(format!("{} must not be empty", field)));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new concert
pub async fn create_concert(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateConcertBody>,
) -> Result<(StatusCode, Json<ConcertResponse>), ApiError> {
    require_non_empty("name", &body.name)?;
    require_non_empty("band", &body.band)?;

    let mut request = NewConcert::new(body.name, body.band, body.concert_date);
    if let Some(id) = body.id {
        require_non_empty("id", &id)?;
        request = request.with_id(id);
    }

    let concert = state
        .concerts()
        .create(request)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(ConcertResponse::from(concert))))
}

/// List all concerts
pub async fn list_concerts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListConcertsResponse>, ApiError> {
    let concerts = state.concerts().list_all().await.map_err(error_response)?;
    Ok(Json(ListConcertsResponse::from(concerts)))
}

/// Search concerts by name fragment
pub async fn search_concerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListConcertsResponse>, ApiError> {
    let concerts = state
        .concerts()
        .find_by_name(&params.name)
        .await
        .map_err(error_response)?;
    Ok(Json(ListConcertsResponse::from(concerts)))
}

/// Get a concert by id, decorated with live ticket availability
pub async fn get_concert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConcertResponse>, ApiError> {
    let concert = state.concerts().resolve(&id).await.map_err(error_response)?;
    Ok(Json(ConcertResponse::from(concert)))
}

/// Update a concert
pub async fn update_concert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateConcertBody>,
) -> Result<Json<ConcertResponse>, ApiError> {
    if let Some(ref name) = body.name {
        require_non_empty("name", name)?;
    }
    if let Some(ref band) = body.band {
        require_non_empty("band", band)?;
    }

    let patch = ConcertPatch {
        name: body.name,
        band: body.band,
        concert_date: body.concert_date,
    };

    let concert = state
        .concerts()
        .update(&id, patch)
        .await
        .map_err(error_response)?;
    Ok(Json(ConcertResponse::from(concert)))
}

/// Soft-delete a concert
pub async fn delete_concert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConcertResponse>, ApiError> {
    let deleted = state.concerts().delete(&id).await.map_err(error_response)?;
    Ok(Json(DeleteConcertResponse { deleted }))
}
