use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::model::{BookingWithRefs, FacilityWithBookings, MemberWithSponsored};
use crate::query::QueryService;
use crate::server::AppState;
use std::sync::Arc;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Any failure reaching a handler; always reported as a 500
#[derive(Debug)]
pub struct ApiError(crate::Error);

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: self.0.to_string() }),
        )
            .into_response()
    }
}

pub async fn list_facilities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FacilityWithBookings>>, ApiError> {
    let store = state.store.lock().await;
    let facilities = QueryService::new(&store).list_facilities()?;
    Ok(Json(facilities))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingWithRefs>>, ApiError> {
    let store = state.store.lock().await;
    let bookings = QueryService::new(&store).list_bookings()?;
    Ok(Json(bookings))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberWithSponsored>>, ApiError> {
    let store = state.store.lock().await;
    let members = QueryService::new(&store).list_members()?;
    Ok(Json(members))
}
