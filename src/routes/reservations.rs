//! Reservation detail, contract and site code handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::reservations::contract::ContractTemplate;
use crate::reservations::detail::ReservationDetailView;
use crate::reservations::services::next_code_or_placeholder;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations/:id", get(detail))
        .route("/reservations/:id/contract", get(contract))
        .route("/sedes/:sede_id/next-code", get(next_code))
}

#[derive(Debug, Serialize)]
pub struct NextCodeResponse {
    pub codigo: String,
}

/// Read-only view of a stored reservation
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReservationDetailView>> {
    let record = state.backend.fetch_reservation(id).await?;
    Ok(Json(ReservationDetailView::from(&record)))
}

/// Printable contract, issued with today's date
async fn contract(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Html<String>> {
    let record = state.backend.fetch_reservation(id).await?;
    let template = ContractTemplate::from_record(&record, chrono::Local::now().date_naive());
    Ok(Html(template.render()?))
}

async fn next_code(
    State(state): State<AppState>,
    Path(sede_id): Path<i64>,
) -> Json<NextCodeResponse> {
    Json(NextCodeResponse {
        codigo: next_code_or_placeholder(&state.backend, sede_id).await,
    })
}
