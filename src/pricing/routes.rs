//! Pricing API routes.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use tracing::warn;

use crate::error::Result;
use crate::reservations::ledger::AddOnLedger;
use crate::reservations::selection::SelectionState;
use crate::AppState;

use super::calculators::{self, coerce_count_value};
use super::models::{Modality, PriceCatalog};
use super::requests::QuoteRequest;
use super::responses::QuoteResponse;
use super::services::load_catalog;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing/catalog", get(catalog))
        .route("/pricing/quote", post(quote))
}

/// Current reservation catalog
async fn catalog(State(state): State<AppState>) -> Result<Json<PriceCatalog>> {
    let catalog = load_catalog(&state.cache, &state.backend).await?;
    Ok(Json(PriceCatalog::clone(&catalog)))
}

/// Price a selection without opening a session
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let catalog = match load_catalog(&state.cache, &state.backend).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("Quote without catalog: {}", e);
            None
        }
    };

    let selection = SelectionState {
        modality: request
            .modalidad
            .filter(|m| !m.is_empty())
            .map(Modality::from),
        child_count: coerce_count_value(&request.ninos),
        adult_count: coerce_count_value(&request.adultos),
        ..SelectionState::default()
    };
    let ledger = AddOnLedger::from_records(request.adicionales);
    let pricing = calculators::compute(&selection, &ledger, catalog.as_deref());

    Ok(Json(QuoteResponse {
        catalog_loaded: catalog.as_ref().is_some_and(|c| c.is_loaded()),
        pricing: pricing.map(Into::into),
    }))
}
