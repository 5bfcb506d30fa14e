//! Form session route handlers
//!
//! Every handler locks its session for the whole request, so the cascade
//! and the recompute that follows run without interleaving.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::cache::SharedSession;
use crate::error::{AppError, Result};
use crate::pricing::calculators::coerce_count_value;
use crate::pricing::models::Modality;
use crate::pricing::responses::PricingResponse;
use crate::reservations::ledger::{AddOnEntry, AddOnLine, AddOnRow};
use crate::reservations::record::ReservationDetails;
use crate::reservations::selection::SelectionState;
use crate::reservations::services;
use crate::reservations::session::{
    FormMode, FormSession, FormView, ReservationSubmission, SessionError,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create))
        .route("/sessions/:id", get(show))
        .route("/sessions/:id/new", post(start_new))
        .route("/sessions/:id/edit/:reservation_id", post(start_edit))
        .route("/sessions/:id/catalog", post(reload_catalog))
        .route("/sessions/:id/sede", put(change_sede))
        .route("/sessions/:id/details", put(update_details))
        .route("/sessions/:id/modality", put(change_modality))
        .route("/sessions/:id/room", put(change_room))
        .route("/sessions/:id/package", put(select_package))
        .route("/sessions/:id/time-slot", put(select_time_slot))
        .route("/sessions/:id/guests", put(set_guests))
        .route("/sessions/:id/add-ons", post(add_add_on))
        .route("/sessions/:id/add-ons/:index", delete(remove_add_on))
        .route("/sessions/:id/submission", get(submission))
        .route("/sessions/:id/submit", post(submit))
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub sede_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SedeRequest {
    pub sede_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ModalityRequest {
    pub modalidad: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomRequest {
    pub salon: String,
}

#[derive(Debug, Deserialize)]
pub struct PackageRequest {
    #[serde(default)]
    pub paquete: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSlotRequest {
    #[serde(default)]
    pub horario: Option<String>,
}

/// Raw values from the guest inputs; a missing field keeps the current count
#[derive(Debug, Deserialize)]
pub struct GuestsRequest {
    #[serde(default)]
    pub ninos: Option<Value>,
    #[serde(default)]
    pub adultos: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AddOnRequest {
    /// `None` when nothing is selected in the add-on picker
    #[serde(default)]
    pub adicional: Option<AddOnEntry>,
    #[serde(default)]
    pub cantidad: Value,
}

/// Everything the page needs to render the form
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub mode: FormMode,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub sede_id: Option<i64>,
    pub details: ReservationDetails,
    pub selection: SelectionState,
    pub add_ons: Vec<AddOnRow>,
    pub view: FormView,
    pub children_placeholder: String,
    pub adults_placeholder: String,
    pub pricing: Option<PricingResponse>,
}

impl From<&FormSession> for SessionResponse {
    fn from(session: &FormSession) -> Self {
        let mode = session.mode();
        let view = session.view().clone();
        Self {
            id: session.id(),
            mode,
            title: mode.title(),
            submit_label: mode.submit_label(),
            action: mode.action(),
            sede_id: session.sede_id(),
            details: session.details().clone(),
            selection: session.selection().clone(),
            add_ons: session.ledger().rows(),
            children_placeholder: view.children_placeholder(),
            adults_placeholder: view.adults_placeholder(),
            view,
            pricing: session.pricing().map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub action: String,
    pub fields: ReservationSubmission,
}

#[derive(Debug, Serialize)]
pub struct RemovedAddOnResponse {
    pub removed: AddOnLine,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: u16,
    pub redirect_to: Option<String>,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession> {
    state
        .cache
        .session(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))
}

/// Open a form session, optionally bound to a site
async fn create(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let sede_id = request.and_then(|Json(request)| request.sede_id);
    let shared = services::open_session(&state.cache, &state.backend, sede_id).await;
    let session = shared.lock().await;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&*session))))
}

async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn start_new(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.reset_for_new();
    Ok(Json(SessionResponse::from(&*session)))
}

async fn start_edit(
    State(state): State<AppState>,
    Path((id, reservation_id)): Path<(Uuid, i64)>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    services::edit_reservation(&state.backend, &mut session, reservation_id).await?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn reload_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    services::retry_catalog(&state.cache, &state.backend, &mut session).await?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn change_sede(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SedeRequest>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    services::change_sede(&state.backend, &mut session, request.sede_id).await;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(details): Json<ReservationDetails>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.update_details(details);
    Ok(Json(SessionResponse::from(&*session)))
}

async fn change_modality(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ModalityRequest>,
) -> Result<Json<SessionResponse>> {
    let modality = request.modalidad.trim();
    if modality.is_empty() {
        return Err(SessionError::UnknownOption {
            field: "modalidad",
            value: request.modalidad,
        }
        .into());
    }

    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.change_modality(Modality::from(modality));
    Ok(Json(SessionResponse::from(&*session)))
}

async fn change_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RoomRequest>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.change_room(request.salon)?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn select_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PackageRequest>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.select_package(request.paquete)?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn select_time_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TimeSlotRequest>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.select_time_slot(request.horario)?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn set_guests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuestsRequest>,
) -> Result<Json<SessionResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.set_guest_counts(
        request.ninos.as_ref().map(coerce_count_value),
        request.adultos.as_ref().map(coerce_count_value),
    );
    Ok(Json(SessionResponse::from(&*session)))
}

async fn add_add_on(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddOnRequest>,
) -> Result<Json<SessionResponse>> {
    // negative and malformed quantities coerce to 0, which the ledger rejects
    let quantity = i64::from(coerce_count_value(&request.cantidad));
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.add_add_on(request.adicional.as_ref(), quantity)?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn remove_add_on(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<RemovedAddOnResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    let removed = session.remove_add_on(index)?;
    Ok(Json(RemovedAddOnResponse {
        removed,
        session: SessionResponse::from(&*session),
    }))
}

/// Form fields exactly as they would be posted
async fn submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionResponse>> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    let fields = session.submission();
    Ok(Json(SubmissionResponse {
        action: fields.action.clone(),
        fields,
    }))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    let outcome = services::submit(&state.cache, &state.backend, &session).await?;
    Ok(Json(SubmitResponse {
        status: outcome.status,
        redirect_to: outcome.redirect_to,
    }))
}
