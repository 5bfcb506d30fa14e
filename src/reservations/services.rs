//! Form workflows that need the backend or the cache.
//!
//! Each workflow runs start to finish before returning: the catalog is in
//! place before the session accepts cascade events, and an edit applies the
//! record in one sequential pass.

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError, SubmitOutcome};
use crate::cache::{AppCache, SharedSession};
use crate::error::Result;
use crate::pricing::services::load_catalog;

use super::session::{FormSession, NO_SEDE_CODE};

/// Code for the next reservation at a site, or the placeholder when the
/// lookup fails.
pub async fn next_code_or_placeholder(backend: &BackendClient, sede_id: i64) -> String {
    match backend.next_code(sede_id).await {
        Ok(code) => code,
        Err(e) => {
            warn!(sede_id, "Could not fetch next reservation code: {}", e);
            NO_SEDE_CODE.to_string()
        }
    }
}

/// Open a new form session.
///
/// A failed catalog load leaves the session without prices; the caller can
/// retry with [`retry_catalog`].
pub async fn open_session(
    cache: &AppCache,
    backend: &BackendClient,
    sede_id: Option<i64>,
) -> SharedSession {
    let catalog = match load_catalog(cache, backend).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("Opening session without catalog: {}", e);
            None
        }
    };

    let mut session = FormSession::new(Uuid::new_v4(), catalog, NO_SEDE_CODE);
    if let Some(sede_id) = sede_id {
        let code = next_code_or_placeholder(backend, sede_id).await;
        session.set_sede(sede_id, code);
    }

    info!(session = %session.id(), sede_id = ?sede_id, "Opened reservation form session");
    cache.insert_session(session).await
}

/// Load the session's catalog again after a failed attempt.
pub async fn retry_catalog(
    cache: &AppCache,
    backend: &BackendClient,
    session: &mut FormSession,
) -> std::result::Result<(), BackendError> {
    let catalog = load_catalog(cache, backend).await?;
    session.attach_catalog(catalog);
    Ok(())
}

/// Switch the active site and refresh the code shown for new reservations.
pub async fn change_sede(backend: &BackendClient, session: &mut FormSession, sede_id: i64) {
    let code = next_code_or_placeholder(backend, sede_id).await;
    session.set_sede(sede_id, code);
}

/// Put the session in edit mode and fill it from the stored reservation.
///
/// When the fetch fails the session stays in edit mode with its previous
/// contents, and the error is returned to the caller.
pub async fn edit_reservation(
    backend: &BackendClient,
    session: &mut FormSession,
    reservation_id: i64,
) -> std::result::Result<(), BackendError> {
    session.begin_edit(reservation_id);
    let record = backend.fetch_reservation(reservation_id).await?;
    session.populate_from_record(&record);
    info!(session = %session.id(), reservation_id, code = %record.code, "Loaded reservation for editing");
    Ok(())
}

/// Validate and post the form, then close the session.
pub async fn submit(
    cache: &AppCache,
    backend: &BackendClient,
    session: &FormSession,
) -> Result<SubmitOutcome> {
    let submission = session.submission();
    submission.validate()?;

    let outcome = backend.submit_reservation(&submission).await?;

    info!(
        session = %session.id(),
        action = %submission.action,
        status = outcome.status,
        "Reservation submitted"
    );
    cache.remove_session(session.id()).await;
    Ok(outcome)
}
