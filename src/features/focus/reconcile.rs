//! Startup check for sessions left open by an earlier run.
//!
//! The backend allows one open session per user, so a session abandoned by a
//! crashed client blocks every later start until it is ended or discarded.

use tracing::{info, warn};

use crate::api::{ActiveSession, EndedSession, FocusApi};
use crate::error::FocusdeskError;

/// Ask the backend whether a session is still open.
///
/// # Errors
///
/// Returns the request failure.
pub async fn find_stale<A: FocusApi + ?Sized>(
    api: &A,
) -> Result<Option<ActiveSession>, FocusdeskError> {
    let stale = api.active_session().await?;
    if let Some(session) = &stale {
        warn!(
            session_id = session.session_id,
            start_time = %session.start_time,
            "Found an open focus session"
        );
    }
    Ok(stale)
}

/// Discard the open session without recording it.
///
/// # Errors
///
/// `NotFound` if no session is open, otherwise the request failure.
pub async fn discard_stale<A: FocusApi + ?Sized>(api: &A) -> Result<ActiveSession, FocusdeskError> {
    let stale = api
        .active_session()
        .await?
        .ok_or_else(|| FocusdeskError::NotFound("no open focus session".to_string()))?;
    api.discard_session().await?;
    info!(session_id = stale.session_id, "Discarded stale focus session");
    Ok(stale)
}

/// Record the open session as completed focus time.
///
/// # Errors
///
/// `NotFound` if no session is open, otherwise the request failure.
pub async fn end_stale<A: FocusApi + ?Sized>(api: &A) -> Result<EndedSession, FocusdeskError> {
    let stale = api
        .active_session()
        .await?
        .ok_or_else(|| FocusdeskError::NotFound("no open focus session".to_string()))?;
    let ended = api.end_session().await?;
    info!(
        session_id = stale.session_id,
        duration_minutes = ended.duration_minutes,
        "Ended focus session"
    );
    Ok(ended)
}
