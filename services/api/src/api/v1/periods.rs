//! Internship period endpoints.
//!
//! Provides lecturer auto-assignment for a period.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use ims_id::{PeriodId, RegistrationId};
use serde::Serialize;

use crate::api::authz;
use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::assignment::{AssignError, AssignOutcome, AssignSummary};
use crate::state::AppState;

pub const NOTHING_TO_DO_MESSAGE: &str = "No unassigned students found";
pub const NO_CAPACITY_MESSAGE: &str = "No available lecturers with remaining slots";

/// Create period routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/{period_id}/auto-assign", post(auto_assign))
}

// =============================================================================
// Response Types
// =============================================================================

/// Response when no student in the period is waiting.
#[derive(Debug, Serialize)]
pub struct NothingToDoResponse {
    pub message: String,
    pub assigned: usize,
}

/// Response for a completed auto-assignment run.
#[derive(Debug, Serialize)]
pub struct AutoAssignResponse {
    pub message: String,

    /// Allocation decisions made, including ones whose write failed.
    pub assigned: usize,

    /// Students that were waiting when the run started.
    pub total_unassigned: usize,

    /// Students with no lecturer available in their department.
    pub skipped: usize,

    /// Assignments actually written.
    pub confirmed: usize,

    /// Registrations claimed by someone else before the write.
    pub conflicted: Vec<RegistrationId>,

    /// Registrations whose write failed.
    pub failed: Vec<RegistrationId>,
}

impl From<AssignSummary> for AutoAssignResponse {
    fn from(summary: AssignSummary) -> Self {
        Self {
            message: format!(
                "Assigned {} of {} unassigned students",
                summary.assigned, summary.total_unassigned
            ),
            assigned: summary.assigned,
            total_unassigned: summary.total_unassigned,
            skipped: summary.skipped,
            confirmed: summary.persistence.confirmed.len(),
            conflicted: summary.persistence.conflicted,
            failed: summary
                .persistence
                .failed
                .into_iter()
                .map(|failure| failure.registration_id)
                .collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Assign every waiting student of a period to a lecturer of their department.
///
/// POST /v1/periods/{period_id}/auto-assign
async fn auto_assign(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(period_id): Path<String>,
) -> Result<Response, ApiError> {
    let request_id = ctx.request_id.clone();

    authz::require_admin(&state, &ctx).await?;

    let period_id: PeriodId = period_id.parse().map_err(|_| {
        ApiError::bad_request("invalid_period_id", "Invalid period ID format")
            .with_request_id(request_id.clone())
    })?;

    match state.engine().auto_assign(period_id).await {
        Ok(AssignOutcome::NothingToDo) => Ok(Json(NothingToDoResponse {
            message: NOTHING_TO_DO_MESSAGE.to_string(),
            assigned: 0,
        })
        .into_response()),
        Ok(AssignOutcome::Completed(summary)) => {
            Ok(Json(AutoAssignResponse::from(summary)).into_response())
        }
        Err(AssignError::NoCapacity) => Err(ApiError::bad_request(
            "no_available_lecturers",
            NO_CAPACITY_MESSAGE,
        )
        .with_assigned(0)
        .with_request_id(request_id)),
        Err(e) => {
            tracing::error!(
                error = %e,
                request_id = %request_id,
                period_id = %period_id,
                "Auto-assignment failed"
            );
            Err(ApiError::internal("internal_error", "Failed to auto-assign lecturers")
                .with_request_id(request_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::create_router;
    use crate::store::{MemoryStore, Role};

    use super::*;

    async fn post_auto_assign(store: &Arc<MemoryStore>, period_id: PeriodId) -> (StatusCode, Value) {
        let admin = store.add_profile(Role::Admin, None);
        let request = Request::builder()
            .method("POST")
            .uri(format!("/v1/periods/{period_id}/auto-assign"))
            .header("authorization", format!("Bearer user:{admin}"))
            .body(Body::empty())
            .unwrap();

        let response = create_router(AppState::new(store.clone()))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_failed_writes_are_listed_and_counted() {
        let store = Arc::new(MemoryStore::new());
        let period_id = PeriodId::new();
        store.add_availability(period_id, store.add_profile(Role::Lecturer, Some("CS")), 4);
        let failing =
            store.add_registration(period_id, store.add_profile(Role::Student, Some("CS")));
        store.add_registration(period_id, store.add_profile(Role::Student, Some("CS")));
        store.fail_writes_for(failing);

        let (status, body) = post_auto_assign(&store, period_id).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assigned"], 2);
        assert_eq!(body["confirmed"], 1);
        assert_eq!(body["failed"], serde_json::json!([failing.to_string()]));
    }

    #[tokio::test]
    async fn test_collector_failure_is_internal_error() {
        let store = Arc::new(MemoryStore::new());
        let period_id = PeriodId::new();
        store.add_registration(period_id, store.add_profile(Role::Student, Some("CS")));
        store.set_reads_unavailable(true);

        let (status, body) = post_auto_assign(&store, period_id).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
        assert!(body.get("assigned").is_none());
    }
}
