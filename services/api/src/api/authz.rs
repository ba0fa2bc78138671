//! Authorization helpers.
//!
//! Roles live on the caller's profile; administrative endpoints require
//! `admin`.

use ims_id::ProfileId;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::state::AppState;
use crate::store::Role;

pub fn require_authenticated(ctx: &RequestContext) -> Result<ProfileId, ApiError> {
    ctx.profile_id.ok_or_else(|| {
        ApiError::unauthorized("unauthorized", "Missing or invalid Authorization token")
            .with_request_id(ctx.request_id.clone())
    })
}

/// Resolve the caller's role; unknown profiles are treated as unauthenticated.
pub async fn require_role(state: &AppState, ctx: &RequestContext) -> Result<Role, ApiError> {
    let profile_id = require_authenticated(ctx)?;
    let request_id = &ctx.request_id;

    let role = state
        .identities()
        .profile_role(profile_id)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %request_id,
                profile_id = %profile_id,
                "Failed to load profile role"
            );
            ApiError::internal("internal_error", "Failed to authorize request")
                .with_request_id(request_id.clone())
        })?;

    role.ok_or_else(|| {
        ApiError::unauthorized("unauthorized", "Unknown profile").with_request_id(request_id.clone())
    })
}

pub fn require_admin_role(role: Role, request_id: &str) -> Result<(), ApiError> {
    match role {
        Role::Admin => Ok(()),
        Role::Lecturer | Role::Student => Err(ApiError::forbidden(
            "forbidden",
            "Admin role required for this operation",
        )
        .with_request_id(request_id)),
    }
}

pub async fn require_admin(state: &AppState, ctx: &RequestContext) -> Result<(), ApiError> {
    let role = require_role(state, ctx).await?;
    require_admin_role(role, &ctx.request_id)
}
