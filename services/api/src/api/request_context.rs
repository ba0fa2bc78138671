//! Request-scoped context extracted from HTTP requests.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use ims_id::{ProfileId, RequestId};

use crate::api::error::ApiError;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    /// Profile named by the bearer token, if one was sent.
    pub profile_id: Option<ProfileId>,
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Resolve the caller from `Authorization: Bearer user:<profile-id>`.
///
/// Session issuing happens in front of this service; by the time a request
/// arrives the gateway has reduced the session to the caller's profile id.
fn profile_from_authorization_header(
    headers: &HeaderMap,
    request_id: &str,
) -> Result<Option<ProfileId>, ApiError> {
    let Some(auth_value) = header_string(headers, AUTHORIZATION_HEADER) else {
        return Ok(None);
    };

    let auth_value = auth_value.trim();
    let Some(token) = auth_value.strip_prefix("Bearer ") else {
        return Err(ApiError::unauthorized(
            "invalid_authorization",
            "Authorization must be a Bearer token",
        )
        .with_request_id(request_id));
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized(
            "invalid_authorization",
            "Authorization Bearer token cannot be empty",
        )
        .with_request_id(request_id));
    }

    let Some(profile_id) = token.strip_prefix("user:") else {
        return Err(ApiError::unauthorized(
            "invalid_token",
            "token must be in the form 'user:<profile-id>'",
        )
        .with_request_id(request_id));
    };

    profile_id.parse().map(Some).map_err(|_| {
        ApiError::unauthorized("invalid_token", "token does not name a valid profile id")
            .with_request_id(request_id)
    })
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = header_string(&parts.headers, REQUEST_ID_HEADER)
            .unwrap_or_else(|| RequestId::new().to_string());

        let profile_id = profile_from_authorization_header(&parts.headers, &request_id)?;

        Ok(Self {
            request_id,
            profile_id,
        })
    }
}
