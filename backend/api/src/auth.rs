//! Request identity.
//!
//! Session issuance lives in the identity provider in front of this
//! service; it forwards the authenticated user id in the `x-user-id`
//! header.  The extractor resolves that id against the `users` table once
//! per request — there is no in-process user store shared across requests.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::api::AppState;
use crate::db;
use crate::errors::ApiError;

const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, loaded fresh for each request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub current_sponsor_id: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let user = db::get_user(&state.pool, id).await?.ok_or_else(|| {
            warn!("Unknown user id in {USER_ID_HEADER} header: {id}");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            id: user.id,
            current_sponsor_id: user.current_sponsor_id,
        })
    }
}
