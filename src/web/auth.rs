use axum::{extract::FromRequestParts, http::request::Parts};
use std::collections::HashSet;

use super::api::error::ApiError;
use super::config::Permission;
use super::state::AppState;

/// The caller behind a `Bearer` API key.
#[derive(Debug, Clone)]
pub struct ApiCaller {
    pub name: String,
    pub permissions: HashSet<Permission>,
}

impl ApiCaller {
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if self.permissions.contains(&permission) {
            return Ok(());
        }
        log::warn!("{} lacks permission {:?}", self.name, permission);
        Err(ApiError::Forbidden(permission))
    }
}

impl FromRequestParts<AppState> for ApiCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .ok_or(ApiError::Unauthorized("missing Authorization header"))?;

        let key = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized("expected a Bearer API key"))?;

        let api_key = state
            .config
            .find_api_key(key)
            .ok_or(ApiError::Unauthorized("unknown API key"))?;

        Ok(ApiCaller {
            name: api_key.name.clone(),
            permissions: api_key.permissions.clone(),
        })
    }
}
