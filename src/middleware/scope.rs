use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::guard::CurrentUser;
use crate::access::RecordScope;
use crate::app::AppState;
use crate::error::ApiError;

/// Scope of the user admitted by the route guard. The organization is read
/// from their profile on every request so reassignment applies immediately.
#[async_trait]
impl FromRequestParts<AppState> for RecordScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let organization_id = state.profiles.get(user.user_id).await?.and_then(|p| p.organization_id);
        Ok(RecordScope::new(user.user_id, organization_id))
    }
}
