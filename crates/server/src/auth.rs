use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use database::entities::users;
use database::error::ServiceError;
use database::policy::Actor;
use sea_orm::EntityTrait;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the validated bearer token into the acting user.
///
/// The token's `sub` claim carries the user id; the role is always read
/// from the users table, so a role change takes effect on the next
/// request rather than the next token refresh. Token issuance itself is
/// the identity provider's problem, not ours.
pub struct CurrentUser(pub Actor);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let sub = parts
            .extensions
            .get::<DefaultClaims>()
            .and_then(|claims| claims.sub.clone())
            .ok_or_else(ApiError::unauthorized)?;
        let user_id = Uuid::parse_str(&sub).map_err(|_| ApiError::unauthorized())?;

        let user = users::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .map_err(|err| ApiError::from(ServiceError::from(err)))?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(CurrentUser(Actor::new(user.id, user.role)))
    }
}
