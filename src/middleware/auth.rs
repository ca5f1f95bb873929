use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::users::Entity as Users,
    error::AppError,
    models::Role,
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Reject callers whose role ranks below `min`.
pub fn ensure_role(user: &AuthUser, min: Role) -> Result<(), AppError> {
    if !user.role.at_least(min) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Employee)
}

pub fn ensure_manager(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Manager)
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
    let role = decoded
        .claims
        .role
        .parse::<Role>()
        .map_err(|_| AppError::Unauthorized("Invalid role in token".into()))?;

    Ok(AuthUser {
        user_id,
        username: decoded.claims.username,
        role,
    })
}

/// Resolve a bearer token against the stored account.
///
/// Role and activity come from the `users` row, so deactivation, demotion and
/// deletion apply to tokens issued earlier.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let claims = decode_token(token, &state.config.jwt_secret)?;
    let user = Users::find_by_id(claims.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    if !user.is_active {
        return Err(AppError::Unauthorized("Account is disabled".into()));
    }
    let role = user
        .role
        .parse::<Role>()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        authenticate(state, token).await
    }
}
