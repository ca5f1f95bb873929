use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::ApiResponse,
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(user: &User, secret: &str, ttl_hours: i64) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.as_str().to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Fail with 409 when the username or email is already registered.
pub async fn ensure_unique_identity(
    state: &AppState,
    username: &str,
    email: &str,
) -> AppResult<()> {
    let existing = Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Username.eq(username))
                .add(UserCol::Email.eq(email)),
        )
        .one(&state.orm)
        .await?;

    match existing {
        Some(u) if u.username == username => {
            Err(AppError::Conflict("Username is already taken".into()))
        }
        Some(_) => Err(AppError::Conflict("Email is already taken".into())),
        None => Ok(()),
    }
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
        full_name,
        phone,
    } = payload;
    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();

    ensure_unique_identity(state, &username, &email).await?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(hash_password(&password)?),
        role: Set(Role::User.as_str().to_string()),
        full_name: Set(full_name),
        phone: Set(phone),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let LoginRequest { login, password } = payload;
    let login = login.trim();

    let user = Users::find()
        .filter(
            Condition::any()
                .add(UserCol::Username.eq(login))
                .add(UserCol::Email.eq(login.to_lowercase())),
        )
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }
    if !user.is_active {
        return Err(AppError::Forbidden);
    }

    let user = User::from(user);
    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_hours)?;

    audit::record(
        state,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::ok("Logged in", LoginResponse { token, user }))
}

pub async fn current_user(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<User>> {
    let user = Users::find_by_id(auth.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if !user.is_active {
        return Err(AppError::Forbidden);
    }
    Ok(ApiResponse::ok("Current user", User::from(user)))
}
