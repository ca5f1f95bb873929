use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, User},
    response::ApiResponse,
    routes::params::UserQuery,
    services::{
        auth_service::{ensure_unique_identity, hash_password},
        contains_pattern,
    },
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(role) = query.role {
        condition = condition.add(UserCol::Role.eq(role.as_str()));
    }
    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(UserCol::Username).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Email).ilike(pattern.clone()))
                .add(Expr::col(UserCol::FullName).ilike(pattern)),
        );
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_asc(UserCol::Username);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::page("Users", UserList { items }, page, limit, total))
}

pub async fn get_user(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    if user.user_id != id {
        ensure_admin(user)?;
    }
    let found = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("User", User::from(found)))
}

pub async fn create_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    payload.validate()?;

    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    ensure_unique_identity(state, &username, &email).await?;

    let created = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(payload.role.unwrap_or(Role::Employee).as_str().to_string()),
        full_name: Set(payload.full_name),
        phone: Set(payload.phone),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "user_create",
        "users",
        serde_json::json!({ "user_id": created.id, "role": created.role }),
    )
    .await;

    Ok(ApiResponse::ok("User created", User::from(created)))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if id == user.user_id {
        if payload.is_active == Some(false) {
            return Err(AppError::BadRequest("Cannot deactivate yourself".into()));
        }
        if payload.role.is_some_and(|r| r != Role::Admin) {
            return Err(AppError::BadRequest("Cannot demote yourself".into()));
        }
    }

    if let Some(email) = payload.email.as_ref() {
        let email = email.trim().to_lowercase();
        let taken = Users::find()
            .filter(UserCol::Email.eq(email.as_str()))
            .filter(UserCol::Id.ne(id))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Email is already taken".into()));
        }
    }

    let mut active: UserActive = existing.into();
    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_lowercase());
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(full_name) = payload.full_name {
        active.full_name = Set(Some(full_name));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "user_update",
        "users",
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::ok("User updated", User::from(updated)))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if id == user.user_id {
        return Err(AppError::BadRequest("Cannot delete yourself".into()));
    }

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
