use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use database::policy;
use database::services::user::{CreateUser, UserPatch, UserService};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::user::{CreateUserRequest, UpdateUserRequest, UserQueryParams, UserResponse};
use crate::error::ApiError;
use crate::routes::ADMINS;
use crate::state::AppState;

/// Get user accounts, optionally filtered by role
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "User accounts", body = [UserResponse])
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn get_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<UserQueryParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let users = UserService::list(&state.db, params.role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user account by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let user = UserService::get(&state.db, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already registered")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let user = UserService::create(
        &state.db,
        CreateUser {
            name: body.name,
            email: body.email,
            phone: body.phone,
            password: body.password,
            role: body.role,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update a user's name, phone or password; role and email are fixed
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let user = UserService::update(
        &state.db,
        id,
        UserPatch {
            name: body.name,
            phone: body.phone,
            password: body.password,
        },
    )
    .await?;
    Ok(Json(UserResponse::from(user)))
}
