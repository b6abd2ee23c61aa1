//! User-specific endpoints, merged with the generic CRUD routes under
//! `/api/users`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Json, Router,
};
use service_core::crud::{crud_router, path_id, ApiResponse, BaseCrudResource, Mapper};
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{EmailSearchQuery, NameSearchQuery, UserDto};
use crate::mapper::UserMapper;
use crate::models::User;
use crate::startup::AppState;

pub type UserResource = BaseCrudResource<User, UserDto, Uuid>;

type UserListResponse = Result<Json<ApiResponse<Vec<UserDto>>>, AppError>;
type UserResponse = Result<Json<ApiResponse<UserDto>>, AppError>;
type MessageResponse = Result<Json<ApiResponse<()>>, AppError>;
type CountResponse = Result<Json<ApiResponse<u64>>, AppError>;

pub fn router(resource: Arc<UserResource>) -> Router<AppState> {
    Router::new()
        .route("/active", get(list_active))
        .route("/inactive", get(list_inactive))
        .route("/recent", get(list_recent))
        .route("/email/:email", get(get_by_email))
        .route("/google/:google_id", get(get_by_google_id))
        .route("/search", get(search_by_name))
        .route("/search/email", get(search_by_email))
        .route("/:id/activate", put(activate))
        .route("/:id/deactivate", put(deactivate))
        .route("/stats/active", get(count_active))
        .route("/stats/inactive", get(count_inactive))
        .merge(crud_router(resource))
}

fn list(users: &[User]) -> Json<ApiResponse<Vec<UserDto>>> {
    Json(ApiResponse::success(
        UserMapper.to_dto_list(Some(users)).unwrap_or_default(),
    ))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!("{}", rejection.body_text())))
}

pub async fn list_active(State(state): State<AppState>) -> UserListResponse {
    Ok(list(&state.users.find_active().await?))
}

pub async fn list_inactive(State(state): State<AppState>) -> UserListResponse {
    Ok(list(&state.users.find_inactive().await?))
}

pub async fn list_recent(State(state): State<AppState>) -> UserListResponse {
    Ok(list(&state.users.find_recent_active().await?))
}

pub async fn get_by_email(State(state): State<AppState>, Path(email): Path<String>) -> UserResponse {
    let user = state.users.find_by_email(&email).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("User not found with email: {}", email))
    })?;
    Ok(Json(ApiResponse::success(UserMapper.to_dto(&user))))
}

pub async fn get_by_google_id(
    State(state): State<AppState>,
    Path(google_id): Path<String>,
) -> UserResponse {
    let user = state
        .users
        .find_by_google_id(&google_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("User not found with Google ID: {}", google_id))
        })?;
    Ok(Json(ApiResponse::success(UserMapper.to_dto(&user))))
}

pub async fn search_by_name(
    State(state): State<AppState>,
    params: Result<Query<NameSearchQuery>, QueryRejection>,
) -> UserListResponse {
    let params = query(params)?;
    Ok(list(
        &state.users.search_by_name(&params.name, params.active).await?,
    ))
}

pub async fn search_by_email(
    State(state): State<AppState>,
    params: Result<Query<EmailSearchQuery>, QueryRejection>,
) -> UserListResponse {
    let params = query(params)?;
    Ok(list(&state.users.search_by_email(&params.email).await?))
}

pub async fn activate(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> MessageResponse {
    let id = path_id(id)?;
    state.users.activate(&id).await?;
    Ok(Json(ApiResponse::success_message("User activated successfully")))
}

pub async fn deactivate(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> MessageResponse {
    let id = path_id(id)?;
    state.users.deactivate(&id).await?;
    Ok(Json(ApiResponse::success_message("User deactivated successfully")))
}

pub async fn count_active(State(state): State<AppState>) -> CountResponse {
    let count = state.users.count_active().await?;
    Ok(Json(ApiResponse::success_with_message("Total active users", count)))
}

pub async fn count_inactive(State(state): State<AppState>) -> CountResponse {
    let count = state.users.count_inactive().await?;
    Ok(Json(ApiResponse::success_with_message(
        "Total inactive users",
        count,
    )))
}
