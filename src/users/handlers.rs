use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    users::dto::{
        CreateUserRequest, MessageResponse, UpdateUserRequest, UserDetailsResponse,
        UserListResponse,
    },
    users::services::{MSG_CREATED, MSG_DELETED, MSG_LISTED, MSG_UPDATED},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getall", get(list_users))
        .route("/get/:id", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_user))
        .route("/update/:email", put(update_user))
        .route("/delete/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserListResponse>> {
    let list = state.users.list_users().await?;
    Ok(Json(UserListResponse {
        success: true,
        message: MSG_LISTED,
        total_students: list.count,
        data: list.records,
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDetailsResponse>> {
    let user = state.users.get_user_by_id(&id).await?;
    Ok(Json(UserDetailsResponse {
        success: true,
        user_details: user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(req) = payload.map_err(bad_body)?;
    state.users.create_user(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(MSG_CREATED)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload.map_err(bad_body)?;
    state.users.update_user(&email, req).await?;
    Ok(Json(MessageResponse::ok(MSG_UPDATED)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.delete_user(&id).await?;
    Ok(Json(MessageResponse::ok(MSG_DELETED)))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection, "rejected request body");
    ApiError::invalid(rejection.body_text())
}
