use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::models::like::*;
use crate::services::LikeService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/like",
    tag = "Likes",
    operation_id = "toggleLike",
    summary = "Toggle a like",
    description = "Likes the idea if the caller has not liked it yet, otherwise removes the like. Returns the resulting state.",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "New like state", body = LikeStatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id()))]
pub async fn toggle_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LikeStatusResponse>, AppError> {
    let liked = LikeService::new(&state.db)
        .toggle(auth_user.identity(), id)
        .await?;

    Ok(Json(LikeStatusResponse { liked }))
}

#[utoipa::path(
    get,
    path = "/{id}/like",
    tag = "Likes",
    operation_id = "getLikeStatus",
    summary = "Check whether the caller liked an idea",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Current like state", body = LikeStatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id()))]
pub async fn get_like_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LikeStatusResponse>, AppError> {
    let liked = LikeService::new(&state.db)
        .status(auth_user.user_id(), id)
        .await?;

    Ok(Json(LikeStatusResponse { liked }))
}

#[utoipa::path(
    delete,
    path = "/{id}/like",
    tag = "Likes",
    operation_id = "removeLike",
    summary = "Remove a like",
    description = "Removes the caller's like. Fails with 404 when the caller has not liked the idea.",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Like removed", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Idea or like not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id()))]
pub async fn remove_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    LikeService::new(&state.db)
        .unlike(auth_user.user_id(), id)
        .await?;

    Ok(Json(MessageResponse::new("Like removed")))
}
