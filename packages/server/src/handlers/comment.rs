use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::comment::*;
use crate::models::shared::PageQuery;
use crate::services::CommentService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "listComments",
    summary = "List comments on an idea",
    description = "Returns the idea's comments newest first, each with its author. Paginated like the idea list.",
    params(("id" = i32, Path, description = "Idea ID"), PageQuery),
    responses(
        (status = 200, description = "Page of comments", body = CommentListResponse),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(idea_id))]
pub async fn list_comments(
    State(state): State<AppState>,
    AppPath(idea_id): AppPath<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    let page = query.resolve(&state.config.pagination);
    let response = CommentService::new(&state.db).list(idea_id, page).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Comment on an idea",
    description = "Adds a comment by the caller. Content is trimmed and must be non-empty.",
    params(("id" = i32, Path, description = "Idea ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(idea_id, user_id = auth_user.user_id()))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(idea_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = validate_comment(&payload)?;

    let comment = CommentService::new(&state.db)
        .create(auth_user.identity(), idea_id, content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    delete,
    path = "/{id}/comments/{comment_id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    description = "Deletes a comment. Only its author may delete it. A comment that belongs to another idea is reported as not found.",
    params(
        ("id" = i32, Path, description = "Idea ID"),
        ("comment_id" = i32, Path, description = "Comment ID"),
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(idea_id, comment_id, user_id = auth_user.user_id()))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((idea_id, comment_id)): AppPath<(i32, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    CommentService::new(&state.db)
        .delete(auth_user.identity(), idea_id, comment_id)
        .await?;

    Ok(Json(MessageResponse::new("Comment deleted")))
}
