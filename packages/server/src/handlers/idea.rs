use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::idea::*;
use crate::models::shared::PageQuery;
use crate::services::IdeaService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Ideas",
    operation_id = "listIdeas",
    summary = "List ideas with pagination",
    description = "Returns ideas newest first with author, like and comment counts. Authentication is optional; when a valid session is present each idea's `liked` flag reflects the caller. Non-numeric `page`/`limit` fall back to 1 and 10.",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of ideas", body = IdeaListResponse),
    ),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_ideas(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<IdeaListResponse>, AppError> {
    let page = query.resolve(&state.config.pagination);
    let caller = auth_user.as_ref().map(AuthUser::user_id);

    let response = IdeaService::new(&state.db).list(page, caller).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Ideas",
    operation_id = "createIdea",
    summary = "Create a new idea",
    description = "Creates an idea owned by the caller. Title and description are trimmed and must be non-empty.",
    request_body = IdeaRequest,
    responses(
        (status = 201, description = "Idea created", body = IdeaResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id()))]
pub async fn create_idea(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<IdeaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = validate_idea(payload)?;

    let idea = IdeaService::new(&state.db)
        .create(auth_user.identity(), draft)
        .await?;

    Ok((StatusCode::CREATED, Json(idea)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Ideas",
    operation_id = "getIdea",
    summary = "Get an idea by ID",
    description = "Returns the idea with its author, counts and the ids of every user who liked it. Authentication is optional.",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Idea details", body = IdeaResponse),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_idea(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<IdeaResponse>, AppError> {
    let caller = auth_user.as_ref().map(AuthUser::user_id);
    let idea = IdeaService::new(&state.db).get(id, caller).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Ideas",
    operation_id = "replaceIdea",
    summary = "Replace an idea",
    description = "Replaces title, description, skills and industries. Only the author may update an idea. A missing idea reports 404 before ownership is checked.",
    params(("id" = i32, Path, description = "Idea ID")),
    request_body = IdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = IdeaResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id()))]
pub async fn replace_idea(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<IdeaRequest>,
) -> Result<Json<IdeaResponse>, AppError> {
    let draft = validate_idea(payload)?;

    let idea = IdeaService::new(&state.db)
        .update(auth_user.identity(), id, draft.into())
        .await?;

    Ok(Json(idea))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Ideas",
    operation_id = "updateIdea",
    summary = "Partially update an idea",
    description = "Updates only the provided fields, each validated like on create. Only the author may update an idea. An empty payload returns the idea unchanged.",
    params(("id" = i32, Path, description = "Idea ID")),
    request_body = PatchIdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = IdeaResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id()))]
pub async fn update_idea(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<PatchIdeaRequest>,
) -> Result<Json<IdeaResponse>, AppError> {
    let patch = validate_patch(payload)?;

    let idea = IdeaService::new(&state.db)
        .update(auth_user.identity(), id, patch)
        .await?;

    Ok(Json(idea))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Ideas",
    operation_id = "deleteIdea",
    summary = "Delete an idea",
    description = "Deletes the idea together with all of its comments and likes. Only the author may delete an idea.",
    params(("id" = i32, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Idea deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Idea not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id()))]
pub async fn delete_idea(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    IdeaService::new(&state.db)
        .delete(auth_user.identity(), id)
        .await?;

    Ok(Json(MessageResponse::new("Idea deleted")))
}
