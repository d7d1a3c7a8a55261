use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::identity::Identity;
use crate::models::stats::UserStatsResponse;
use crate::services::StatsService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Users",
    operation_id = "getUserStats",
    summary = "Activity statistics for the caller",
    description = "Counts the caller's ideas and the likes and comments received on them, overall and for the current calendar month (UTC). Also returns up to five of this month's ideas ranked by engagement.",
    responses(
        (status = 200, description = "Caller statistics", body = UserStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn user_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserStatsResponse>, AppError> {
    let stats = StatsService::new(&state.db)
        .user_stats(auth_user.identity(), Utc::now())
        .await?;

    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    operation_id = "getCurrentUser",
    summary = "Get the current user",
    responses(
        (status = 200, description = "Resolved identity", body = Identity),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id()))]
pub async fn me(auth_user: AuthUser) -> Json<Identity> {
    Json(auth_user.0)
}
