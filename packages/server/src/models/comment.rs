use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

pub use super::shared::{AuthorSummary, MessageResponse, Pagination};
use super::shared::require_text;

pub const MAX_COMMENT_LENGTH: usize = 2_000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    #[serde(default)]
    #[schema(example = "Would love to help with the scheduler part.")]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub author_id: i32,
    pub idea_id: i32,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(m: crate::entity::comment::Model, author: AuthorSummary) -> Self {
        Self {
            id: m.id,
            content: m.content,
            author_id: m.author_id,
            idea_id: m.idea_id,
            author,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub items: Vec<CommentResponse>,
    pub pagination: Pagination,
}

/// Returns the trimmed comment text.
pub fn validate_comment(req: &CreateCommentRequest) -> Result<String, AppError> {
    require_text("Comment content", &req.content, MAX_COMMENT_LENGTH)
}
