use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

pub use super::shared::{AuthorSummary, MessageResponse, Pagination};
use super::shared::require_text;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 64;

/// Body of `POST /ideas` and `PUT /ideas/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IdeaRequest {
    #[serde(default)]
    #[schema(example = "Carbon-aware CI scheduler")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Run heavy CI jobs when the grid is greenest.")]
    pub description: String,
    #[serde(default)]
    #[schema(example = json!(["rust", "devops"]))]
    pub skills: Vec<String>,
    #[serde(default)]
    #[schema(example = json!(["climate"]))]
    pub industries: Vec<String>,
}

/// Body of `PATCH /ideas/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Default, PartialEq, ToSchema)]
pub struct PatchIdeaRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
}

/// A validated, normalised idea body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub industries: Vec<String>,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
}

impl IdeaPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<IdeaDraft> for IdeaPatch {
    fn from(d: IdeaDraft) -> Self {
        Self {
            title: Some(d.title),
            description: Some(d.description),
            skills: Some(d.skills),
            industries: Some(d.industries),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct IdeaCounts {
    #[schema(example = 3)]
    pub likes: u64,
    #[schema(example = 1)]
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LikeRef {
    pub user_id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IdeaResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub author_id: i32,
    pub author: AuthorSummary,
    #[serde(rename = "_count")]
    pub count: IdeaCounts,
    /// Whether the caller has liked this idea. Always false for anonymous callers.
    pub liked: bool,
    /// Every like on the idea. Only present on single-idea responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<LikeRef>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaResponse {
    pub fn new(
        m: crate::entity::idea::Model,
        author: AuthorSummary,
        count: IdeaCounts,
        liked: bool,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            skills: tags_from_json(m.skills),
            industries: tags_from_json(m.industries),
            author_id: m.author_id,
            author,
            count,
            liked,
            likes: None,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdeaListResponse {
    pub items: Vec<IdeaResponse>,
    pub pagination: Pagination,
}

pub fn tags_to_json(tags: &[String]) -> serde_json::Value {
    serde_json::Value::from(tags.to_vec())
}

pub fn tags_from_json(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

/// Trim every tag, drop empty ones and enforce count/length limits. Order is kept.
pub fn normalize_tags(field: &str, tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation(format!(
            "At most {MAX_TAGS} {field} are allowed"
        )));
    }
    if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LENGTH) {
        return Err(AppError::Validation(format!(
            "{field} entry '{tag}' exceeds {MAX_TAG_LENGTH} characters"
        )));
    }
    Ok(tags)
}

pub fn validate_idea(req: IdeaRequest) -> Result<IdeaDraft, AppError> {
    Ok(IdeaDraft {
        title: require_text("Title", &req.title, MAX_TITLE_LENGTH)?,
        description: require_text("Description", &req.description, MAX_DESCRIPTION_LENGTH)?,
        skills: normalize_tags("skills", req.skills)?,
        industries: normalize_tags("industries", req.industries)?,
    })
}

pub fn validate_patch(req: PatchIdeaRequest) -> Result<IdeaPatch, AppError> {
    Ok(IdeaPatch {
        title: req
            .title
            .map(|t| require_text("Title", &t, MAX_TITLE_LENGTH))
            .transpose()?,
        description: req
            .description
            .map(|d| require_text("Description", &d, MAX_DESCRIPTION_LENGTH))
            .transpose()?,
        skills: req
            .skills
            .map(|s| normalize_tags("skills", s))
            .transpose()?,
        industries: req
            .industries
            .map(|i| normalize_tags("industries", i))
            .transpose()?,
    })
}
