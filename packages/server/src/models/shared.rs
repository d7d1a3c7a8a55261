use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;
use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    /// Total number of items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages, `ceil(total / limit)`.
    #[schema(example = 5)]
    pub pages: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub limit: u64,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            pages: total.div_ceil(request.limit),
            page: request.page,
            limit: request.limit,
        }
    }
}

/// Raw `?page&limit` query. Values are kept as strings so that garbage input
/// falls back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, 1-based. Defaults to 1.
    #[param(value_type = Option<u64>, example = 1)]
    pub page: Option<String>,
    /// Items per page. Defaults to 10.
    #[param(value_type = Option<u64>, example = 10)]
    pub limit: Option<String>,
}

const MAX_OFFSET: u64 = i64::MAX as u64;

/// A resolved page request: `page >= 1`, `1 <= limit <= max_limit`, and the
/// offset fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageQuery {
    pub fn resolve(&self, config: &PaginationConfig) -> PageRequest {
        let page = parse_number(self.page.as_deref()).unwrap_or(1).max(1);
        let limit = parse_number(self.limit.as_deref())
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        // Store drivers bind OFFSET as a signed 64-bit integer.
        let page = page.min(MAX_OFFSET / limit + 1);
        PageRequest { page, limit }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_number(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// Author fields joined onto ideas and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorSummary {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "https://avatars.example.com/ada.png")]
    pub image: Option<String>,
}

impl AuthorSummary {
    /// Build from a joined user row, falling back to a bare id when the profile
    /// has not been mirrored.
    pub fn from_user(author_id: i32, user: Option<crate::entity::user::Model>) -> Self {
        match user {
            Some(u) => Self {
                id: u.id,
                name: u.name,
                image: u.image,
            },
            None => Self {
                id: author_id,
                name: None,
                image: None,
            },
        }
    }
}

impl From<&crate::identity::Identity> for AuthorSummary {
    fn from(identity: &crate::identity::Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            image: identity.image.clone(),
        }
    }
}

/// Plain acknowledgment body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Idea deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trim a required text field and check it is non-empty and at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}
