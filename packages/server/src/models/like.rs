use serde::Serialize;
use utoipa::ToSchema;

pub use super::shared::MessageResponse;

/// The caller's like state for an idea after the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LikeStatusResponse {
    #[schema(example = true)]
    pub liked: bool,
}
