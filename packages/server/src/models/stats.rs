use serde::Serialize;
use utoipa::ToSchema;

use super::idea::IdeaResponse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatCounter {
    #[schema(example = 12)]
    pub total: u64,
    #[schema(example = 3)]
    pub this_month: u64,
}

/// Counts over the caller's ideas and the engagement those ideas received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserStats {
    pub ideas: StatCounter,
    /// Likes received on the caller's ideas.
    pub likes: StatCounter,
    /// Comments received on the caller's ideas.
    pub comments: StatCounter,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub stats: UserStats,
    /// The caller's ideas from this month, most liked first, then most commented.
    pub trending_ideas: Vec<IdeaResponse>,
}
