//! Data-access layer. Each service borrows a connection (pool or transaction) and
//! takes the caller explicitly, so it can be driven without an HTTP request.

pub mod comment;
pub mod idea;
pub mod like;
pub mod stats;
pub mod user;

pub use comment::CommentService;
pub use idea::IdeaService;
pub use like::LikeService;
pub use stats::StatsService;
