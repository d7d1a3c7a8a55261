pub mod comment;
pub mod idea;
pub mod like;
pub mod shared;
pub mod stats;
