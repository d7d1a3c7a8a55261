pub mod comment;
pub mod idea;
pub mod like;
pub mod user;
