//! Authorization guard.
//!
//! Authentication is enforced by the [`AuthUser`](crate::extractors::auth::AuthUser)
//! extractor. The helpers here add the ownership rule for mutations: the target is
//! loaded first, so a missing resource reports 404 even to a non-owner, and only
//! then is its owner compared with the caller.

use sea_orm::sea_query::LockType;
use sea_orm::{ConnectionTrait, DatabaseTransaction, EntityTrait, QuerySelect};

use crate::entity::{comment, idea};
use crate::error::AppError;
use crate::identity::Identity;

/// Fails with `PermissionDenied` unless `caller` is `owner_id`.
pub fn ensure_owner(caller: &Identity, owner_id: i32) -> Result<(), AppError> {
    if caller.id == owner_id {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

pub async fn find_idea<C: ConnectionTrait>(db: &C, id: i32) -> Result<idea::Model, AppError> {
    idea::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Idea not found".into()))
}

/// Load an idea with a row lock held for the rest of `txn` and check the caller owns it.
pub async fn lock_owned_idea(
    txn: &DatabaseTransaction,
    caller: &Identity,
    id: i32,
) -> Result<idea::Model, AppError> {
    let idea = idea::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Idea not found".into()))?;

    ensure_owner(caller, idea.author_id)?;
    Ok(idea)
}

/// Load a comment under `idea_id` with a row lock and check the caller wrote it.
/// A comment that exists under a different idea is reported as not found.
pub async fn lock_owned_comment(
    txn: &DatabaseTransaction,
    caller: &Identity,
    idea_id: i32,
    comment_id: i32,
) -> Result<comment::Model, AppError> {
    let comment = comment::Entity::find_by_id(comment_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .filter(|c| c.idea_id == idea_id)
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    ensure_owner(caller, comment.author_id)?;
    Ok(comment)
}
