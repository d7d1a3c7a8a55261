use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr};

use crate::entity::like;
use crate::error::AppError;
use crate::guard::find_idea;
use crate::identity::Identity;
use crate::services::user::upsert_profile;

/// Like state is the presence of a `(user_id, idea_id)` row. Every mutation here is a
/// single conditional statement, so concurrent calls never produce a duplicate row.
pub struct LikeService<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LikeService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Flip the caller's like on an idea and return the new state.
    ///
    /// Removal is tried first; if there was nothing to remove the like is inserted.
    /// An insert that loses a race against a concurrent toggle finds the row already
    /// present, which is reported as liked.
    pub async fn toggle(&self, caller: &Identity, idea_id: i32) -> Result<bool, AppError> {
        find_idea(self.conn, idea_id).await?;

        if self.remove(caller.id, idea_id).await? {
            return Ok(false);
        }

        self.add(caller, idea_id).await?;
        Ok(true)
    }

    /// Insert the caller's like unless it already exists. An idea that is gone by
    /// the time the row is written fails with `NotFound`.
    pub async fn add(&self, caller: &Identity, idea_id: i32) -> Result<(), AppError> {
        upsert_profile(self.conn, caller).await?;

        let model = like::ActiveModel {
            user_id: Set(caller.id),
            idea_id: Set(idea_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = like::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::UserId, like::Column::IdeaId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(0) | Err(DbErr::RecordNotInserted) => {
                tracing::debug!(idea_id, user_id = caller.id, "Like already present");
            }
            Ok(_) => {}
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    tracing::debug!(idea_id, user_id = caller.id, "Like race caught on insert");
                }
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    return Err(AppError::NotFound("Idea not found".into()));
                }
                _ => return Err(e.into()),
            },
        }

        Ok(())
    }

    pub async fn status(&self, user_id: i32, idea_id: i32) -> Result<bool, AppError> {
        find_idea(self.conn, idea_id).await?;

        let existing = like::Entity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::IdeaId.eq(idea_id))
            .one(self.conn)
            .await?;

        Ok(existing.is_some())
    }

    /// Explicit unlike. Fails with `NotFound` when there is no like to remove.
    pub async fn unlike(&self, user_id: i32, idea_id: i32) -> Result<(), AppError> {
        if self.remove(user_id, idea_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Like not found".into()))
        }
    }

    async fn remove(&self, user_id: i32, idea_id: i32) -> Result<bool, DbErr> {
        let res = like::Entity::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::IdeaId.eq(idea_id))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
