use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entity::{comment, user};
use crate::error::AppError;
use crate::guard::{find_idea, lock_owned_comment};
use crate::identity::Identity;
use crate::models::comment::{AuthorSummary, CommentListResponse, CommentResponse, Pagination};
use crate::models::shared::PageRequest;
use crate::services::user::upsert_profile;

pub struct CommentService<'a, C> {
    conn: &'a C,
}

impl<'a, C> CommentService<'a, C>
where
    C: ConnectionTrait + TransactionTrait<Transaction = DatabaseTransaction>,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Comments on an idea, newest first.
    pub async fn list(
        &self,
        idea_id: i32,
        page: PageRequest,
    ) -> Result<CommentListResponse, AppError> {
        find_idea(self.conn, idea_id).await?;

        let select = comment::Entity::find().filter(comment::Column::IdeaId.eq(idea_id));
        let total = select.clone().count(self.conn).await?;

        let rows = select
            .find_also_related(user::Entity)
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .offset(Some(page.offset()))
            .limit(Some(page.limit))
            .all(self.conn)
            .await?;

        let items = rows
            .into_iter()
            .map(|(c, author)| {
                let author = AuthorSummary::from_user(c.author_id, author);
                CommentResponse::new(c, author)
            })
            .collect();

        Ok(CommentListResponse {
            items,
            pagination: Pagination::new(total, page),
        })
    }

    /// `content` must already be trimmed and validated.
    pub async fn create(
        &self,
        caller: &Identity,
        idea_id: i32,
        content: String,
    ) -> Result<CommentResponse, AppError> {
        let txn = self.conn.begin().await?;
        find_idea(&txn, idea_id).await?;
        upsert_profile(&txn, caller).await?;

        let model = comment::ActiveModel {
            content: Set(content),
            author_id: Set(caller.id),
            idea_id: Set(idea_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(CommentResponse::new(model, AuthorSummary::from(caller)))
    }

    /// Only the comment's author may delete it.
    pub async fn delete(
        &self,
        caller: &Identity,
        idea_id: i32,
        comment_id: i32,
    ) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        lock_owned_comment(&txn, caller, idea_id, comment_id).await?;
        comment::Entity::delete_by_id(comment_id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}
