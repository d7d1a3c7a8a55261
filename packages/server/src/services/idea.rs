use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entity::{comment, idea, like, user};
use crate::error::AppError;
use crate::guard::lock_owned_idea;
use crate::identity::Identity;
use crate::models::idea::{
    AuthorSummary, IdeaCounts, IdeaDraft, IdeaListResponse, IdeaPatch, IdeaResponse, LikeRef,
    Pagination, tags_to_json,
};
use crate::models::shared::PageRequest;
use crate::services::user::upsert_profile;

pub struct IdeaService<'a, C> {
    conn: &'a C,
}

impl<'a, C> IdeaService<'a, C>
where
    C: ConnectionTrait + TransactionTrait<Transaction = DatabaseTransaction>,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Persist a new idea owned by `caller`.
    pub async fn create(&self, caller: &Identity, draft: IdeaDraft) -> Result<IdeaResponse, AppError> {
        let txn = self.conn.begin().await?;
        upsert_profile(&txn, caller).await?;

        let now = Utc::now();
        let model = idea::ActiveModel {
            title: Set(draft.title),
            description: Set(draft.description),
            skills: Set(tags_to_json(&draft.skills)),
            industries: Set(tags_to_json(&draft.industries)),
            author_id: Set(caller.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        let mut response = IdeaResponse::new(
            model,
            AuthorSummary::from(caller),
            IdeaCounts::default(),
            false,
        );
        response.likes = Some(Vec::new());
        Ok(response)
    }

    pub async fn get(&self, id: i32, caller: Option<i32>) -> Result<IdeaResponse, AppError> {
        load_detail(self.conn, id, caller).await
    }

    /// Newest first. `caller`, when present, drives the `liked` flag of each item.
    pub async fn list(
        &self,
        page: PageRequest,
        caller: Option<i32>,
    ) -> Result<IdeaListResponse, AppError> {
        let total = idea::Entity::find().count(self.conn).await?;

        let rows = idea::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(idea::Column::CreatedAt)
            .order_by_desc(idea::Column::Id)
            .offset(Some(page.offset()))
            .limit(Some(page.limit))
            .all(self.conn)
            .await?;

        let items = annotate(self.conn, rows, caller).await?;

        Ok(IdeaListResponse {
            items,
            pagination: Pagination::new(total, page),
        })
    }

    /// Apply `patch` to an idea the caller owns. `author_id` is never touched.
    pub async fn update(
        &self,
        caller: &Identity,
        id: i32,
        patch: IdeaPatch,
    ) -> Result<IdeaResponse, AppError> {
        let txn = self.conn.begin().await?;
        let existing = lock_owned_idea(&txn, caller, id).await?;

        if !patch.is_empty() {
            let mut active: idea::ActiveModel = existing.into();
            if let Some(title) = patch.title {
                active.title = Set(title);
            }
            if let Some(description) = patch.description {
                active.description = Set(description);
            }
            if let Some(skills) = patch.skills {
                active.skills = Set(tags_to_json(&skills));
            }
            if let Some(industries) = patch.industries {
                active.industries = Set(tags_to_json(&industries));
            }
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?;
        }

        let detail = load_detail(&txn, id, Some(caller.id)).await?;
        txn.commit().await?;
        Ok(detail)
    }

    /// Delete an idea the caller owns together with its likes and comments.
    pub async fn delete(&self, caller: &Identity, id: i32) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        lock_owned_idea(&txn, caller, id).await?;

        let likes = like::Entity::delete_many()
            .filter(like::Column::IdeaId.eq(id))
            .exec(&txn)
            .await?;
        let comments = comment::Entity::delete_many()
            .filter(comment::Column::IdeaId.eq(id))
            .exec(&txn)
            .await?;
        idea::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::debug!(
            likes = likes.rows_affected,
            comments = comments.rows_affected,
            "Deleted idea with its engagement"
        );
        Ok(())
    }
}

/// Single idea with author, counts and the full list of likers.
async fn load_detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
    caller: Option<i32>,
) -> Result<IdeaResponse, AppError> {
    let (model, author) = idea::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Idea not found".into()))?;

    let likes = like::Entity::find()
        .filter(like::Column::IdeaId.eq(id))
        .order_by_asc(like::Column::CreatedAt)
        .all(db)
        .await?;
    let comments = comment::Entity::find()
        .filter(comment::Column::IdeaId.eq(id))
        .count(db)
        .await?;

    let liked = caller.is_some_and(|uid| likes.iter().any(|l| l.user_id == uid));
    let count = IdeaCounts {
        likes: likes.len() as u64,
        comments,
    };
    let author = AuthorSummary::from_user(model.author_id, author);

    let mut response = IdeaResponse::new(model, author, count, liked);
    response.likes = Some(
        likes
            .into_iter()
            .map(|l| LikeRef { user_id: l.user_id })
            .collect(),
    );
    Ok(response)
}

/// Attach counts and the caller's like state to joined `(idea, author)` rows, keeping order.
pub(crate) async fn annotate<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(idea::Model, Option<user::Model>)>,
    caller: Option<i32>,
) -> Result<Vec<IdeaResponse>, DbErr> {
    let ids: Vec<i32> = rows.iter().map(|(i, _)| i.id).collect();
    let counts = engagement_counts(db, &ids).await?;
    let liked = match caller {
        Some(uid) => liked_ids(db, uid, &ids).await?,
        None => HashSet::new(),
    };

    Ok(rows
        .into_iter()
        .map(|(model, author)| {
            let count = counts.get(&model.id).copied().unwrap_or_default();
            let is_liked = liked.contains(&model.id);
            let author = AuthorSummary::from_user(model.author_id, author);
            IdeaResponse::new(model, author, count, is_liked)
        })
        .collect())
}

/// Like and comment counts per idea, one grouped query each.
pub(crate) async fn engagement_counts<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<HashMap<i32, IdeaCounts>, DbErr> {
    let mut counts: HashMap<i32, IdeaCounts> = HashMap::new();
    if ids.is_empty() {
        return Ok(counts);
    }

    let likes: Vec<(i32, i64)> = like::Entity::find()
        .select_only()
        .column(like::Column::IdeaId)
        .column_as(like::Column::Id.count(), "count")
        .filter(like::Column::IdeaId.is_in(ids.iter().copied()))
        .group_by(like::Column::IdeaId)
        .into_tuple()
        .all(db)
        .await?;
    for (idea_id, n) in likes {
        counts.entry(idea_id).or_default().likes = n as u64;
    }

    let comments: Vec<(i32, i64)> = comment::Entity::find()
        .select_only()
        .column(comment::Column::IdeaId)
        .column_as(comment::Column::Id.count(), "count")
        .filter(comment::Column::IdeaId.is_in(ids.iter().copied()))
        .group_by(comment::Column::IdeaId)
        .into_tuple()
        .all(db)
        .await?;
    for (idea_id, n) in comments {
        counts.entry(idea_id).or_default().comments = n as u64;
    }

    Ok(counts)
}

/// The subset of `ids` that `user_id` has liked.
async fn liked_ids<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    ids: &[i32],
) -> Result<HashSet<i32>, DbErr> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows: Vec<i32> = like::Entity::find()
        .select_only()
        .column(like::Column::IdeaId)
        .filter(like::Column::UserId.eq(user_id))
        .filter(like::Column::IdeaId.is_in(ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}
