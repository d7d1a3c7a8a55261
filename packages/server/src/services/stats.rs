use std::cmp::Ordering;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sea_orm::sea_query::{Query as SeaQuery, SelectStatement};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::{comment, idea, like, user};
use crate::error::AppError;
use crate::identity::Identity;
use crate::models::idea::IdeaResponse;
use crate::models::stats::{StatCounter, UserStats, UserStatsResponse};
use crate::services::idea::annotate;

/// How many of the caller's ideas the trending list holds.
pub const TRENDING_LIMIT: usize = 5;

/// A calendar month in UTC as the half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The month containing `now`. The end bound is midnight on the first of the
/// next month, so the whole last day is covered.
pub fn month_window(now: DateTime<Utc>) -> Option<MonthWindow> {
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    Some(MonthWindow {
        start: Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()?,
        end: Utc
            .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
            .single()?,
    })
}

/// Most liked first, then most commented, then newest.
fn trending_order(a: &IdeaResponse, b: &IdeaResponse) -> Ordering {
    b.count
        .likes
        .cmp(&a.count.likes)
        .then(b.count.comments.cmp(&a.count.comments))
        .then(b.created_at.cmp(&a.created_at))
}

pub struct StatsService<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> StatsService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Dashboard numbers for `caller`, with "this month" taken from `now`.
    pub async fn user_stats(
        &self,
        caller: &Identity,
        now: DateTime<Utc>,
    ) -> Result<UserStatsResponse, AppError> {
        let window = month_window(now)
            .ok_or_else(|| AppError::Internal(format!("No month window for {now}")))?;

        let ideas = idea::Entity::find().filter(idea::Column::AuthorId.eq(caller.id));
        let ideas = StatCounter {
            total: ideas.clone().count(self.conn).await?,
            this_month: ideas
                .clone()
                .filter(idea::Column::CreatedAt.gte(window.start))
                .filter(idea::Column::CreatedAt.lt(window.end))
                .count(self.conn)
                .await?,
        };

        let likes = like::Entity::find()
            .filter(like::Column::IdeaId.in_subquery(own_idea_ids(caller.id)));
        let likes = StatCounter {
            total: likes.clone().count(self.conn).await?,
            this_month: likes
                .filter(like::Column::CreatedAt.gte(window.start))
                .filter(like::Column::CreatedAt.lt(window.end))
                .count(self.conn)
                .await?,
        };

        let comments = comment::Entity::find()
            .filter(comment::Column::IdeaId.in_subquery(own_idea_ids(caller.id)));
        let comments = StatCounter {
            total: comments.clone().count(self.conn).await?,
            this_month: comments
                .filter(comment::Column::CreatedAt.gte(window.start))
                .filter(comment::Column::CreatedAt.lt(window.end))
                .count(self.conn)
                .await?,
        };

        let trending_ideas = self.trending(caller.id, window).await?;

        Ok(UserStatsResponse {
            stats: UserStats {
                ideas,
                likes,
                comments,
            },
            trending_ideas,
        })
    }

    /// The caller's ideas created inside `window`, ranked by engagement.
    async fn trending(
        &self,
        author_id: i32,
        window: MonthWindow,
    ) -> Result<Vec<IdeaResponse>, AppError> {
        let rows = idea::Entity::find()
            .filter(idea::Column::AuthorId.eq(author_id))
            .filter(idea::Column::CreatedAt.gte(window.start))
            .filter(idea::Column::CreatedAt.lt(window.end))
            .find_also_related(user::Entity)
            .all(self.conn)
            .await?;

        let mut items = annotate(self.conn, rows, Some(author_id)).await?;
        items.sort_by(trending_order);
        items.truncate(TRENDING_LIMIT);
        Ok(items)
    }
}

/// `SELECT id FROM idea WHERE author_id = ?`
fn own_idea_ids(author_id: i32) -> SelectStatement {
    SeaQuery::select()
        .column(idea::Column::Id)
        .from(idea::Entity)
        .and_where(idea::Column::AuthorId.eq(author_id))
        .to_owned()
}
