use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{comment, idea, like};

/// Ensure required database indexes exist.
///
/// Schema sync doesn't create composite indexes, so they are created here on
/// startup. `idx_like_user_idea` is the store-level guarantee that a user likes
/// an idea at most once; the like toggle relies on it.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for (name, stmt) in index_statements() {
        db.execute_raw(backend.build(&stmt)).await?;
        info!("Ensured index {} exists", name);
    }

    Ok(())
}

fn index_statements() -> Vec<(&'static str, IndexCreateStatement)> {
    vec![
        (
            "idx_like_user_idea",
            Index::create()
                .if_not_exists()
                .unique()
                .name("idx_like_user_idea")
                .table(like::Entity)
                .col(like::Column::UserId)
                .col(like::Column::IdeaId)
                .to_owned(),
        ),
        (
            // SELECT ... FROM comment WHERE idea_id = ? ORDER BY created_at DESC
            "idx_comment_idea_created",
            Index::create()
                .if_not_exists()
                .name("idx_comment_idea_created")
                .table(comment::Entity)
                .col(comment::Column::IdeaId)
                .col(comment::Column::CreatedAt)
                .to_owned(),
        ),
        (
            // Monthly statistics: WHERE author_id = ? AND created_at >= ? AND created_at < ?
            "idx_idea_author_created",
            Index::create()
                .if_not_exists()
                .name("idx_idea_author_created")
                .table(idea::Entity)
                .col(idea::Column::AuthorId)
                .col(idea::Column::CreatedAt)
                .to_owned(),
        ),
    ]
}
