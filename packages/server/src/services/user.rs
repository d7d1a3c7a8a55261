use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

use crate::entity::user;
use crate::identity::Identity;

/// Mirror the caller's profile into the `user` table.
///
/// Inserts the row on first sight and refreshes `name`/`image` afterwards, so that
/// foreign keys from authored rows resolve and author joins show current data.
pub async fn upsert_profile<C: ConnectionTrait>(db: &C, identity: &Identity) -> Result<(), DbErr> {
    let model = user::ActiveModel {
        id: Set(identity.id),
        name: Set(identity.name.clone()),
        image: Set(identity.image.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Id)
                .update_columns([user::Column::Name, user::Column::Image])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}
