use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's like on an idea. At most one row exists per `(user_id, idea_id)`;
/// the unique index is created by `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idea_like")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub idea_id: i32,
    #[sea_orm(belongs_to, from = "idea_id", to = "id")]
    pub idea: HasOne<super::idea::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
