use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local mirror of a user profile owned by the identity provider.
///
/// Rows are keyed by the provider's user id and upserted from session claims
/// the first time a user writes something.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub name: Option<String>,
    pub image: Option<String>,

    #[sea_orm(has_many)]
    pub ideas: HasMany<super::idea::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::like::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
