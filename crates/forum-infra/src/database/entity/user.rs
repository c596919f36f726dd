//! User entity for SeaORM - the local author projection of user accounts.

use sea_orm::entity::prelude::*;

use forum_core::domain::{Author, UserId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the author projection.
impl From<Model> for Author {
    fn from(model: Model) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
        }
    }
}
