use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local snapshot of an identity-provider account. Only the id and the account
/// creation time are consulted by the eligibility gate.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::creator_profiles::Entity")]
    CreatorProfile,
    #[sea_orm(has_many = "super::creator_requests::Entity")]
    CreatorRequests,
}

impl Related<super::creator_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorProfile.def()
    }
}

impl Related<super::creator_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
