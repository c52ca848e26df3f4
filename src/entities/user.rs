//! User entity - a Discord user's linked Steam account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Discord user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub discord_id: i64,
    /// 64-bit Steam id of the linked account; one Discord user per Steam account
    #[sea_orm(unique)]
    pub steam_id: i64,
}

/// `User` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
