//! Game entity - One application from the Steam catalog.
//!
//! Rows are keyed by the Steam app id, which doubles as the natural dedup key when the
//! catalog is re-imported on every startup.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Game database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    /// Steam app id (e.g. 730 for Counter-Strike 2)
    #[sea_orm(primary_key, auto_increment = false)]
    pub steam_id: i64,
    /// Display name as listed on Steam
    pub name: String,
}

/// `Game` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
