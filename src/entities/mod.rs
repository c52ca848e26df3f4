//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod game;
pub mod user;

pub use game::{
    ActiveModel as GameActiveModel, Column as GameColumn, Entity as Game, Model as GameModel,
};
pub use user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
