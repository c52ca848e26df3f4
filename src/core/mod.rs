//! Core logic - framework-agnostic catalog sync, queries and account links.

/// Game catalog queries
pub mod game;
/// Steam app list fetching and import
pub mod steam;
/// Discord to Steam account links
pub mod user;
