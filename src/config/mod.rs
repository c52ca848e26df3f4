/// Database connection and table creation
pub mod database;

/// Application settings loaded from environment variables
pub mod environment;

pub use environment::AppConfig;
