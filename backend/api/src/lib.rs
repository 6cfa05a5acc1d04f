/// VidTube API
///
/// Backend for a video-sharing platform: user accounts, video publishing,
/// comments, likes, subscriptions, tweets, and channel dashboards.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers grouped per resource
/// - `models`: entity structs and request/response types
/// - `db`: repository functions over PostgreSQL
/// - `middleware`: JWT authentication middleware
/// - `security`: password hashing and token issuance
/// - `response`: the uniform API response envelope
/// - `error`: error types mapped to the error envelope
/// - `config`: environment-driven configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod security;
pub mod state;
pub mod validators;

pub use config::Settings;
pub use error::{AppError, Result};
pub use state::AppState;
