//! Database access. Plain-function repositories over a shared [`sqlx::PgPool`];
//! queries bind every user-supplied value, and dynamic SQL fragments come only
//! from compile-time whitelists.

pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;
pub mod watch_history;
