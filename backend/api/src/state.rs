/// Shared application state handed to handlers via `web::Data`
use media_store::MediaStore;
use sqlx::PgPool;

use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub media: MediaStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db: PgPool, media: MediaStore, settings: Settings) -> Self {
        Self {
            db,
            media,
            settings,
        }
    }
}
