use crate::mailer::Mailer;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared handler state: the one database connection pool created at
/// startup, plus the optional reminder mailer.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Option<Arc<Mailer>>,
}
