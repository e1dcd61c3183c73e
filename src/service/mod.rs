//! Services: existence rules, error translation and paginated envelopes on top of the repositories.

mod classes;
mod entries;
mod spells;

pub use classes::ClassService;
pub use entries::EntryService;
pub use spells::SpellService;

use crate::error::AppError;
use std::sync::Arc;

/// Sink for repository failures. Services built without one stay silent.
pub trait Logger: Send + Sync {
    fn error(&self, event: &str, id: Option<&str>, error: &sqlx::Error);
}

/// Forwards to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, event: &str, id: Option<&str>, error: &sqlx::Error) {
        match id {
            Some(id) => tracing::error!(id = %id, error = %error, "{}", event),
            None => tracing::error!(error = %error, "{}", event),
        }
    }
}

pub type SharedLogger = Option<Arc<dyn Logger>>;

/// Log `error` through the sink, if any, and hide it behind [`AppError::Internal`].
fn internal(logger: &SharedLogger, event: &str, id: Option<&str>, error: sqlx::Error) -> AppError {
    if let Some(l) = logger {
        l.error(event, id, &error);
    }
    AppError::Internal(error)
}
