//! Read-only REST catalog of fifth-edition reference data (classes, subclasses, spells and
//! simple entries) served from PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{HttpSettings, ResourceDef, Settings};
pub use error::{AppError, ConfigError, ErrorBody, StartupError};
pub use filter::{ListFilter, SpellFilter};
pub use migration::apply_migrations;
pub use response::Paginated;
pub use routes::{build_router, catalog_routes, common_routes};
pub use service::{ClassService, EntryService, Logger, SpellService, TracingLogger};
pub use state::AppState;
pub use store::Repositories;
