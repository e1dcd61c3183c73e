//! Shared application state: one service per resource, plus what the health routes need.

use crate::service::{ClassService, EntryService, SharedLogger, SpellService};
use crate::store::{Pinger, Repositories};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub classes: Arc<ClassService>,
    pub spells: Arc<SpellService>,
    /// Simple resources in catalog order.
    pub entries: Vec<Arc<EntryService>>,
    pub pinger: Arc<dyn Pinger>,
    pub version: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        pinger: Arc<dyn Pinger>,
        version: impl Into<String>,
        logger: SharedLogger,
    ) -> Self {
        let entries = repos
            .entries
            .into_iter()
            .map(|(def, repo)| Arc::new(EntryService::new(def, repo, logger.clone())))
            .collect();
        AppState {
            classes: Arc::new(ClassService::new(repos.classes, logger.clone())),
            spells: Arc::new(SpellService::new(repos.spells, logger)),
            entries,
            pinger,
            version: version.into(),
            started_at: Instant::now(),
        }
    }
}
