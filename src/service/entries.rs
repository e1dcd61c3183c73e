//! One service per simple resource, labelled by its catalog definition.

use super::{internal, SharedLogger};
use crate::config::ResourceDef;
use crate::error::AppError;
use crate::filter::ListFilter;
use crate::models::Voce;
use crate::response::Paginated;
use crate::store::EntryRepository;
use std::sync::Arc;

pub struct EntryService {
    def: &'static ResourceDef,
    repo: Arc<dyn EntryRepository>,
    logger: SharedLogger,
}

impl EntryService {
    pub fn new(
        def: &'static ResourceDef,
        repo: Arc<dyn EntryRepository>,
        logger: SharedLogger,
    ) -> Self {
        EntryService { def, repo, logger }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Paginated<Voce>, AppError> {
        let (items, total) = self.repo.list(filter).await.map_err(|e| {
            internal(
                &self.logger,
                &format!("failed to list {}", self.def.path),
                None,
                e,
            )
        })?;
        Ok(Paginated::new(
            self.def.list_key,
            filter.limit,
            filter.offset,
            total,
            items,
        ))
    }

    pub async fn get(&self, id: &str) -> Result<Voce, AppError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| {
                internal(
                    &self.logger,
                    &format!("failed to get {}", self.def.kind),
                    Some(id),
                    e,
                )
            })?
            .ok_or_else(|| AppError::not_found(self.def.kind, id))
    }
}
