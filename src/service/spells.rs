use super::{internal, SharedLogger};
use crate::config::SPELLS;
use crate::error::AppError;
use crate::filter::SpellFilter;
use crate::models::Incantesimo;
use crate::response::Paginated;
use crate::store::SpellRepository;
use std::sync::Arc;

pub struct SpellService {
    repo: Arc<dyn SpellRepository>,
    logger: SharedLogger,
}

impl SpellService {
    pub fn new(repo: Arc<dyn SpellRepository>, logger: SharedLogger) -> Self {
        SpellService { repo, logger }
    }

    pub async fn list(&self, filter: &SpellFilter) -> Result<Paginated<Incantesimo>, AppError> {
        let (items, total) = self
            .repo
            .list(filter)
            .await
            .map_err(|e| internal(&self.logger, "failed to list incantesimi", None, e))?;
        Ok(Paginated::new(
            SPELLS.list_key,
            filter.base.limit,
            filter.base.offset,
            total,
            items,
        ))
    }

    pub async fn get(&self, id: &str) -> Result<Incantesimo, AppError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| internal(&self.logger, "failed to get incantesimo", Some(id), e))?
            .ok_or_else(|| AppError::not_found(SPELLS.kind, id))
    }
}
