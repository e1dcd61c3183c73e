//! Classes and the subclasses nested under them.

use super::{internal, SharedLogger};
use crate::config::{CLASSES, SUBCLASSES};
use crate::error::AppError;
use crate::filter::ListFilter;
use crate::models::{Classe, SottoClasse};
use crate::response::Paginated;
use crate::store::ClassRepository;
use std::sync::Arc;

pub struct ClassService {
    repo: Arc<dyn ClassRepository>,
    logger: SharedLogger,
}

impl ClassService {
    pub fn new(repo: Arc<dyn ClassRepository>, logger: SharedLogger) -> Self {
        ClassService { repo, logger }
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Paginated<Classe>, AppError> {
        let (items, total) = self
            .repo
            .list(filter)
            .await
            .map_err(|e| internal(&self.logger, "failed to list classi", None, e))?;
        Ok(Paginated::new(
            CLASSES.list_key,
            filter.limit,
            filter.offset,
            total,
            items,
        ))
    }

    pub async fn get(&self, id: &str) -> Result<Classe, AppError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| internal(&self.logger, "failed to get classe", Some(id), e))?
            .ok_or_else(|| AppError::not_found(CLASSES.kind, id))
    }

    /// Fails with the class's not-found before any subclass query runs.
    pub async fn list_subclasses(
        &self,
        class_id: &str,
        filter: &ListFilter,
    ) -> Result<Paginated<SottoClasse>, AppError> {
        self.ensure_class(class_id).await?;
        let (items, total) = self
            .repo
            .list_subclasses(class_id, filter)
            .await
            .map_err(|e| internal(&self.logger, "failed to list sottoclassi", Some(class_id), e))?;
        Ok(Paginated::new(
            SUBCLASSES.list_key,
            filter.limit,
            filter.offset,
            total,
            items,
        ))
    }

    pub async fn get_subclass(&self, class_id: &str, id: &str) -> Result<SottoClasse, AppError> {
        self.ensure_class(class_id).await?;
        self.repo
            .get_subclass(class_id, id)
            .await
            .map_err(|e| internal(&self.logger, "failed to get sottoclasse", Some(id), e))?
            .ok_or_else(|| AppError::not_found(SUBCLASSES.kind, id))
    }

    async fn ensure_class(&self, id: &str) -> Result<(), AppError> {
        self.get(id).await.map(|_| ())
    }
}
