//! Class and subclass handlers.

use crate::error::AppError;
use crate::extractors::{ChildIds, Filter, ResourceId};
use crate::filter::ListFilter;
use crate::models::{Classe, SottoClasse};
use crate::response::Paginated;
use crate::service::ClassService;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn list_classes(
    State(service): State<Arc<ClassService>>,
    Filter(filter): Filter<ListFilter>,
) -> Result<Json<Paginated<Classe>>, AppError> {
    Ok(Json(service.list(&filter).await?))
}

pub async fn get_class(
    State(service): State<Arc<ClassService>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Classe>, AppError> {
    Ok(Json(service.get(&id).await?))
}

pub async fn list_subclasses(
    State(service): State<Arc<ClassService>>,
    ResourceId(class_id): ResourceId,
    Filter(filter): Filter<ListFilter>,
) -> Result<Json<Paginated<SottoClasse>>, AppError> {
    Ok(Json(service.list_subclasses(&class_id, &filter).await?))
}

pub async fn get_subclass(
    State(service): State<Arc<ClassService>>,
    ChildIds(class_id, id): ChildIds,
) -> Result<Json<SottoClasse>, AppError> {
    Ok(Json(service.get_subclass(&class_id, &id).await?))
}
