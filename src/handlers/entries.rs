//! Handlers shared by every simple resource. The service carries the resource definition.

use crate::error::AppError;
use crate::extractors::{Filter, ResourceId};
use crate::filter::ListFilter;
use crate::models::Voce;
use crate::response::Paginated;
use crate::service::EntryService;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn list_entries(
    State(service): State<Arc<EntryService>>,
    Filter(filter): Filter<ListFilter>,
) -> Result<Json<Paginated<Voce>>, AppError> {
    Ok(Json(service.list(&filter).await?))
}

pub async fn get_entry(
    State(service): State<Arc<EntryService>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Voce>, AppError> {
    Ok(Json(service.get(&id).await?))
}
