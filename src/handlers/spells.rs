use crate::error::AppError;
use crate::extractors::{Filter, ResourceId};
use crate::filter::SpellFilter;
use crate::models::Incantesimo;
use crate::response::Paginated;
use crate::service::SpellService;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn list_spells(
    State(service): State<Arc<SpellService>>,
    Filter(filter): Filter<SpellFilter>,
) -> Result<Json<Paginated<Incantesimo>>, AppError> {
    Ok(Json(service.list(&filter).await?))
}

pub async fn get_spell(
    State(service): State<Arc<SpellService>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Incantesimo>, AppError> {
    Ok(Json(service.get(&id).await?))
}
