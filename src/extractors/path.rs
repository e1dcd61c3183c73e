//! Path ids, validated as slugs before the handler body or any query extractor runs.

use crate::config::{CLASSES, SPELLS, SUBCLASSES};
use crate::error::AppError;
use crate::filter::validation::validate_id;
use crate::service::{ClassService, EntryService, SpellService};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::sync::Arc;

/// Names of the id parameters of a resource's routes, by position in the path.
pub trait IdParams {
    fn id_param(&self, position: usize) -> &'static str;
}

impl IdParams for ClassService {
    fn id_param(&self, position: usize) -> &'static str {
        match position {
            0 => CLASSES.id_param,
            _ => SUBCLASSES.id_param,
        }
    }
}

impl IdParams for SpellService {
    fn id_param(&self, _position: usize) -> &'static str {
        SPELLS.id_param
    }
}

impl IdParams for EntryService {
    fn id_param(&self, _position: usize) -> &'static str {
        self.def().id_param
    }
}

impl<T: IdParams> IdParams for Arc<T> {
    fn id_param(&self, position: usize) -> &'static str {
        (**self).id_param(position)
    }
}

/// Decode each path value in order and check it as a slug id.
async fn validated_ids<S>(parts: &mut Parts, state: &S) -> Result<Vec<String>, AppError>
where
    S: IdParams + Send + Sync,
{
    let Path(params) = Path::<Vec<(String, String)>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;
    params
        .into_iter()
        .enumerate()
        .map(|(i, (_, value))| -> Result<String, AppError> {
            validate_id(state.id_param(i), &value)?;
            Ok(value)
        })
        .collect()
}

/// The single id of `/:id` and `/:id/<children>` routes.
#[derive(Clone, Debug)]
pub struct ResourceId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: IdParams + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mut ids = validated_ids(parts, state).await?.into_iter();
        match ids.next() {
            Some(id) => Ok(ResourceId(id)),
            None => Err(AppError::BadRequest(format!("{} is required", state.id_param(0)))),
        }
    }
}

/// Parent id and child id of `/:id/<children>/:sub_id` routes.
#[derive(Clone, Debug)]
pub struct ChildIds(pub String, pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ChildIds
where
    S: IdParams + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mut ids = validated_ids(parts, state).await?.into_iter();
        let parent = ids
            .next()
            .ok_or_else(|| AppError::BadRequest(format!("{} is required", state.id_param(0))))?;
        let child = ids
            .next()
            .ok_or_else(|| AppError::BadRequest(format!("{} is required", state.id_param(1))))?;
        Ok(ChildIds(parent, child))
    }
}
