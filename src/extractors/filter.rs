//! Extract a validated list filter from the query string.

use crate::error::{AppError, FilterError};
use crate::filter::{ListFilter, SpellFilter};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// A filter type that can be parsed from ordered query pairs.
pub trait FromQueryPairs: Sized {
    fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError>;
}

impl FromQueryPairs for ListFilter {
    fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        ListFilter::from_pairs(pairs)
    }
}

impl FromQueryPairs for SpellFilter {
    fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        SpellFilter::from_pairs(pairs)
    }
}

/// Pairs are decoded in order so repeated keys (`componenti=V&componenti=S`) survive.
#[derive(Clone, Debug)]
pub struct Filter<F>(pub F);

#[async_trait]
impl<S, F> FromRequestParts<S> for Filter<F>
where
    S: Send + Sync,
    F: FromQueryPairs,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Filter(F::from_query_pairs(&pairs)?))
    }
}
