//! Typed values bound to positional `$n` parameters.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{QueryAs, QueryScalar};

/// A value bound to a PostgreSQL statement. Each variant binds with its own SQL type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Text(String),
    TextArray(Vec<String>),
    Int(i32),
    BigInt(i64),
    Bool(bool),
}

pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;
pub type PgQueryScalar<'q, O> = QueryScalar<'q, Postgres, O, PgArguments>;

/// Bind `params` in order onto a row query.
pub fn bind_as<'q, R>(mut query: PgQueryAs<'q, R>, params: &[PgBindValue]) -> PgQueryAs<'q, R> {
    for p in params {
        query = match p.clone() {
            PgBindValue::Text(v) => query.bind(v),
            PgBindValue::TextArray(v) => query.bind(v),
            PgBindValue::Int(v) => query.bind(v),
            PgBindValue::BigInt(v) => query.bind(v),
            PgBindValue::Bool(v) => query.bind(v),
        };
    }
    query
}

/// Bind `params` in order onto a scalar query (counts).
pub fn bind_scalar<'q, O>(
    mut query: PgQueryScalar<'q, O>,
    params: &[PgBindValue],
) -> PgQueryScalar<'q, O> {
    for p in params {
        query = match p.clone() {
            PgBindValue::Text(v) => query.bind(v),
            PgBindValue::TextArray(v) => query.bind(v),
            PgBindValue::Int(v) => query.bind(v),
            PgBindValue::BigInt(v) => query.bind(v),
            PgBindValue::Bool(v) => query.bind(v),
        };
    }
    query
}
