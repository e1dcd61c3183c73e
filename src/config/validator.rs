//! Catalog validation: referential integrity of parents and columns the query builder relies on.

use crate::config::catalog::{ResourceDef, ID_COLUMN, NAME_COLUMN, SOURCE_COLUMN};
use crate::error::ConfigError;
use std::collections::HashSet;

/// Columns the shared list query filters and sorts on.
const REQUIRED_COLUMNS: &[&str] = &[ID_COLUMN, NAME_COLUMN, SOURCE_COLUMN];

pub fn validate(resources: &[&ResourceDef]) -> Result<(), ConfigError> {
    let top_level: HashSet<&str> = resources
        .iter()
        .filter(|r| r.parent.is_none())
        .map(|r| r.path)
        .collect();

    let mut path_segments = HashSet::new();
    let mut tables = HashSet::new();
    for r in resources {
        for col in REQUIRED_COLUMNS {
            if !r.has_column(col) {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", r.table, col),
                });
            }
        }
        if !tables.insert(r.table) {
            return Err(ConfigError::Validation(format!("table {} defined twice", r.table)));
        }
        match r.parent {
            Some(parent) => {
                if !top_level.contains(parent.path) {
                    return Err(ConfigError::MissingReference {
                        kind: "parent resource",
                        id: parent.path.to_string(),
                    });
                }
                if !r.has_column(parent.column) {
                    return Err(ConfigError::MissingReference {
                        kind: "column",
                        id: format!("{}.{}", r.table, parent.column),
                    });
                }
            }
            None => {
                if !path_segments.insert(r.path) {
                    return Err(ConfigError::DuplicatePathSegment(r.path.to_string()));
                }
            }
        }
    }
    Ok(())
}
