//! Catalog routes, mounted under `/v1`. Paths come from the catalog definitions.

use crate::config::{CLASSES, SPELLS, SUBCLASSES};
use crate::handlers::{
    get_class, get_entry, get_spell, get_subclass, list_classes, list_entries, list_spells,
    list_subclasses,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: &AppState) -> Router {
    let classes = format!("/{}", CLASSES.path);
    let mut router = Router::new()
        .route(&classes, get(list_classes))
        .route(&format!("{}/:id", classes), get(get_class))
        .route(
            &format!("{}/:id/{}", classes, SUBCLASSES.path),
            get(list_subclasses),
        )
        .route(
            &format!("{}/:id/{}/:sub_id", classes, SUBCLASSES.path),
            get(get_subclass),
        )
        .with_state(state.classes.clone())
        .merge(
            Router::new()
                .route(&format!("/{}", SPELLS.path), get(list_spells))
                .route(&format!("/{}/:id", SPELLS.path), get(get_spell))
                .with_state(state.spells.clone()),
        );

    for service in &state.entries {
        let path = service.def().path;
        router = router.merge(
            Router::new()
                .route(&format!("/{}", path), get(list_entries))
                .route(&format!("/{}/:id", path), get(get_entry))
                .with_state(service.clone()),
        );
    }
    router
}
