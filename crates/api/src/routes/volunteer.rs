use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/volunteers",
            post(handlers::volunteer::create_volunteer).get(handlers::volunteer::list_volunteers),
        )
        .route(
            "/api/volunteers/:id",
            get(handlers::volunteer::get_volunteer)
                .put(handlers::volunteer::update_volunteer)
                .delete(handlers::volunteer::delete_volunteer),
        )
}
