use axum::Json;
use healtharmy_core::models::principal::User;
use std::sync::Arc;

use crate::{middleware::auth::CurrentPrincipal, ApiState};

/// The signed-in user, or `null` for anonymous requests.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Option<User>> {
    Json(principal.user().cloned())
}
