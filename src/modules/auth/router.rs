use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{logout, me, refresh_tokens};
use crate::middleware::auth::authenticate;
use crate::middleware::refresh::authenticate_refresh;
use crate::state::AppState;

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let refresh = Router::new()
        .route("/refresh", post(refresh_tokens))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_refresh,
        ));

    let session = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    refresh.merge(session)
}
