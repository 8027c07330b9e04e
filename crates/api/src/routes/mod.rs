//! API route definitions.

use axum::{Router, middleware};

use crate::AppState;
use crate::middleware::{auth_middleware, optional_auth_middleware};
use coa_core::chart::ChartBackend;

pub mod accounts;
pub mod charts;
pub mod health;

/// Creates the API router; the middleware layers need the state up front.
pub fn api_routes_with_state<B: ChartBackend>(state: AppState<B>) -> Router<AppState<B>> {
    // Routes that act on a user's charts require a token
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(charts::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<B>,
        ));

    // Browsing works without a token, as the guest user
    let guest_routes = charts::guest_routes().layer(middleware::from_fn_with_state(
        state,
        optional_auth_middleware::<B>,
    ));

    Router::new()
        .merge(health::routes())
        .merge(guest_routes)
        .merge(protected_routes)
}
