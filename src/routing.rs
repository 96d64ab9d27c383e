//! Application router configuration.

use axum::{
    Router,
    routing::get,
};

use crate::{
    AppState, endpoints,
    not_found::{get_404_not_found, get_405_method_not_allowed},
    profile::get_profile_endpoint,
    settings::{get_target_endpoint, set_target_endpoint},
    summary::get_summary_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint)
                .post(create_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::SETTINGS,
            get(get_target_endpoint).post(set_target_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::PROFILE, get(get_profile_endpoint))
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .with_state(state)
}
