use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod measure_service;

use measure_service::MeasureService;

#[derive(Clone)]
pub struct AppState {
    pub api_token: Arc<str>,
    pub measure_service: Arc<dyn MeasureService>,
}

impl AppState {
    pub fn new(api_token: String, measure_service: Arc<dyn MeasureService>) -> Self {
        Self {
            api_token: Arc::<str>::from(api_token),
            measure_service,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    use http::handlers;

    let create = post(handlers::create_measure).route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_capability_token,
    ));

    let api = Router::new()
        .route(
            "/measures",
            get(handlers::list_measures)
                .put(handlers::update_measure)
                .delete(handlers::delete_measures)
                .merge(create),
        )
        .route(
            "/measures/{id}",
            get(handlers::get_measure).delete(handlers::delete_measure),
        )
        .route(
            "/measures/owner/{owner}",
            get(handlers::list_measures_by_owner),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
