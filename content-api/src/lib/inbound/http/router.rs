use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use auth::UserDirectory;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_session::current_session;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_editorial_role;
use crate::domain::session::ports::SessionServicePort;

/// Gate over whichever directory the server was started with.
pub type Gate = AuthGate<dyn UserDirectory>;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub gate: Gate,
    pub auto_refresh: bool,
}

pub fn create_router(
    session_service: Arc<dyn SessionServicePort>,
    gate: Gate,
    auto_refresh: bool,
) -> Router {
    let state = AppState {
        session_service,
        gate,
        auto_refresh,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let editorial_routes = Router::new()
        .route("/api/admin/session", get(current_session))
        .route_layer(middleware::from_fn(require_editorial_role))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Authorization headers are left out of the span on purpose: they carry tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(editorial_routes)
        .layer(trace_layer)
        .with_state(state)
}
