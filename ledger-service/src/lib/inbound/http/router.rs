use std::sync::Arc;
use std::time::Duration;

use auth::IdentityDirectory;
use auth::TokenCodec;
use axum::body::Body;
use axum::extract::FromRef;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::create_entry::create_entry;
use super::handlers::create_user::create_user;
use super::handlers::delete_entry::delete_entry;
use super::handlers::get_balance::get_balance;
use super::handlers::get_entry::get_entry;
use super::handlers::search_entries::search_entries;
use super::handlers::update_entry::update_entry;
use super::handlers::update_entry_status::update_entry_status;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_authentication;
use super::middleware::AuthenticationState;
use crate::domain::entry::ports::EntryServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub entry_service: Arc<dyn EntryServicePort>,
    pub directory: Arc<dyn IdentityDirectory>,
    pub token_codec: Arc<TokenCodec>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    entry_service: Arc<dyn EntryServicePort>,
    directory: Arc<dyn IdentityDirectory>,
    token_codec: Arc<TokenCodec>,
) -> Router {
    let state = AppState {
        user_service,
        entry_service,
        directory,
        token_codec,
    };

    let public_routes = Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/authenticate", post(authenticate));

    let protected_routes = Router::new()
        .route("/api/users/:user_id/balance", get(get_balance))
        .route("/api/entries", post(create_entry).get(search_entries))
        .route(
            "/api/entries/:entry_id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/api/entries/:entry_id/status", put(update_entry_status))
        .route_layer(middleware::from_fn(require_authentication));

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
        .layer(middleware::from_fn_with_state(
            AuthenticationState::from_ref(&state),
            auth_middleware,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
