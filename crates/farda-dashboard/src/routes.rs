//! Route definitions for the dashboard.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{assets, auth, handlers};

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    // Admin-only screens and mutations. require_admin runs inside the auth
    // middleware, so the session user is already attached.
    let admin = Router::new()
        .route("/users", get(handlers::users))
        .route("/settings", get(handlers::settings))
        .route("/api/users", post(handlers::api::user_create))
        .route("/api/schools", post(handlers::api::school_create))
        .route_layer(middleware::from_fn(auth::require_admin));

    Router::new()
        .route("/", get(handlers::home))
        .route("/orders", get(handlers::orders))
        .route("/orders/new", get(handlers::order_new))
        .route("/orders/{id}", get(handlers::order_detail))
        .route("/clients", get(handlers::clients))
        .route("/products", get(handlers::products))
        .route("/stock", get(handlers::stock))
        .route("/reports", get(handlers::reports))
        .route("/account", get(handlers::password))
        .route("/api/clients", post(handlers::api::client_create))
        .route("/api/clients/{id}/delete", post(handlers::api::client_delete))
        .route("/api/products", post(handlers::api::product_create))
        .route(
            "/api/products/{id}/deactivate",
            post(handlers::api::product_deactivate),
        )
        .route("/api/stock/adjust", post(handlers::api::stock_adjust))
        .route("/api/orders", post(handlers::api::order_place))
        .route("/api/orders/{id}/status", post(handlers::api::order_status))
        .route("/api/orders/{id}/delete", post(handlers::api::order_delete))
        .route("/api/password", post(handlers::api::password_change))
        .merge(admin)
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/static/{*path}", get(assets::static_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
