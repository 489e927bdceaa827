mod admin;
mod categories;
mod health;
mod login;
mod products;
mod register;
mod session;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{
    middleware::{admin_middleware, auth_middleware},
    AppState,
};

pub fn create_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/api/upload-excel", post(admin::upload_spreadsheet))
        .route("/api/productos", delete(admin::deactivate_all_products))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    let session_routes = Router::new()
        .route("/logout", post(session::logout))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/productos", get(products::list_products))
        .route("/api/productos/:id", get(products::get_product))
        .route("/api/categorias", get(categories::list_categories))
        .route("/register", post(register::register_user))
        .route("/api/login", post(login::login_user))
        .route("/api/session_status", get(session::session_status))
        .merge(admin_routes)
        .merge(session_routes)
}
