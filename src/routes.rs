// routes.rs - router composition

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{pages, protected, public};
use crate::middleware::{bearer_auth_middleware, require_login, resolve_session};
use crate::state::AppState;

/// The complete application: HTML pages, JSON API and health check
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_upload_bytes;
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(public::health_get))
        .merge(page_routes(state.clone()))
        .nest("/api", api_public_routes().merge(api_protected_routes(state.clone())))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_public_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/token", get(public::token_get))
        .route("/users", post(public::register_post))
}

fn api_protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route(
            "/categories",
            get(protected::categories_get).post(protected::categories_post),
        )
        .route(
            "/category/:id",
            get(protected::category_get)
                .put(protected::category_put)
                .delete(protected::category_delete),
        )
        .route("/category/:id/items", post(protected::items_post))
        .route(
            "/category/:id/item/:item_id",
            get(protected::item_get)
                .put(protected::item_put)
                .delete(protected::item_delete),
        )
        .route_layer(from_fn_with_state(state, bearer_auth_middleware))
}

fn page_routes(state: AppState) -> Router<AppState> {
    use pages::{category, item};

    let login_required = Router::new()
        .route("/category/new", get(category::new_get).post(category::new_post))
        .route(
            "/category/:id/edit",
            get(category::edit_get).post(category::edit_post),
        )
        .route(
            "/category/:id/delete",
            get(category::delete_get).post(category::delete_post),
        )
        .route("/item/new", get(item::new_get).post(item::new_post))
        .route("/item/:id/edit", get(item::edit_get).post(item::edit_post))
        .route(
            "/item/:id/delete",
            get(item::delete_get).post(item::delete_post),
        )
        .route_layer(from_fn(require_login));

    Router::new()
        .route("/", get(pages::catalog_get))
        .route("/category/:id", get(pages::category_view_get))
        .route("/media/:name", get(pages::media_get))
        .route("/login", get(pages::login_get))
        .route("/oauth/callback", get(pages::oauth_callback_get))
        .route("/logout", get(pages::logout_get))
        .merge(login_required)
        .route_layer(from_fn_with_state(state, resolve_session))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let security = &state.config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    }
}
