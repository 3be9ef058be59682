//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. Routes are nested under `/api/`; uploaded documents are
//! served statically under `/uploads`.
//!
//! Health and admin auth are public; everything else goes through the
//! bearer-token middleware.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the admin API router.
pub fn api_router(ctx: ApiContext) -> Router {
    // Public routes — no auth
    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/admin/register", post(endpoints::auth::register))
        .route("/admin/login", post(endpoints::auth::login))
        .with_state(ctx.clone());

    // Protected routes — bearer token required
    //
    // Layers are applied from bottom (innermost) to top (outermost):
    // Extension (outermost) → Auth → Handler. Extension must be
    // outermost so the middleware can access ApiContext.
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route(
            "/patients",
            post(endpoints::patients::create).get(endpoints::patients::list),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/patients/:id/appointments",
            get(endpoints::patients::appointments),
        )
        .route("/patients/:id/history", get(endpoints::patients::history_view))
        .route(
            "/doctors",
            post(endpoints::doctors::create).get(endpoints::doctors::list),
        )
        .route(
            "/doctors/:id",
            get(endpoints::doctors::detail)
                .put(endpoints::doctors::update)
                .delete(endpoints::doctors::remove),
        )
        .route(
            "/appointments",
            post(endpoints::appointments::create).get(endpoints::appointments::list),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail)
                .put(endpoints::appointments::update)
                .delete(endpoints::appointments::remove),
        )
        .route(
            "/conditions",
            post(endpoints::conditions::create).get(endpoints::conditions::list),
        )
        .route(
            "/conditions/:id",
            get(endpoints::conditions::detail)
                .put(endpoints::conditions::update)
                .delete(endpoints::conditions::remove),
        )
        .route("/dashboard/summary", get(endpoints::dashboard::summary))
        .route("/upload", post(endpoints::documents::upload))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    Router::new()
        .nest("/api", public)
        .nest("/api", protected)
        .nest_service("/uploads", ServeDir::new(ctx.config.uploads_dir.clone()))
        .layer(CorsLayer::permissive())
}
