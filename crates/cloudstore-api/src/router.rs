//! Route definitions for the CloudStore HTTP API.
//!
//! Authenticated routes are mounted under `/api`; anonymous link routes
//! under `/s`. File and folder routes share one set of generic handlers,
//! instantiated per [`ResourceKind`].

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::extractors::{FileKind, FolderKind, ResourceKind};
use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(kind_routes::<FolderKind>("folders"))
        .merge(kind_routes::<FileKind>("files"))
        .merge(listing_routes())
        .merge(user_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Item, sharing, link, and lifecycle routes under `/{prefix}/{id}`.
fn kind_routes<K: ResourceKind>(prefix: &str) -> Router<AppState> {
    use handlers::{drive, link, share, trash};

    Router::new()
        .route(
            &format!("/{prefix}/{{id}}"),
            get(drive::get_item::<K>)
                .patch(drive::rename::<K>)
                .delete(trash::trash_item::<K>),
        )
        .route(&format!("/{prefix}/{{id}}/star"), post(drive::toggle_star::<K>))
        .route(
            &format!("/{prefix}/{{id}}/star-shared"),
            post(share::toggle_shared_star::<K>),
        )
        .route(&format!("/{prefix}/{{id}}/share"), post(share::share::<K>))
        .route(
            &format!("/{prefix}/{{id}}/shares"),
            get(share::list_shares::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/shares/all"),
            delete(share::remove_all::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/shares/me"),
            delete(share::leave_share::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/shares/{{share_id}}"),
            patch(share::update_share::<K>).delete(share::revoke_share::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/share-link"),
            post(link::create_link::<K>)
                .get(link::get_link::<K>)
                .delete(link::revoke_link::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/restore"),
            post(trash::restore::<K>),
        )
        .route(
            &format!("/{prefix}/{{id}}/permanent"),
            delete(trash::purge::<K>),
        )
}

/// Folder creation and listings
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::drive::create_folder))
        .route("/folders/root", get(handlers::drive::list_root))
        .route(
            "/folders/{id}/contents",
            get(handlers::drive::folder_contents),
        )
}

/// File registration and download
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(handlers::drive::create_file))
        .route("/files/{id}/download", get(handlers::drive::download_file))
        .route("/items/move", post(handlers::drive::move_items))
}

/// Per-user listings
fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/shares/with-me", get(handlers::share::shared_with_me))
        .route("/shares/by-me", get(handlers::share::shared_by_me))
        .route("/starred", get(handlers::drive::starred))
        .route(
            "/trash",
            get(handlers::trash::list_trash).delete(handlers::trash::empty_trash),
        )
}

/// Current user
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::me))
}

/// Anonymous link access
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/s/{token}", get(handlers::public::view))
        .route("/s/{token}/download", get(handlers::public::download))
        .route(
            "/s/{token}/folder/{subfolder_id}",
            get(handlers::public::folder),
        )
}
