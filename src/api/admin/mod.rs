//! Admin API endpoints for managing storage mounts

pub mod storages;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/storage/list", get(storages::list_storages))
        .route("/storage/create", post(storages::create_storage))
        .route("/storage/update", post(storages::update_storage))
        .route("/storage/delete", post(storages::delete_storage))
        .route("/storage/enable", post(storages::enable_storage))
        .route("/storage/disable", post(storages::disable_storage))
        .route("/storage/get", get(storages::get_storage))
        .route("/storage/load_all", post(storages::load_all_storages))
}
