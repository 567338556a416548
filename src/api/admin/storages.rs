//! Storage management admin endpoints

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{DomainError, MountId, PageRequest, Storage, StorageResp};

/// Raw paging query; parsed by hand so bad numbers surface as API errors
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListStoragesResponse {
    pub content: Vec<StorageResp>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateStorageResponse {
    pub id: MountId,
}

fn parse_number(name: &str, value: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::bad_request(format!("'{}' must be a non-negative integer", name))
                .with_param(name)
        }),
    }
}

impl PageQuery {
    fn to_page_request(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(
            parse_number("page", self.page.as_deref(), 1)?,
            parse_number("per_page", self.per_page.as_deref(), 0)?,
        ))
    }
}

impl IdQuery {
    fn parse(&self) -> Result<MountId, ApiError> {
        let raw = self.id.as_deref().map(str::trim).unwrap_or_default();
        raw.parse::<MountId>().map_err(|_| {
            ApiError::from(DomainError::invalid_id(format!(
                "'{}' is not a valid storage id",
                raw
            )))
        })
    }
}

/// GET /api/admin/storage/list
pub async fn list_storages(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListStoragesResponse>, ApiError> {
    let page = query.to_page_request()?;
    debug!(username = %user.username(), page = page.page, per_page = page.per_page, "Listing storages");

    let listing = state.mount_service.list(&user, page).await?;

    Ok(Json(ListStoragesResponse {
        content: listing.content,
        total: listing.total,
    }))
}

/// POST /api/admin/storage/create
pub async fn create_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(storage): Json<Storage>,
) -> Result<Json<CreateStorageResponse>, ApiError> {
    debug!(username = %user.username(), mount_path = %storage.mount_path, driver = %storage.driver, "Creating storage");

    let id = state.mount_service.create(&user, storage).await?;

    info!(id, username = %user.username(), "Storage created");
    Ok(Json(CreateStorageResponse { id }))
}

/// POST /api/admin/storage/update
pub async fn update_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(storage): Json<Storage>,
) -> Result<Json<Value>, ApiError> {
    debug!(username = %user.username(), id = storage.id, "Updating storage");

    state.mount_service.update(&user, storage).await?;

    Ok(Json(json!({})))
}

/// POST /api/admin/storage/delete?id=
pub async fn delete_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query.parse()?;
    debug!(username = %user.username(), id, "Deleting storage");

    state.mount_service.delete(&user, id).await?;

    info!(id, username = %user.username(), "Storage deleted");
    Ok(Json(json!({})))
}

/// POST /api/admin/storage/enable?id=
pub async fn enable_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query.parse()?;

    state.mount_service.enable(&user, id).await?;

    Ok(Json(json!({})))
}

/// POST /api/admin/storage/disable?id=
pub async fn disable_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query.parse()?;

    state.mount_service.disable(&user, id).await?;

    Ok(Json(json!({})))
}

/// GET /api/admin/storage/get?id=
pub async fn get_storage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<StorageResp>, ApiError> {
    let id = query.parse()?;

    let storage = state.mount_service.get(&user, id).await?;

    Ok(Json(storage))
}

/// POST /api/admin/storage/load_all
///
/// Responds once the enabled set is read; reloading continues in the background.
pub async fn load_all_storages(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Value>, ApiError> {
    if user.is_guest() {
        return Err(ApiError::forbidden("guests cannot manage storages"));
    }

    // Detached; completion is reported through the load gate
    let _reload = state.reload_coordinator.reload_all().await?;

    info!(username = %user.username(), "Storage reload started");
    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_page_query_defaults() {
        let page = PageQuery::default().to_page_request().unwrap();
        assert_eq!(page, PageRequest::new(1, 0));
    }

    #[test]
    fn test_page_query_rejects_garbage() {
        let query = PageQuery {
            page: Some("two".to_string()),
            per_page: None,
        };
        let err = query.to_page_request().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("page"));
    }

    #[test]
    fn test_id_query() {
        let query = IdQuery {
            id: Some(" 12 ".to_string()),
        };
        assert_eq!(query.parse().unwrap(), 12);

        for bad in [None, Some("-1"), Some("abc"), Some("")] {
            let query = IdQuery {
                id: bad.map(str::to_string),
            };
            assert_eq!(query.parse().unwrap_err().status, StatusCode::BAD_REQUEST);
        }
    }
}
