//! Category endpoints
//!
//! The category index is derived from the wallpaper collection, one
//! entry per distinct category with its oldest wallpaper as preview.
//! Rename and remove are bulk mutations gated on the store actually
//! changing something before any cache purge runs.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::routes::envelope::{catalog_error_response, error_response, success_response};
use crate::server::AppState;

/// Handle GET /category/get-categories
pub async fn handle_get_categories(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.catalog.list_categories().await {
        Ok((categories, from_cache)) => {
            let message = if from_cache {
                "Categories fetched from cache"
            } else {
                "Categories fetched successfully"
            };
            success_response(
                StatusCode::OK,
                message,
                serde_json::to_value(&categories).unwrap_or(Value::Null),
            )
        }
        Err(e) => catalog_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct RenameCategoryRequest {
    #[serde(rename = "oldCategoryName")]
    old_category_name: String,
    #[serde(rename = "newCategoryName")]
    new_category_name: String,
}

/// Handle PUT /category/rename-category
///
/// JSON body: `{oldCategoryName, newCategoryName}`
pub async fn handle_rename_category(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Rename category body error: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let request: RenameCategoryRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {}", e))
        }
    };

    match state
        .catalog
        .rename_category(&request.old_category_name, &request.new_category_name)
        .await
    {
        Ok(modified) => success_response(
            StatusCode::OK,
            "Category renamed successfully",
            serde_json::json!({ "modifiedCount": modified }),
        ),
        Err(e) => catalog_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct RemoveCategoryRequest {
    #[serde(rename = "categoryName")]
    category_name: String,
}

/// Handle DELETE /category/remove-category
///
/// JSON body: `{categoryName}`
pub async fn handle_remove_category(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Remove category body error: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let request: RemoveCategoryRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {}", e))
        }
    };

    match state.catalog.remove_category(&request.category_name).await {
        Ok(deleted) => success_response(
            StatusCode::OK,
            "Category removed successfully",
            serde_json::json!({ "deletedCount": deleted }),
        ),
        Err(e) => catalog_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_request_wire_names() {
        let request: RenameCategoryRequest = serde_json::from_str(
            r#"{"oldCategoryName": "Nature", "newCategoryName": "Outdoors"}"#,
        )
        .unwrap();
        assert_eq!(request.old_category_name, "Nature");
        assert_eq!(request.new_category_name, "Outdoors");
    }

    #[test]
    fn test_remove_request_requires_category_name() {
        let request: RemoveCategoryRequest =
            serde_json::from_str(r#"{"categoryName": "Nature"}"#).unwrap();
        assert_eq!(request.category_name, "Nature");

        assert!(serde_json::from_str::<RemoveCategoryRequest>("{}").is_err());
    }
}
