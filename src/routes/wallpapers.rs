//! Wallpaper endpoints
//!
//! Reads are served through the cache-aside layer; uploads stream the
//! image to blob storage before recording the catalog document. The
//! response message distinguishes cache hits so clients and operators
//! can see where a page came from.

use std::sync::Arc;

use base64::Engine;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{HeaderMap, Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::catalog::{BulkEntry, QueryPlan, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::routes::envelope::{catalog_error_response, error_response, success_response};
use crate::server::AppState;

/// Query parameters of the paginated wallpaper read
#[derive(Debug, PartialEq)]
pub struct ListWallpapersQuery {
    pub page: i64,
    pub limit: i64,
    pub favourite_ids: Option<Vec<String>>,
}

impl ListWallpapersQuery {
    /// Parse from a raw query string.
    ///
    /// `page` and `limit` fall back to their defaults when absent,
    /// unparseable, or non-positive. `favouriteIds` must be a JSON
    /// string array when present; anything else is a client error
    /// rather than a silent empty set.
    pub fn from_query_string(query: Option<&str>) -> Result<Self, String> {
        let mut page = DEFAULT_PAGE as i64;
        let mut limit = DEFAULT_LIMIT as i64;
        let mut favourite_ids = None;

        for pair in query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value)
                .map_err(|_| "Invalid query string encoding".to_string())?;
            match key {
                "page" => {
                    page = value
                        .parse::<i64>()
                        .ok()
                        .filter(|v| *v > 0)
                        .unwrap_or(DEFAULT_PAGE as i64);
                }
                "limit" => {
                    limit = value
                        .parse::<i64>()
                        .ok()
                        .filter(|v| *v > 0)
                        .unwrap_or(DEFAULT_LIMIT as i64);
                }
                "favouriteIds" => {
                    let ids: Vec<String> = serde_json::from_str(&value)
                        .map_err(|_| "favouriteIds must be a JSON array of strings".to_string())?;
                    favourite_ids = Some(ids);
                }
                _ => {}
            }
        }

        Ok(Self {
            page,
            limit,
            favourite_ids,
        })
    }
}

/// Handle GET /wallpaper/get-wallpaper/{category}
pub async fn handle_list_wallpapers(
    req: Request<Incoming>,
    state: Arc<AppState>,
    category: &str,
) -> Response<Full<Bytes>> {
    let category = match urlencoding::decode(category) {
        Ok(c) => c.into_owned(),
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid category encoding"),
    };

    let query = match ListWallpapersQuery::from_query_string(req.uri().query()) {
        Ok(q) => q,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    let plan = match QueryPlan::new(&category, query.page, query.limit, query.favourite_ids) {
        Ok(plan) => plan,
        Err(e) => return catalog_error_response(&e),
    };

    match state.catalog.list_wallpapers(&plan).await {
        Ok((page, from_cache)) => {
            let message = if from_cache {
                "Wallpapers fetched from cache"
            } else {
                "Wallpapers fetched successfully"
            };
            success_response(
                StatusCode::OK,
                message,
                serde_json::to_value(&page).unwrap_or(Value::Null),
            )
        }
        Err(e) => catalog_error_response(&e),
    }
}

/// Handle POST /wallpaper/add-wallpaper
///
/// The image goes in the request body; `X-Wallpaper-Category` and
/// `X-Wallpaper-Name` headers carry the catalog fields.
pub async fn handle_add_wallpaper(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let category = match header_string(req.headers(), "X-Wallpaper-Category") {
        Some(c) => c,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "X-Wallpaper-Category header is required",
            )
        }
    };
    let name = match header_string(req.headers(), "X-Wallpaper-Name") {
        Some(n) => n,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "X-Wallpaper-Name header is required",
            )
        }
    };
    let content_type = header_string(req.headers(), "Content-Type")
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let data = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Add wallpaper body error: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    match state
        .catalog
        .add_wallpaper(&category, &name, data, &content_type)
        .await
    {
        Ok(wallpaper) => success_response(
            StatusCode::OK,
            "Wallpapers uploaded successfully",
            serde_json::json!({ "uploadedWallpapers": [wallpaper] }),
        ),
        Err(e) => catalog_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct BulkUploadRequest {
    category: String,
    wallpapers: Vec<BulkUploadEntry>,
}

#[derive(Debug, Deserialize)]
struct BulkUploadEntry {
    name: String,
    /// Base64-encoded image bytes
    data: String,
    #[serde(rename = "contentType")]
    content_type: Option<String>,
}

/// Handle POST /wallpaper/add-wallpaper-bulk
///
/// JSON body: `{category, wallpapers: [{name, data, contentType?}]}`
/// with `data` base64-encoded. Entries that fail to upload are skipped;
/// malformed base64 rejects the whole request.
pub async fn handle_add_wallpaper_bulk(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Bulk upload body error: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let request: BulkUploadRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {}", e))
        }
    };

    let mut entries = Vec::with_capacity(request.wallpapers.len());
    for entry in request.wallpapers {
        match base64::engine::general_purpose::STANDARD.decode(entry.data.as_bytes()) {
            Ok(bytes) => entries.push(BulkEntry {
                name: entry.name,
                data: Bytes::from(bytes),
                content_type: entry
                    .content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            }),
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Wallpaper '{}' is not valid base64", entry.name),
                )
            }
        }
    }

    match state
        .catalog
        .add_wallpapers_bulk(&request.category, entries)
        .await
    {
        Ok(uploaded) => success_response(
            StatusCode::OK,
            "Wallpapers uploaded successfully",
            serde_json::json!({ "uploadedWallpapers": uploaded }),
        ),
        Err(e) => catalog_error_response(&e),
    }
}

/// Handle POST /wallpaper/inc-view-count?wallpaperId={id}
pub async fn handle_inc_view_count(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let id = match query_param(req.uri().query(), "wallpaperId") {
        Some(id) if !id.is_empty() => id,
        _ => return error_response(StatusCode::BAD_REQUEST, "wallpaperId is required"),
    };

    match state.catalog.increment_view_count(&id).await {
        Ok(()) => success_response(
            StatusCode::OK,
            "Wallpaper view count incremented successfully",
            Value::Null,
        ),
        Err(e) => catalog_error_response(&e),
    }
}

/// Handle POST /wallpaper/inc-download-count?wallpaperId={id}
pub async fn handle_inc_download_count(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let id = match query_param(req.uri().query(), "wallpaperId") {
        Some(id) if !id.is_empty() => id,
        _ => return error_response(StatusCode::BAD_REQUEST, "wallpaperId is required"),
    };

    match state.catalog.increment_download_count(&id).await {
        Ok(()) => success_response(
            StatusCode::OK,
            "Wallpaper download count incremented successfully",
            Value::Null,
        ),
        Err(e) => catalog_error_response(&e),
    }
}

/// Handle DELETE /wallpaper/delete-wallpaper/{id}
pub async fn handle_delete_wallpaper(state: Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    let id = match urlencoding::decode(id) {
        Ok(id) => id.into_owned(),
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid id encoding"),
    };

    match state.catalog.delete_wallpaper(&id).await {
        Ok(wallpaper) => success_response(
            StatusCode::OK,
            "Wallpaper deleted successfully",
            serde_json::json!({ "deletedWallpaper": wallpaper }),
        ),
        Err(e) => catalog_error_response(&e),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    for pair in query.unwrap_or("").split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                return urlencoding::decode(value).ok().map(|v| v.into_owned());
            }
        }
    }
    None
}
