//! Response envelope shared by the catalog endpoints
//!
//! Every wallpaper and category response uses one JSON shape:
//! `{statusCode, message, data, status, errors}`, with `status` true for
//! 2xx. Error responses carry `data: null`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::Value;
use tracing::error;

use crate::types::CatalogError;

/// Build a success envelope carrying the given payload
pub fn success_response(status: StatusCode, message: &str, data: Value) -> Response<Full<Bytes>> {
    envelope(status, message, data)
}

/// Build an error envelope with a null payload
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    envelope(status, message, Value::Null)
}

/// Map a service error onto the envelope.
///
/// Client-facing detail is kept for 4xx errors; server-side failures log
/// the real cause and surface a generic message.
pub fn catalog_error_response(err: &CatalogError) -> Response<Full<Bytes>> {
    let message = match err {
        CatalogError::Validation(m) | CatalogError::NotFound(m) => m.clone(),
        _ => {
            error!("Request failed: {}", err);
            "Internal server error".to_string()
        }
    };
    error_response(err.status_code(), &message)
}

fn envelope_value(status: StatusCode, message: &str, data: &Value) -> Value {
    serde_json::json!({
        "statusCode": status.as_u16(),
        "message": message,
        "data": data,
        "status": status.is_success(),
        "errors": [],
    })
}

fn envelope(status: StatusCode, message: &str, data: Value) -> Response<Full<Bytes>> {
    let body = envelope_value(status, message, &data);

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let data = serde_json::json!({ "wallpapers": [] });
        let value = envelope_value(StatusCode::OK, "Wallpapers fetched successfully", &data);

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "Wallpapers fetched successfully");
        assert_eq!(value["status"], true);
        assert!(value["data"]["wallpapers"].is_array());
        assert_eq!(value["errors"], serde_json::json!([]));
    }

    #[test]
    fn test_error_envelope_shape() {
        let value = envelope_value(StatusCode::NOT_FOUND, "Wallpaper 'x' not found", &Value::Null);

        assert_eq!(value["statusCode"], 404);
        assert_eq!(value["status"], false);
        assert!(value["data"].is_null());
    }

    #[test]
    fn test_catalog_error_status_and_detail() {
        let response =
            catalog_error_response(&CatalogError::Validation("Category is required".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = catalog_error_response(&CatalogError::NotFound("gone".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Database detail must not leak into the response status line
        let response = catalog_error_response(&CatalogError::Database("dsn secret".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
