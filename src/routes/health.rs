//! Health and version endpoints
//!
//! /health reports liveness plus cache figures so operators can see hit
//! rates without a metrics stack; /version returns build information
//! for deployment verification.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::server::AppState;

/// Health response served at /health
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Cargo package version
    pub version: &'static str,
    /// Seconds since the process started
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    /// Cache figures for this process
    pub cache: CacheHealth,
}

/// Cache figures included in the health payload
#[derive(Serialize)]
pub struct CacheHealth {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Hit percentage over all lookups
    #[serde(rename = "hitRate")]
    pub hit_rate: f64,
    pub evictions: u64,
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let stats = state.cache.stats();
    let response = HealthResponse {
        status: "UP",
        service: "muralis",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        cache: CacheHealth {
            entries: stats.entries,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
            evictions: stats.evictions,
        },
    };

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"status":"UP","error":"Serialization failed"}"#.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    /// Cargo package version
    pub version: &'static str,
    /// Git commit hash (short)
    pub commit: &'static str,
    /// Git commit hash (full)
    pub commit_full: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Service name
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "muralis",
    };

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"version":"unknown","commit":"unknown"}"#.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}
