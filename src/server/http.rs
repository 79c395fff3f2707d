//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::cache::{spawn_cache_cleanup_task, InMemoryCache};
use crate::catalog::CatalogService;
use crate::config::Args;
use crate::routes;
use crate::types::CatalogError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Catalog service behind every wallpaper and category endpoint
    pub catalog: Arc<CatalogService>,
    /// Concrete cache handle, kept for stats and the cleanup task
    pub cache: Arc<InMemoryCache>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, catalog: Arc<CatalogService>, cache: Arc<InMemoryCache>) -> Self {
        Self {
            args,
            catalog,
            cache,
            started_at: Instant::now(),
        }
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run(state: Arc<AppState>) -> Result<(), CatalogError> {
    let listener = TcpListener::bind(state.args.listen).await.map_err(|e| {
        CatalogError::Internal(format!("Failed to bind {}: {}", state.args.listen, e))
    })?;

    info!("Muralis listening on {}", state.args.listen);

    spawn_cache_cleanup_task(
        Arc::clone(&state.cache),
        state.args.cache_cleanup_interval(),
    );
    info!(
        "Cache enabled (max {} entries, page TTL {}s, category TTL {}s)",
        state.args.cache_max_entries,
        state.args.page_cache_ttl_seconds,
        state.args.category_cache_ttl_seconds
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, stopping server");
                return Ok(());
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);

                            let service = service_fn(move |req| {
                                let state = Arc::clone(&state);
                                async move { handle_request(state, addr, req).await }
                            });

                            if let Err(err) = http1::Builder::new()
                                .preserve_header_case(true)
                                .title_case_headers(true)
                                .serve_connection(io, service)
                                .await
                            {
                                error!("Error serving connection from {}: {:?}", addr, err);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {:?}", e);
                    }
                }
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let mut response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            to_boxed(routes::health_check(Arc::clone(&state)))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => to_boxed(routes::version_info()),

        // Paginated wallpaper reads (category in the path, paging in the
        // query string)
        (Method::GET, p) if p.starts_with("/wallpaper/get-wallpaper/") => {
            let category = p.strip_prefix("/wallpaper/get-wallpaper/").unwrap_or("");
            to_boxed(routes::handle_list_wallpapers(req, Arc::clone(&state), category).await)
        }

        (Method::POST, "/wallpaper/add-wallpaper") => {
            to_boxed(routes::handle_add_wallpaper(req, Arc::clone(&state)).await)
        }

        (Method::POST, "/wallpaper/add-wallpaper-bulk") => {
            to_boxed(routes::handle_add_wallpaper_bulk(req, Arc::clone(&state)).await)
        }

        (Method::POST, "/wallpaper/inc-view-count") => {
            to_boxed(routes::handle_inc_view_count(req, Arc::clone(&state)).await)
        }

        (Method::POST, "/wallpaper/inc-download-count") => {
            to_boxed(routes::handle_inc_download_count(req, Arc::clone(&state)).await)
        }

        (Method::DELETE, p) if p.starts_with("/wallpaper/delete-wallpaper/") => {
            let id = p.strip_prefix("/wallpaper/delete-wallpaper/").unwrap_or("");
            to_boxed(routes::handle_delete_wallpaper(Arc::clone(&state), id).await)
        }

        (Method::GET, "/category/get-categories") => {
            to_boxed(routes::handle_get_categories(Arc::clone(&state)).await)
        }

        (Method::PUT, "/category/rename-category") => {
            to_boxed(routes::handle_rename_category(req, Arc::clone(&state)).await)
        }

        (Method::DELETE, "/category/remove-category") => {
            to_boxed(routes::handle_remove_category(req, Arc::clone(&state)).await)
        }

        // CORS preflight
        (Method::OPTIONS, _) => to_boxed(preflight_response()),

        _ => to_boxed(routes::error_response(
            StatusCode::NOT_FOUND,
            &format!("Route {} not found", path),
        )),
    };

    apply_cors(&mut response, &state.args.cors_origin);

    Ok(response)
}

/// Convert a Full<Bytes> body to BoxBody
fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}

/// CORS preflight response. The allow-origin header is applied with the
/// rest of the response in [`handle_request`].
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Attach the configured allow-origin to every response
fn apply_cors(response: &mut Response<BoxBody>, origin: &str) {
    let value =
        HeaderValue::from_str(origin).unwrap_or_else(|_| HeaderValue::from_static("*"));
    response
        .headers_mut()
        .insert("Access-Control-Allow-Origin", value);
}
