use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::{Body, HeaderMap, Method, Response, StatusCode};
use tracing::{error, info};
use warp::path::FullPath;

use crate::config::ERROR_BODY;
use crate::errors::ProxyError;
use crate::middleware::{capture_headers, restore_headers, sync_content_length, tag_cache_status};
use crate::models::{AppState, CacheKey, CacheStatus, CachedResponse};


/// Serves a request from the cache, or forwards it to the origin and
/// caches what comes back.
///
/// Lookup and insert are not atomic: concurrent misses on one key all
/// reach the origin and the last one to finish is what stays cached.
pub async fn handle_proxy(
    method: Method,
    full_path: FullPath,
    query: Option<String>,
    headers: HeaderMap,
    body: Body,
    state: Arc<AppState>,
) -> Result<Response<Body>, warp::Rejection> {
    let start = Instant::now();
    // A bare trailing `?` is kept: `/foo?` and `/foo` are distinct keys.
    let path_and_query = match query {
        Some(query) => format!("{}?{}", full_path.as_str(), query),
        None => full_path.as_str().to_string(),
    };
    let cache_key = CacheKey::new(&method, &path_and_query);

    if let Some(cached) = state.store.get(&cache_key).await {
        info!(key = %cache_key, "cache HIT");
        return Ok(replay(cached, &method));
    }

    let forwarded = match state
        .forwarder
        .forward(method, &path_and_query, headers, body)
        .await
    {
        Ok(forwarded) => forwarded,
        Err(err) => {
            error!(key = %cache_key, error = %err, "error forwarding request");
            return Err(warp::reject::custom(err));
        }
    };

    let captured = CachedResponse {
        headers: capture_headers(&forwarded.headers),
        body: String::from_utf8_lossy(&forwarded.body).into_owned(),
    };
    state.store.put(cache_key.clone(), captured).await;

    info!(
        key = %cache_key,
        status = forwarded.status.as_u16(),
        elapsed_ms = elapsed_millis(start.elapsed()),
        "cache MISS"
    );

    let mut response = Response::new(Body::from(forwarded.body));
    *response.status_mut() = forwarded.status;
    *response.headers_mut() = forwarded.headers;
    tag_cache_status(response.headers_mut(), CacheStatus::Miss);
    Ok(response)
}

fn replay(cached: CachedResponse, method: &Method) -> Response<Body> {
    let mut headers = restore_headers(&cached.headers);
    // HEAD entries carry the length of a body that was never sent.
    if *method != Method::HEAD {
        sync_content_length(&mut headers, cached.body.len());
    }
    tag_cache_status(&mut headers, CacheStatus::Hit);

    let mut response = Response::new(Body::from(cached.body));
    *response.headers_mut() = headers;
    response
}

pub(crate) fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<ProxyError>().is_some() {
        (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY)
    } else {
        error!(rejection = ?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY)
    };

    Ok(warp::reply::with_status(message.to_string(), code))
}
