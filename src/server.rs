use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Buf;
use futures::{Stream, TryStreamExt};
use hyper::Body;
use tracing::info;
use warp::Filter;

use crate::config::ProxyConfig;
use crate::errors::ProxyError;
use crate::handlers::{handle_proxy, handle_rejection};
use crate::models::AppState;
use crate::services::OriginForwarder;
use crate::store::CacheStore;

/// Every method and path goes through the proxy handler.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    warp::any()
        .and(warp::method())
        .and(warp::path::full())
        .and(
            warp::query::raw()
                .map(Some)
                .or_else(|_| async { Ok::<(Option<String>,), Infallible>((None,)) }),
        )
        .and(warp::header::headers_cloned())
        .and(warp::body::stream().map(streaming_body))
        .and(state_filter)
        .and_then(handle_proxy)
        .recover(handle_rejection)
}

// The inbound body is piped to the origin without buffering.
fn streaming_body<S, B>(stream: S) -> Body
where
    S: Stream<Item = Result<B, warp::Error>> + Send + 'static,
    B: Buf + Send + 'static,
{
    Body::wrap_stream(stream.map_ok(|mut buf| buf.copy_to_bytes(buf.remaining())))
}

/// Loads the cache and serves until Ctrl-C.
pub async fn run(config: ProxyConfig) -> Result<(), ProxyError> {
    let store = Arc::new(CacheStore::new(config.cache_file.clone()));
    store.load().await;

    let state = Arc::new(AppState::new(store, OriginForwarder::new(config.origin.clone())));
    let (addr, server) = bind(state, config.listen_addr(), async {
        let _ = tokio::signal::ctrl_c().await;
    })?;

    info!(%addr, origin = %config.origin, "caching proxy server is running on port {}", addr.port());
    server.await;
    info!("caching proxy server stopped");
    Ok(())
}

/// Binds the proxy without serving yet; pass port 0 for an ephemeral port.
pub fn bind(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl std::future::Future<Output = ()>), ProxyError> {
    warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(ProxyError::Bind)
}
