use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("error forwarding request: {0}")]
    Transport(#[from] hyper::Error),

    #[error("failed to bind listener: {0}")]
    Bind(#[source] warp::Error),

    #[error("failed to install logger: {0}")]
    Logging(String),
}

impl warp::reject::Reject for ProxyError {}

/// Failures of the cache file. Logged by the store, never fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed cache data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("invalid origin URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported origin scheme '{0}', only http is supported")]
    UnsupportedScheme(String),

    #[error("origin URL has no host")]
    MissingHost,
}
