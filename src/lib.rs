pub mod cli;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod store;

pub use config::{Origin, ProxyConfig};
pub use errors::{OriginError, ProxyError, StoreError};
pub use models::{AppState, CacheKey, CacheStatus, CachedResponse, StoredHeaderValue};
pub use services::{ForwardedResponse, OriginForwarder};
pub use store::{CacheStore, ClearOutcome, LoadOutcome};
