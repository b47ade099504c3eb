use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use hyper::header::HeaderName;
use lazy_static::lazy_static;
use url::Url;

use crate::errors::OriginError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_FILE: &str = "cache.json";
pub const DEFAULT_ORIGIN_PORT: u16 = 80;
pub const ERROR_BODY: &str = "Internal Server Error";

lazy_static! {
    /// Response header carrying `HIT` or `MISS`.
    pub static ref CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");
}

/// Host and port of the upstream server every miss is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    host: String,
    port: u16,
}

impl Origin {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s)?;
        if url.scheme() != "http" {
            return Err(OriginError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url.host_str().ok_or(OriginError::MissingHost)?;
        Ok(Self::new(host, url.port().unwrap_or(DEFAULT_ORIGIN_PORT)))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "http://{}", self.authority())
    }
}

/// Everything `start` needs to run the server.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub origin: Origin,
    pub cache_file: PathBuf,
}

impl ProxyConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
