use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::{Body, Client, HeaderMap, Method, Request, StatusCode, Uri};

use crate::config::Origin;
use crate::errors::ProxyError;


/// A fully buffered origin response.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Sends cache misses to the fixed origin, one fresh connection per request.
#[derive(Clone)]
pub struct OriginForwarder {
    client: Client<HttpConnector>,
    origin: Origin,
}

impl OriginForwarder {
    pub fn new(origin: Origin) -> Self {
        let client = Client::builder().pool_max_idle_per_host(0).build_http();
        Self { client, origin }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Streams `body` to the origin as it arrives and buffers the whole
    /// response. No timeout and no retry.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
        body: Body,
    ) -> Result<ForwardedResponse, ProxyError> {
        let uri: Uri = format!("http://{}{}", self.origin.authority(), path_and_query).parse()?;

        let mut req = Request::builder().method(method).uri(uri).body(body)?;
        *req.headers_mut() = headers;

        let response = self.client.request(req).await?;
        let (parts, body) = response.into_parts();
        let body = hyper::body::to_bytes(body).await?;

        Ok(ForwardedResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
