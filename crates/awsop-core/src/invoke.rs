//! The service-invoker seam.

use async_trait::async_trait;

use crate::operation::Operation;

/// Sends one request for operation `O` and returns its decoded response.
///
/// Implementations surface transport and service failures unchanged apart
/// from clarifying unreachable endpoints. They never retry; each call to
/// `invoke` is exactly one request on the wire.
#[async_trait]
pub trait Invoke<O: Operation>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn invoke(&self, request: &O::Request) -> Result<O::Response, Self::Error>;
}
