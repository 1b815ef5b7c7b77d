//! The asynchronous seam to the network.

use std::future::Future;

use crate::http::{HttpRequest, Outcome};

/// Executes one request and reports how it ended.
///
/// Implementations attach every header in `request.headers`, honour
/// `request.encoding` (see `RequestBody::encode`) and map transport errors to
/// `Outcome::Failure`. Futures are not required to be `Send`; the orchestrator
/// lives on one thread.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Outcome>;
}
