use std::time::Instant;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use tracing::{debug, warn};

/// Logs every outgoing request and the status it came back with.
///
/// Only the host and path are logged. Query strings can carry authorization
/// codes, so they are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let host = req.url().host_str().unwrap_or_default().to_string();
        let path = req.url().path().to_string();
        let started = Instant::now();

        debug!("--> {} {}{}", method, host, path);
        let result = next.run(req, extensions).await;
        let elapsed = started.elapsed().as_millis();

        match &result {
            Ok(response) => debug!(
                "<-- {} {}{} {} ({} ms)",
                method,
                host,
                path,
                response.status(),
                elapsed
            ),
            Err(e) => warn!("<-- {} {}{} failed after {} ms: {}", method, host, path, elapsed, e),
        }
        result
    }
}
