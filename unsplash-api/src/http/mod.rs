//! HTTP client building with middleware.

mod client;
mod logging;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use logging::RequestLogger;
