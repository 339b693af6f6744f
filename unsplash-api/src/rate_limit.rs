use reqwest::header::HeaderMap;

use crate::error::{Error, ErrorKind};
use crate::pagination::header_u32;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Hourly request allowance as last reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

impl RateLimitState {
    /// Replace both counters when the response carries both headers.
    ///
    /// Returns whether the state changed.
    pub fn update_from_headers(&mut self, headers: &HeaderMap) -> bool {
        match (
            header_u32(headers, LIMIT_HEADER),
            header_u32(headers, REMAINING_HEADER),
        ) {
            (Some(limit), Some(remaining)) => {
                self.limit = Some(limit);
                self.remaining = Some(remaining);
                true
            }
            _ => false,
        }
    }

    /// Fails once the known remaining count reaches zero.
    pub fn check(&self) -> Result<(), Error> {
        match self.remaining {
            Some(0) => Err(ErrorKind::RateLimitExceeded(self.limit.unwrap_or(0)).into()),
            _ => Ok(()),
        }
    }
}
