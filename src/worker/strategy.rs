//! Serving strategy selection.

use crate::types::{Request, Response, ResponseType};

/// How a GET request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Network, then the cached copy, then a synthesized 503. Used for API hosts.
    NetworkFirst,
    /// Cache, then network. Used for everything else.
    CacheFirst,
}

impl Strategy {
    /// Pick the strategy for `request` by its target host.
    pub fn for_request(request: &Request, api_hosts: &[String]) -> Self {
        match request.host() {
            Some(host) if api_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) => {
                Strategy::NetworkFirst
            }
            _ => Strategy::CacheFirst,
        }
    }

    /// Whether a fresh network response may be stored under this strategy.
    ///
    /// Both strategies require a 200. Cache-first additionally requires a
    /// same-origin `basic` response.
    pub fn is_cacheable(&self, response: &Response) -> bool {
        match self {
            Strategy::NetworkFirst => response.status == 200,
            Strategy::CacheFirst => {
                response.status == 200 && response.response_type == ResponseType::Basic
            }
        }
    }

    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::NetworkFirst => "network_first",
            Strategy::CacheFirst => "cache_first",
        }
    }
}
