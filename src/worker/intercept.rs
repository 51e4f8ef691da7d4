//! Request interception.
//!
//! GET requests to an API host are served network-first; every other GET
//! is served cache-first. Non-GET requests, and any request arriving
//! before activation, pass through untouched.
//!
//! # Cache writes
//!
//! A fresh response is cloned; the clone goes to the cache and the original
//! goes back to the caller. In [`CacheWriteMode::Background`] the write is
//! spawned and the response returns immediately, so an identical request
//! racing right behind it can still miss the cache. Call
//! [`OfflineCacheController::flush`] to wait for outstanding writes.

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info, warn};

use super::controller::OfflineCacheController;
use super::state::FetchOutcome;
use super::strategy::Strategy;
use crate::config::CacheWriteMode;
use crate::telemetry;
use crate::types::{Request, Response};
use crate::{Result, StowawayError};

impl OfflineCacheController {
    /// Decide how to answer an outgoing request.
    ///
    /// Returns `Err(StowawayError::NoResponse)` when a cache-first request
    /// fails on the network and no fallback applies.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome> {
        if *request.method() != Method::GET {
            return Ok(FetchOutcome::Passthrough);
        }
        if !self.state().can_intercept_fetch() {
            debug!(url = %request.url(), state = %self.state(), "not active, passing through");
            return Ok(FetchOutcome::Passthrough);
        }

        let response = match Strategy::for_request(request, &self.settings.api_hosts) {
            Strategy::NetworkFirst => self.network_first(request).await?,
            Strategy::CacheFirst => self.cache_first(request).await?,
        };
        Ok(FetchOutcome::Respond(response))
    }

    async fn network_first(&self, request: &Request) -> Result<Response> {
        let strategy = Strategy::NetworkFirst;
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if strategy.is_cacheable(&response) {
                    self.store_copy(request, &response).await;
                }
                Ok(response)
            }
            Err(e) => {
                debug!(url = %request.url(), error = %e, "API fetch failed, trying cache");
                if let Some(cached) = self.lookup(request, strategy).await? {
                    info!(url = %request.url(), "serving cached API response");
                    metrics::counter!(telemetry::OFFLINE_FALLBACKS_TOTAL, "kind" => "cached")
                        .increment(1);
                    return Ok(cached);
                }
                metrics::counter!(telemetry::OFFLINE_FALLBACKS_TOTAL, "kind" => "synthesized")
                    .increment(1);
                Ok(Response::offline())
            }
        }
    }

    async fn cache_first(&self, request: &Request) -> Result<Response> {
        let strategy = Strategy::CacheFirst;
        match self.lookup(request, strategy).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) if request.is_navigation() => {
                warn!(url = %request.url(), error = %e, "cache lookup failed, serving offline document");
                return self.offline_document(request).await;
            }
            Err(e) => return Err(e),
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if strategy.is_cacheable(&response) {
                    self.store_copy(request, &response).await;
                } else {
                    debug!(
                        url = %request.url(),
                        status = response.status,
                        "response not cacheable"
                    );
                }
                Ok(response)
            }
            Err(e) if request.is_navigation() => {
                debug!(url = %request.url(), error = %e, "navigation failed, serving offline document");
                self.offline_document(request).await
            }
            Err(e) => {
                debug!(url = %request.url(), error = %e, "fetch failed with no fallback");
                Err(StowawayError::NoResponse(request.url().to_string()))
            }
        }
    }

    /// Answer a navigation with the cached offline document.
    async fn offline_document(&self, request: &Request) -> Result<Response> {
        let fallback = Request::get_url(self.settings.offline_document.clone());
        match self.caches.match_request(&self.settings.version, &fallback).await? {
            Some(document) => {
                metrics::counter!(telemetry::OFFLINE_FALLBACKS_TOTAL, "kind" => "offline_document")
                    .increment(1);
                Ok(document)
            }
            None => Err(StowawayError::NoResponse(request.url().to_string())),
        }
    }

    /// Look `request` up in the current generation, counting hits and misses.
    async fn lookup(&self, request: &Request, strategy: Strategy) -> Result<Option<Response>> {
        let found = self
            .caches
            .match_request(&self.settings.version, request)
            .await?;
        let metric = if found.is_some() {
            telemetry::CACHE_HITS_TOTAL
        } else {
            telemetry::CACHE_MISSES_TOTAL
        };
        metrics::counter!(metric, "strategy" => strategy.as_str()).increment(1);
        Ok(found)
    }

    /// Store a copy of `response` for `request` in the current generation.
    ///
    /// Write failures are logged, never surfaced to the caller.
    async fn store_copy(&self, request: &Request, response: &Response) {
        let caches = Arc::clone(&self.caches);
        let generation = self.settings.version.clone();
        let request = request.clone();
        let copy = response.clone();

        let write = async move {
            match caches.put(&generation, &request, copy).await {
                Ok(()) => metrics::counter!(telemetry::CACHE_WRITES_TOTAL).increment(1),
                Err(e) => warn!(url = %request.url(), error = %e, "cache write failed"),
            }
        };

        match self.settings.write_mode {
            CacheWriteMode::Await => write.await,
            CacheWriteMode::Background => self.pending.spawn(write).await,
        }
    }
}
