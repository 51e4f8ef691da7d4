//! Network access over reqwest.

use async_trait::async_trait;
use reqwest::Client;
use url::{Origin, Url};

use crate::Result;
use crate::traits::Fetcher;
use crate::types::{Request, RequestMode, Response, ResponseType};

/// [`Fetcher`] backed by a shared [`reqwest::Client`].
///
/// Responses whose final URL (after redirects) shares the application
/// scope's origin are classified [`ResponseType::Basic`]; everything else is
/// [`ResponseType::Cors`], or [`ResponseType::Opaque`] for `no-cors`
/// requests. Failure statuses are returned as responses, not errors.
#[derive(Clone)]
pub struct ReqwestFetcher {
    http: Client,
    origin: Origin,
}

impl ReqwestFetcher {
    /// Create a fetcher for an application served from `scope`.
    pub fn new(scope: &Url) -> Self {
        Self::with_client(Client::new(), scope)
    }

    /// Create a fetcher reusing an existing client (timeouts, proxies, TLS).
    pub fn with_client(http: Client, scope: &Url) -> Self {
        Self {
            http,
            origin: scope.origin(),
        }
    }

    fn classify(&self, request: &Request, final_url: &Url) -> ResponseType {
        if final_url.origin() == self.origin {
            ResponseType::Basic
        } else if request.mode() == RequestMode::NoCors {
            ResponseType::Opaque
        } else {
            ResponseType::Cors
        }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;

        let status = response.status();
        let response_type = self.classify(request, response.url());
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            response_type,
        })
    }
}
