//! The network seam.
//!
//! # Design
//! `Transport` is the only place I/O happens. The executor hands it a fully
//! assembled `HttpRequest` and gets back an `HttpResponse` whose body is
//! still an unread stream. Implementations must return non-2xx replies as
//! responses, never as errors; only failures to complete the exchange map to
//! `RequestError`.
//!
//! `UreqTransport` is the bundled blocking implementation. Tests substitute
//! their own `Transport` to observe requests without a socket.

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::config::TransportConfig;
use crate::error::{QuesterError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one blocking HTTP exchange.
pub trait Transport: Send + Sync {
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).perform(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Status codes are passed through untouched; a 404 is an `Ok` response.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .user_agent(config.user_agent.as_str())
            .max_redirects(config.max_redirects)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

/// ureq types GET-like methods without a body; the two arms keep both shapes.
enum Builder {
    Bare(RequestBuilder<WithoutBody>),
    Full(RequestBuilder<WithBody>),
}

fn with_headers<B>(mut rb: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (key, value) in headers {
        rb = rb.header(key.as_str(), value.as_str());
    }
    rb
}

impl Transport for UreqTransport {
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let builder = match method {
            HttpMethod::Get => Builder::Bare(self.agent.get(&url)),
            HttpMethod::Head => Builder::Bare(self.agent.head(&url)),
            HttpMethod::Delete => Builder::Bare(self.agent.delete(&url)),
            HttpMethod::Options => Builder::Bare(self.agent.options(&url)),
            HttpMethod::Post => Builder::Full(self.agent.post(&url)),
            HttpMethod::Put => Builder::Full(self.agent.put(&url)),
            HttpMethod::Patch => Builder::Full(self.agent.patch(&url)),
        };

        let outcome = match (builder, body) {
            (Builder::Bare(rb), None) => with_headers(rb, &headers).call(),
            // GET and friends may carry a body when the caller supplies one.
            (Builder::Bare(rb), Some(bytes)) => with_headers(rb.force_send_body(), &headers).send(&bytes[..]),
            (Builder::Full(rb), None) => with_headers(rb, &headers).send_empty(),
            (Builder::Full(rb), Some(bytes)) => with_headers(rb, &headers).send(&bytes[..]),
        };

        let response = outcome.map_err(|e| {
            log::warn!("{method} {url} failed: {e}");
            QuesterError::RequestError(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let reader = response.into_body().into_reader();

        Ok(HttpResponse::new(status, headers, reader))
    }
}
