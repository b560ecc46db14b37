//! Request execution.
//!
//! # Design
//! `Quester` holds only its transport and carries no mutable state between
//! calls. Execution is split in two: `build_request` turns a method, URL and
//! optional body descriptor into an `HttpRequest` without touching the
//! network, and the transport performs it. Keeping the assembly step pure
//! makes the header rules testable on their own.

use crate::body::BodyDescriptor;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// Synchronous, stateless request executor over an injected transport.
#[derive(Debug, Clone, Default)]
pub struct Quester<T = UreqTransport> {
    transport: T,
}

impl<T: Transport> Quester<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and return the response with its body unread.
    ///
    /// Any status code is a successful outcome; only transport failures
    /// produce `RequestError`.
    pub fn execute(&self, method: HttpMethod, url: &str, body: Option<BodyDescriptor>) -> Result<HttpResponse> {
        let request = build_request(method, url, body);
        log::debug!(
            "{} {} ({} headers, {} body bytes)",
            request.method,
            request.url,
            request.headers.len(),
            request.body.as_ref().map_or(0, Vec::len)
        );
        let response = self.transport.perform(request)?;
        log::debug!("{method} {url} -> {}", response.status());
        Ok(response)
    }

    pub fn get(&self, url: &str, body: Option<BodyDescriptor>) -> Result<HttpResponse> {
        self.execute(HttpMethod::Get, url, body)
    }

    pub fn post(&self, url: &str, body: Option<BodyDescriptor>) -> Result<HttpResponse> {
        self.execute(HttpMethod::Post, url, body)
    }
}

/// Assemble the request a transport will send.
///
/// With no body, or an empty descriptor, the request carries neither a body
/// nor extra headers. Otherwise `Content-Type` is set from the descriptor and
/// the descriptor's headers are applied in order, each replacing any earlier
/// value of the same name, `Content-Type` included.
pub fn build_request(method: HttpMethod, url: &str, body: Option<BodyDescriptor>) -> HttpRequest {
    let mut request = HttpRequest::new(method, url);

    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return request;
    };

    let (content_type, payload, headers) = body.into_parts();
    request.set_header("Content-Type", &content_type);
    for pair in &headers {
        request.set_header(&pair.key, &pair.value);
    }
    request.body = Some(payload);
    request
}
