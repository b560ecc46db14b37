//! HTTP request and response types exchanged with a transport.
//!
//! # Design
//! `HttpRequest` is plain data: the executor assembles it and a `Transport`
//! puts it on the wire. `HttpResponse` is the one value that owns a live
//! resource, the body stream. The stream sits behind an `Option` so it can be
//! taken exactly once; dropping the response releases it on every path.

use std::fmt;
use std::io::{Cursor, Read};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `build_request`. Header names are unique (compared ASCII
/// case-insensitively); `set_header` keeps them that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set `key` to `value`, replacing any earlier value for the same name.
    pub fn set_header(&mut self, key: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response handed back by a transport.
///
/// Owns the body stream. `decode_json` (or `take_body`) moves the stream out;
/// afterwards `is_consumed` is true and further reads see no body.
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<Box<dyn Read + Send>>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            headers,
            body: Some(Box::new(body)),
        }
    }

    /// Response whose body is an in-memory buffer.
    pub fn from_bytes(status: u16, headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, headers, Cursor::new(body.into()))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive lookup of the first header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_consumed(&self) -> bool {
        self.body.is_none()
    }

    /// Move the body stream out of the response. Returns `None` once taken.
    pub fn take_body(&mut self) -> Option<Box<dyn Read + Send>> {
        self.body.take()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_overwrites_case_insensitively() {
        let mut req = HttpRequest::new(HttpMethod::Post, "http://localhost/");
        req.set_header("X-Token", "1");
        req.set_header("x-token", "2");
        assert_eq!(req.headers, vec![("X-Token".to_string(), "2".to_string())]);
        assert_eq!(req.header("X-TOKEN"), Some("2"));
    }

    #[test]
    fn set_header_keeps_first_insertion_order() {
        let mut req = HttpRequest::new(HttpMethod::Get, "http://localhost/");
        req.set_header("A", "1");
        req.set_header("B", "1");
        req.set_header("A", "3");
        let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn take_body_only_once() {
        let mut resp = HttpResponse::from_bytes(200, Vec::new(), "{}");
        assert!(!resp.is_consumed());
        assert!(resp.take_body().is_some());
        assert!(resp.is_consumed());
        assert!(resp.take_body().is_none());
    }

    #[test]
    fn is_success_covers_2xx_only() {
        assert!(HttpResponse::from_bytes(204, Vec::new(), "").is_success());
        assert!(!HttpResponse::from_bytes(301, Vec::new(), "").is_success());
        assert!(!HttpResponse::from_bytes(404, Vec::new(), "").is_success());
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let resp = HttpResponse::from_bytes(
            200,
            vec![("content-type".to_string(), "application/json".to_string())],
            "",
        );
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
    }
}
