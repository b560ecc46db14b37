//! Request body descriptors.
//!
//! # Design
//! A `BodyDescriptor` bundles the encoded payload with its content type and
//! any extra headers the caller wants sent alongside it. Fields are private:
//! the only way to get a non-empty descriptor is through `build` or
//! `BodyDescriptor::json`, so a payload never travels without a content type.
//! `BodyDescriptor::default()` is the empty descriptor and behaves exactly
//! like passing no body at all.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuesterError, Result};
use crate::finite;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Supported body encodings. Parsed case-insensitively from a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
}

impl BodyKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyKind::Json => JSON_CONTENT_TYPE,
        }
    }
}

impl FromStr for BodyKind {
    type Err = QuesterError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("json") {
            Ok(BodyKind::Json)
        } else {
            Err(QuesterError::UnsupportedBodyKind(s.to_string()))
        }
    }
}

/// A single header to send with a body. Duplicates are allowed here; the
/// last one wins when the request is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPair {
    pub key: String,
    pub value: String,
}

impl HeaderPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for HeaderPair {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Encoded request body plus the headers that travel with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyDescriptor {
    content_type: String,
    payload: Vec<u8>,
    headers: Vec<HeaderPair>,
}

impl BodyDescriptor {
    /// Encode `payload` as JSON.
    ///
    /// Fails with `SerializationError` for non-finite floats, map keys that
    /// are not strings or integers, or a `Serialize` impl that reports an
    /// error. Integer keys are written as JSON strings.
    pub fn json<T: Serialize + ?Sized>(payload: &T, headers: Option<Vec<HeaderPair>>) -> Result<Self> {
        finite::check(payload).map_err(|e| QuesterError::SerializationError(e.to_string()))?;
        let payload = serde_json::to_vec(payload).map_err(|e| QuesterError::SerializationError(e.to_string()))?;
        let headers = headers.unwrap_or_default();
        log::debug!("built json body: {} bytes, {} headers", payload.len(), headers.len());
        Ok(Self {
            content_type: BodyKind::Json.content_type().to_string(),
            payload,
            headers,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn headers(&self) -> &[HeaderPair] {
        &self.headers
    }

    /// True for the empty descriptor, which sends nothing.
    pub fn is_empty(&self) -> bool {
        self.content_type.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>, Vec<HeaderPair>) {
        (self.content_type, self.payload, self.headers)
    }
}

/// Build a body descriptor of the given `kind` from `payload`.
///
/// `kind` is matched case-insensitively. Only `"json"` is supported; any
/// other tag yields `UnsupportedBodyKind`.
pub fn build<T: Serialize + ?Sized>(
    kind: &str,
    payload: &T,
    headers: Option<Vec<HeaderPair>>,
) -> Result<BodyDescriptor> {
    match kind.parse::<BodyKind>()? {
        BodyKind::Json => BodyDescriptor::json(payload, headers),
    }
}
