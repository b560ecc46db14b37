//! Convenience helpers over a blocking HTTP client.
//!
//! # Overview
//! Three steps, each usable on its own:
//! 1. `build` encodes a payload into a `BodyDescriptor` (JSON only).
//! 2. `Quester::execute` sends one request through a `Transport` and returns
//!    the response with its body unread.
//! 3. `decode_json` drains the body into a generic JSON object.
//!
//! # Design
//! - Nothing is global: the transport is owned by the `Quester` value the
//!   caller creates, and `UreqTransport` is only the default.
//! - Payloads are any `T: Serialize`, checked at compile time.
//! - Every failure is a `QuesterError`; non-2xx statuses are not failures.
//!
//! ```no_run
//! use quester_core::{build, decode_json, HeaderPair, Quester};
//!
//! # fn main() -> quester_core::Result<()> {
//! let quester: Quester = Quester::default();
//! let body = build("json", &serde_json::json!({"title": "Hello"}), Some(vec![HeaderPair::new("X-Trace", "1")]))?;
//! let mut response = quester.post("https://jsonplaceholder.typicode.com/posts", Some(body))?;
//! let data = decode_json(&mut response)?;
//! println!("{data:?}");
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
mod finite;
pub mod http;
pub mod transport;

pub use body::{build, BodyDescriptor, BodyKind, HeaderPair, JSON_CONTENT_TYPE};
pub use client::{build_request, Quester};
pub use config::TransportConfig;
pub use decode::{decode_json, DecodedBody};
pub use error::{QuesterError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
