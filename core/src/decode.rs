//! Reduce a JSON response body to a generic mapping.

use std::io::Read;

use serde_json::{Map, Value};

use crate::error::{QuesterError, Result};
use crate::http::HttpResponse;

/// A decoded JSON object.
pub type DecodedBody = Map<String, Value>;

/// Read the whole body of `response` and parse it as a JSON object.
///
/// The body stream is released before this returns, whether decoding
/// succeeds or not. Arrays and scalars at the top level are a `DecodeError`.
///
/// Calling this twice on the same response fails the second time with
/// `DecodeError`: the stream was drained and dropped by the first call.
pub fn decode_json(response: &mut HttpResponse) -> Result<DecodedBody> {
    let mut reader = response
        .take_body()
        .ok_or_else(|| QuesterError::DecodeError("body already consumed".to_string()))?;

    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| QuesterError::DecodeError(format!("reading body: {e}")))?;
    drop(reader);

    log::debug!("decoding {} byte body (status {})", data.len(), response.status());

    match serde_json::from_slice::<Value>(&data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(QuesterError::DecodeError(format!(
            "expected a JSON object, found {}",
            kind_of(&other)
        ))),
        Err(e) => Err(QuesterError::DecodeError(e.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use super::*;

    fn response(body: &str) -> HttpResponse {
        HttpResponse::from_bytes(200, Vec::new(), body)
    }

    #[test]
    fn object_body_decodes_to_map() {
        let map = decode_json(&mut response(r#"{"id":1}"#)).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["id"], json!(1));
    }

    #[test]
    fn nested_values_are_preserved() {
        let body = r#"{"user":{"name":"a","tags":["x",null]},"ok":true,"score":1.5}"#;
        let map = decode_json(&mut response(body)).unwrap();
        assert_eq!(map["user"]["tags"], json!(["x", null]));
        assert_eq!(map["ok"], json!(true));
        assert_eq!(map["score"], json!(1.5));
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = decode_json(&mut response("[1,2,3]")).unwrap_err();
        match err {
            QuesterError::DecodeError(msg) => assert!(msg.contains("array"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalars_are_rejected() {
        for body in ["1", "\"text\"", "null", "true"] {
            let err = decode_json(&mut response(body)).unwrap_err();
            assert!(matches!(err, QuesterError::DecodeError(_)), "{body}");
        }
    }

    #[test]
    fn invalid_json_is_rejected() {
        for body in ["", "not json", "{\"id\":"] {
            let err = decode_json(&mut response(body)).unwrap_err();
            assert!(matches!(err, QuesterError::DecodeError(_)), "{body:?}");
        }
    }

    #[test]
    fn second_decode_fails_with_decode_error() {
        let mut resp = response(r#"{"id":1}"#);
        decode_json(&mut resp).unwrap();
        assert!(resp.is_consumed());
        let err = decode_json(&mut resp).unwrap_err();
        assert!(matches!(err, QuesterError::DecodeError(ref m) if m == "body already consumed"));
    }

    #[test]
    fn body_is_released_even_when_decoding_fails() {
        let mut resp = response("[]");
        assert!(decode_json(&mut resp).is_err());
        assert!(resp.is_consumed());
    }

    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    #[test]
    fn read_failure_is_a_decode_error() {
        let mut resp = HttpResponse::new(200, Vec::new(), Broken);
        let err = decode_json(&mut resp).unwrap_err();
        assert!(matches!(err, QuesterError::DecodeError(ref m) if m.contains("reset by peer")));
    }
}
