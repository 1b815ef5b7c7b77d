//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe requests and responses as plain data. The orchestrator
//! builds an `HttpRequest` for every firing and interprets an `Outcome` once
//! the host reports how the round-trip went. It never touches the network.
//!
//! The body carries its own encoding mode. A `UrlEncoded` body is sent with
//! standard serialization and the standard form content type. A `Multipart`
//! body is sent raw: no content type is attached up front, so the field set's
//! boundary encoding decides it at send time.

use uuid::Uuid;

use crate::csrf::CSRF_HEADER;
use crate::payload::FieldSet;

/// Content type attached to standard-serialized bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// HTTP method for a request. The orchestrator only ever posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// How the transport should treat the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Serialize as a URL-encoded string with the standard content type.
    Standard,
    /// Leave content type and serialization to the body itself.
    Raw,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    UrlEncoded(String),
    Multipart(FieldSet),
}

impl RequestBody {
    pub fn encoding(&self) -> BodyEncoding {
        match self {
            RequestBody::UrlEncoded(_) => BodyEncoding::Standard,
            RequestBody::Multipart(_) => BodyEncoding::Raw,
        }
    }

    /// Produce wire bytes and the content type that goes with them.
    ///
    /// Multipart bodies get a fresh random boundary on every call.
    pub fn encode(&self) -> EncodedBody {
        match self {
            RequestBody::UrlEncoded(body) => EncodedBody {
                content_type: FORM_URLENCODED.to_string(),
                bytes: body.clone().into_bytes(),
            },
            RequestBody::Multipart(fields) => {
                let boundary = format!("----ajax-helper-{}", Uuid::new_v4().simple());
                EncodedBody {
                    content_type: format!("multipart/form-data; boundary={boundary}"),
                    bytes: fields.encode_multipart(&boundary),
                }
            }
        }
    }
}

/// A body ready to be written to the wire.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An HTTP request described as plain data.
///
/// Built once per firing. The host executes it and reports back an `Outcome`
/// through `Firing::resolve`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// The resolved route. Empty when neither the caller nor the element
    /// supplied one; the transport is expected to fail such a request.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub cache: bool,
    pub encoding: BodyEncoding,
}

impl HttpRequest {
    pub(crate) fn post(path: String, token: &str, body: RequestBody, cache: bool) -> Self {
        let encoding = body.encoding();
        let mut headers = vec![(CSRF_HEADER.to_string(), token.to_string())];
        if encoding == BodyEncoding::Standard {
            headers.push(("content-type".to_string(), FORM_URLENCODED.to_string()));
        }
        Self {
            method: HttpMethod::Post,
            path,
            headers,
            body,
            cache,
            encoding,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Hosts that get a status-bearing response back can convert it into an
/// `Outcome` instead of classifying it themselves.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// How one round-trip ended, as far as the orchestrator cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { body: String },
    /// `reason` is traced for diagnostics but never handed to `on_error`.
    Failure { reason: String },
}

impl Outcome {
    pub fn success(body: impl Into<String>) -> Self {
        Outcome::Success { body: body.into() }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            reason: reason.into(),
        }
    }
}

impl From<HttpResponse> for Outcome {
    /// 2xx and 304 count as success; every other status is a failure.
    fn from(response: HttpResponse) -> Self {
        if (200..300).contains(&response.status) || response.status == 304 {
            Outcome::Success {
                body: response.body,
            }
        } else {
            Outcome::Failure {
                reason: format!("HTTP {}", response.status),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn standard_request_carries_form_content_type() {
        let req = HttpRequest::post(
            "/like".to_string(),
            "tok",
            RequestBody::UrlEncoded("id=5".to_string()),
            false,
        );
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.encoding, BodyEncoding::Standard);
        assert_eq!(req.header("X-CSRF-Token"), Some("tok"));
        assert_eq!(req.header("Content-Type"), Some(FORM_URLENCODED));
    }

    #[test]
    fn raw_request_has_no_content_type() {
        let req = HttpRequest::post(
            "/save".to_string(),
            "",
            RequestBody::Multipart(FieldSet::new()),
            true,
        );
        assert_eq!(req.encoding, BodyEncoding::Raw);
        assert_eq!(req.header("x-csrf-token"), Some(""));
        assert!(req.header("content-type").is_none());
        assert!(req.cache);
    }

    #[test]
    fn multipart_encoding_names_its_boundary() {
        let mut fields = FieldSet::new();
        fields.append("a", "1");
        let encoded = RequestBody::Multipart(fields).encode();
        let boundary = encoded
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = String::from_utf8(encoded.bytes).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn success_statuses_map_to_success() {
        assert_eq!(Outcome::from(response(200, "ok")), Outcome::success("ok"));
        assert_eq!(Outcome::from(response(204, "")), Outcome::success(""));
        assert_eq!(Outcome::from(response(304, "")), Outcome::success(""));
    }

    #[test]
    fn error_statuses_map_to_failure() {
        assert!(matches!(Outcome::from(response(404, "")), Outcome::Failure { .. }));
        assert_eq!(
            Outcome::from(response(500, "boom")),
            Outcome::failure("HTTP 500")
        );
    }
}
