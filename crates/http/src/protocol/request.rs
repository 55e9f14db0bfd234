//! Parsed HTTP request types.
//!
//! A [`Request`] only comes into existence once the
//! [`RequestDecoder`](crate::codec::RequestDecoder) has seen the whole
//! message, so every value of this type is complete and immutable.

use bytes::Bytes;
use http::{Method, Version};

use crate::protocol::Headers;

/// The first line of a request: `<METHOD> <target> HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: Version,
}

impl RequestLine {
    pub(crate) fn new(method: Method, target: String, version: Version) -> Self {
        Self { method, target, version }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target, always starting with `/`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The version number without the `HTTP/` prefix, e.g. `1.1`.
    pub fn version_str(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_2 => "2",
            Version::HTTP_3 => "3",
            _ => "1.1",
        }
    }
}

/// A fully parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.line
    }

    pub fn method(&self) -> &Method {
        self.line.method()
    }

    pub fn target(&self) -> &str {
        self.line.target()
    }

    pub fn version(&self) -> Version {
        self.line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Splits the request into its parts.
    pub fn into_parts(self) -> (RequestLine, Headers, Bytes) {
        (self.line, self.headers, self.body)
    }
}
