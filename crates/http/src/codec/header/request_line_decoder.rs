//! Decoder for the request line, `<METHOD> <target> HTTP/1.1\r\n`.
//!
//! Unlike header lines, the request line is only decoded once it has fully
//! arrived; a partial line consumes nothing.

use http::{Method, Version};
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, RequestLine};
use crate::utils::find_crlf;

/// The only protocol version accepted on the request line.
const HTTP_11: &[u8] = b"HTTP/1.1";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLineDecoder;

impl RequestLineDecoder {
    /// Decodes the request line at the start of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((line, n)))` with `n` the bytes consumed, CRLF included
    /// - `Ok(None)` if the line hasn't fully arrived yet
    /// - `Err(ParseError)` if the line is malformed
    pub fn decode(&mut self, src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
        let Some(index) = find_crlf(src) else {
            return Ok(None);
        };

        let parts = src[..index].split(|b| *b == b' ').collect::<Vec<_>>();
        let [method, target, version] = parts[..] else {
            return Err(ParseError::invalid_request_line(parts.len()));
        };

        let method = parse_method(method)?;

        ensure!(target.starts_with(b"/"), ParseError::invalid_target(String::from_utf8_lossy(target)));
        let target = String::from_utf8(target.to_vec()).map_err(|e| ParseError::invalid_target(String::from_utf8_lossy(e.as_bytes())))?;

        ensure!(version == HTTP_11, ParseError::unsupported_version(String::from_utf8_lossy(version)));

        trace!(method = %method, target = %target, "parsed request line");
        Ok(Some((RequestLine::new(method, target, Version::HTTP_11), index + 2)))
    }
}

fn parse_method(method: &[u8]) -> Result<Method, ParseError> {
    let method = match method {
        b"GET" => Method::GET,
        b"POST" => Method::POST,
        b"PUT" => Method::PUT,
        b"PATCH" => Method::PATCH,
        b"DELETE" => Method::DELETE,
        b"HEAD" => Method::HEAD,
        b"OPTIONS" => Method::OPTIONS,
        b"CONNECT" => Method::CONNECT,
        b"TRACE" => Method::TRACE,
        other => return Err(ParseError::unsupported_method(String::from_utf8_lossy(other))),
    };
    Ok(method)
}
