//! HTTP request decoder module
//!
//! This module provides the incremental request parser. It is a forward-only
//! state machine that is fed whatever bytes have arrived so far and reports
//! how many it consumed:
//!
//! ```text
//! RequestLine -> Headers -> Body -> Done
//!                       \___________/   (no or zero Content-Length)
//! ```
//!
//! - the request line is decoded by [`RequestLineDecoder`] once it fully arrived
//! - headers are decoded line by line by [`HeaderDecoder`]
//! - a Content-Length body is collected by [`LengthDecoder`]
//!
//! # Example
//!
//! ```
//! use raw_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHo"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"st: localhost\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.headers().get("host").unwrap(), "localhost");
//! ```

use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::LengthDecoder;
use crate::codec::header::{HeaderDecoder, RequestLineDecoder};
use crate::ensure;
use crate::protocol::{Headers, ParseError, Request, RequestLine};

/// Where the decoder is in the request.
#[derive(Debug)]
enum ParserState {
    RequestLine,
    Headers,
    Body(LengthDecoder),
    Done,
}

impl ParserState {
    fn stage(&self) -> &'static str {
        match self {
            ParserState::RequestLine => "request line",
            ParserState::Headers => "headers",
            ParserState::Body(_) => "body",
            ParserState::Done => "done",
        }
    }
}

/// Incremental decoder for a single HTTP/1.1 request.
///
/// [`RequestDecoder::parse`] can be called with arbitrarily split input; it
/// never consumes a byte twice, and a call that consumes nothing means more
/// data is needed. The decoder also implements [`Decoder`], advancing a
/// `BytesMut` past the consumed bytes and yielding the [`Request`] once it is
/// complete.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParserState,
    request_line: Option<RequestLine>,
    headers: Headers,
    body: Bytes,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Feeds `data` to the state machine until it stops making progress or
    /// the request is complete.
    ///
    /// Returns the number of bytes consumed from the front of `data`.
    ///
    /// # Errors
    ///
    /// Any malformed part of the request, or [`ParseError::InvalidState`] if
    /// the request was already complete.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        ensure!(!self.is_done(), ParseError::InvalidState);

        let mut parsed = 0;
        while !self.is_done() {
            let n = self.parse_step(&data[parsed..])?;
            if n == 0 {
                break;
            }
            parsed += n;
        }

        Ok(parsed)
    }

    /// Returns true once the whole request has been parsed.
    pub fn is_done(&self) -> bool {
        matches!(self.state, ParserState::Done)
    }

    /// Name of the part of the request currently being parsed.
    pub fn stage(&self) -> &'static str {
        self.state.stage()
    }

    /// Takes the parsed request out of a finished decoder.
    pub fn take_request(&mut self) -> Option<Request> {
        if !self.is_done() {
            return None;
        }

        let line = self.request_line.take()?;
        Some(Request::new(line, mem::take(&mut self.headers), mem::take(&mut self.body)))
    }

    fn parse_step(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::RequestLine => {
                let Some((line, n)) = RequestLineDecoder.decode(data)? else {
                    return Ok(0);
                };

                self.request_line = Some(line);
                self.state = ParserState::Headers;
                Ok(n)
            }

            ParserState::Headers => {
                let (n, done) = HeaderDecoder.decode(data, &mut self.headers)?;
                if done {
                    self.state = self.body_state()?;
                }
                Ok(n)
            }

            ParserState::Body(ref mut length_decoder) => {
                let (n, done) = length_decoder.decode(data)?;
                if done {
                    if let ParserState::Body(length_decoder) = mem::replace(&mut self.state, ParserState::Done) {
                        self.body = length_decoder.into_body();
                    }
                }
                Ok(n)
            }

            ParserState::Done => Err(ParseError::InvalidState),
        }
    }

    /// Decides how the body is read once the headers are complete.
    ///
    /// A missing or zero Content-Length means there is no body, any bytes
    /// after the headers are not part of this request.
    fn body_state(&self) -> Result<ParserState, ParseError> {
        let Some(value) = self.headers.value("content-length") else {
            trace!("no content-length, request has no body");
            return Ok(ParserState::Done);
        };

        ensure!(!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()), ParseError::invalid_content_length(value));
        let length = value.parse::<usize>().map_err(|_e| ParseError::invalid_content_length(value))?;

        if length == 0 {
            return Ok(ParserState::Done);
        }

        trace!(length, "reading body");
        Ok(ParserState::Body(LengthDecoder::new(length)))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: ParserState::RequestLine, request_line: None, headers: Headers::new(), body: Bytes::new() }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let parsed = self.parse(src)?;
        src.advance(parsed);
        Ok(self.take_request())
    }

    /// The stream ended: either the buffered bytes complete the request or
    /// the request is incomplete.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None => Err(ParseError::incomplete(self.stage())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use indoc::indoc;

    fn crlf(str: &str) -> String {
        str.replace('\n', "\r\n")
    }

    #[test]
    fn from_curl() {
        let str = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let mut buf = BytesMut::from(str.as_str());
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/index.html");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host").unwrap(), "127.0.0.1:8080");
        assert_eq!(request.headers().get("user-agent").unwrap(), "curl/7.79.1");
        assert_eq!(request.headers().get("accept").unwrap(), "*/*");
        assert!(request.body().is_empty());
    }

    #[test]
    fn byte_by_byte() {
        let src = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        for (i, b) in src.iter().enumerate() {
            buf.extend_from_slice(&[*b]);
            let result = decoder.decode(&mut buf).unwrap();
            if i + 1 < src.len() {
                assert!(result.is_none(), "finished early at byte {i}");
            } else {
                assert_eq!(&result.unwrap().body()[..], b"hello");
            }
        }
    }

    #[test]
    fn parse_reports_consumed_bytes() {
        let mut decoder = RequestDecoder::new();

        assert_eq!(decoder.parse(b"GET / HTTP").unwrap(), 0);
        assert_eq!(decoder.stage(), "request line");

        assert_eq!(decoder.parse(b"GET / HTTP/1.1\r\nHost: a\r\nAcc").unwrap(), 25);
        assert_eq!(decoder.stage(), "headers");

        assert_eq!(decoder.parse(b"Accept: */*\r\n\r\n").unwrap(), 15);
        assert!(decoder.is_done());
    }

    #[test]
    fn body_with_content_length() {
        let mut buf = BytesMut::from(&b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n"[..]);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"hello world!\n");
    }

    #[test]
    fn zero_content_length_ignores_trailing_bytes() {
        let mut buf = BytesMut::from(&b"POST /submit HTTP/1.1\r\nContent-Length: 0\r\n\r\nnot a body"[..]);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert!(request.body().is_empty());
        assert_eq!(&buf[..], b"not a body");
    }

    #[test]
    fn missing_content_length_ignores_trailing_bytes() {
        let mut buf = BytesMut::from(&b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\nnot a body"[..]);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert!(request.body().is_empty());
    }

    #[test]
    fn body_longer_than_content_length() {
        let mut buf = BytesMut::from(&b"POST /submit HTTP/1.1\r\nContent-Length: 12\r\n\r\nhello world!\n"[..]);
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::BodyTooLarge { declared: 12, received: 13 })));
    }

    #[test]
    fn short_body_is_incomplete_at_eof() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"POST /submit HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content"[..]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        let result = decoder.decode_eof(&mut buf);

        assert!(matches!(result, Err(ParseError::IncompleteRequest { stage: "body" })));
    }

    #[test]
    fn missing_end_of_headers_is_incomplete_at_eof() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n"[..]);
        let result = RequestDecoder::new().decode_eof(&mut buf);

        assert!(matches!(result, Err(ParseError::IncompleteRequest { stage: "headers" })));
    }

    #[test]
    fn invalid_content_length() {
        for value in ["abc", "-1", "+5", "1 2", "5, 5"] {
            let src = format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\n");
            let mut buf = BytesMut::from(src.as_str());
            let result = RequestDecoder::new().decode(&mut buf);
            assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })), "{value} should be rejected");
        }
    }

    #[test]
    fn malformed_header() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost localhost:42069\r\n\r\n"[..]);
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(result.unwrap_err().is_header());
    }

    #[test]
    fn parse_after_done() {
        let mut decoder = RequestDecoder::new();
        decoder.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(decoder.is_done());

        assert!(matches!(decoder.parse(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::InvalidState)));
    }

    #[test]
    fn take_request_only_once() {
        let mut decoder = RequestDecoder::new();
        assert!(decoder.take_request().is_none());

        decoder.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(decoder.take_request().is_some());
        assert!(decoder.take_request().is_none());
    }
}
