//! Decoder implementation for request bodies with a Content-Length header.
//!
//! The body is collected in full, as defined in
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// A decoder that accumulates a body of known length.
///
/// Every byte it is given belongs to the body; receiving more than the
/// declared length is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The length declared by the Content-Length header
    length: usize,
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a new `LengthDecoder` for a body of `length` bytes.
    pub fn new(length: usize) -> Self {
        Self { length, body: BytesMut::new() }
    }

    /// Appends all of `src` to the body.
    ///
    /// # Returns
    /// * `Ok((src.len(), true))` once the body has reached the declared length
    /// * `Ok((src.len(), false))` when more data is needed
    /// * `Err(ParseError::BodyTooLarge)` if the body would exceed the declared length
    pub fn decode(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        let received = self.body.len() + src.len();
        ensure!(received <= self.length, ParseError::body_too_large(self.length, received));

        self.body.extend_from_slice(src);
        trace!(received, declared = self.length, "read body bytes");
        Ok((src.len(), received == self.length))
    }

    /// Consumes the decoder, returning the collected body.
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}
