//! Incremental decoder for header lines.
//!
//! Each call handles at most one `\r\n` terminated line, so the caller can
//! feed whatever bytes it has and come back with more when the decoder
//! reports that nothing was consumed.
//!
//! # Rules
//!
//! - A line without a colon is rejected
//! - No whitespace is allowed between the field name and the colon
//! - Field names are trimmed, lower-cased and must be RFC 7230 tokens
//! - Values are trimmed
//! - A repeated field is merged into the existing value as `"old, new"`

use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError};
use crate::utils::find_crlf;

/// Decoder for the header section of a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Decodes at most one header line from `src` into `headers`.
    ///
    /// # Returns
    ///
    /// - `Ok((0, false))` if `src` doesn't hold a full line yet
    /// - `Ok((n, false))` if a field line of `n` bytes was consumed
    /// - `Ok((n, true))` if the empty line ending the header section was consumed,
    ///   possibly together with the field line right before it
    /// - `Err(ParseError)` if the line is malformed
    pub fn decode(&mut self, src: &[u8], headers: &mut Headers) -> Result<(usize, bool), ParseError> {
        let Some(index) = find_crlf(src) else {
            return Ok((0, false));
        };

        if index == 0 {
            trace!("reached end of headers");
            return Ok((2, true));
        }

        let line = &src[..index];
        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::invalid_header(format!("missing colon in {:?}", String::from_utf8_lossy(line))))?;

        let (name, value) = (&line[..colon], &line[colon + 1..]);
        ensure!(
            !name.last().is_some_and(u8::is_ascii_whitespace),
            ParseError::invalid_header(format!("whitespace between field name and colon: {:?}", String::from_utf8_lossy(name)))
        );

        let name = name.trim_ascii();
        ensure!(!name.is_empty() && name.iter().all(|b| is_token(*b)), ParseError::invalid_field_name(String::from_utf8_lossy(name)));

        // tokens are plain ASCII, so the lossy conversion never replaces anything
        let name = String::from_utf8_lossy(name).to_ascii_lowercase();
        let value = String::from_utf8_lossy(value.trim_ascii()).into_owned();
        trace!(name = %name, value = %value, "parsed header");
        headers.append(name, value);

        if src[index + 2..].starts_with(b"\r\n") {
            return Ok((index + 4, true));
        }

        Ok((index + 2, false))
    }
}

/// Whether `b` belongs to the RFC 7230 `token` character set.
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
