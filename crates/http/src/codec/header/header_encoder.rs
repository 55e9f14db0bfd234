//! Encoder for the response head: the status line and the header block.
//!
//! Header names are written in the spelling the caller stored them with.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;

use crate::protocol::{Headers, SendError, reason_phrase};
use crate::utils::FastWrite;

/// Initial buffer size reserved for the header block
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for the response head.
///
/// As an `Encoder<StatusCode>` it writes `HTTP/1.1 <code> <reason>\r\n`; the
/// space after the code is written even when the reason phrase is empty. As an
/// `Encoder<&Headers>` it writes every field followed by the blank line ending
/// the head.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<StatusCode> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason_phrase(status))?;
        Ok(())
    }
}

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        encode_fields(headers, dst);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writes `<Name>: <Value>\r\n` for every field, without the closing blank line.
pub(crate) fn encode_fields(headers: &Headers, dst: &mut BytesMut) {
    for (name, value) in headers.iter() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_line(status: StatusCode) -> BytesMut {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(status, &mut dst).unwrap();
        dst
    }

    #[test]
    fn status_lines() {
        assert_eq!(&status_line(StatusCode::OK)[..], b"HTTP/1.1 200 OK\r\n");
        assert_eq!(&status_line(StatusCode::BAD_REQUEST)[..], b"HTTP/1.1 400 Bad Request\r\n");
        assert_eq!(&status_line(StatusCode::UNAUTHORIZED)[..], b"HTTP/1.1 401 Unauthorized\r\n");
        assert_eq!(&status_line(StatusCode::FORBIDDEN)[..], b"HTTP/1.1 403 Forbidden\r\n");
        assert_eq!(&status_line(StatusCode::NOT_FOUND)[..], b"HTTP/1.1 404 Not Found\r\n");
        assert_eq!(&status_line(StatusCode::INTERNAL_SERVER_ERROR)[..], b"HTTP/1.1 500 Internal Server Error\r\n");
    }

    #[test]
    fn unknown_status_keeps_trailing_space() {
        assert_eq!(&status_line(StatusCode::IM_A_TEAPOT)[..], b"HTTP/1.1 418 \r\n");
        assert_eq!(&status_line(StatusCode::from_u16(299).unwrap())[..], b"HTTP/1.1 299 \r\n");
    }

    #[test]
    fn header_block() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&Headers::defaults(12), &mut dst).unwrap();

        assert_eq!(&dst[..], b"Connection: close\r\nContent-Length: 12\r\nContent-Type: text/plain\r\n\r\n");
    }

    #[test]
    fn empty_header_block() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&Headers::new(), &mut dst).unwrap();

        assert_eq!(&dst[..], b"\r\n");
    }

    #[test]
    fn caller_spelling_is_kept() {
        let mut headers = Headers::new();
        headers.set("X-Custom-HEADER", "yes");

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&headers, &mut dst).unwrap();

        assert_eq!(&dst[..], b"X-Custom-HEADER: yes\r\n\r\n");
    }
}
