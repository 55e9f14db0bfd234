//! Encoding and decoding of the message head
//!
//! # Components
//!
//! - [`RequestLineDecoder`]: Decodes `<METHOD> <target> HTTP/1.1`
//! - [`HeaderDecoder`]: Decodes header lines one at a time into [`Headers`](crate::protocol::Headers)
//! - [`HeaderEncoder`]: Encodes the response status line and header block

mod header_decoder;
mod header_encoder;
mod request_line_decoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
pub(crate) use header_encoder::encode_fields;
pub use request_line_decoder::RequestLineDecoder;
