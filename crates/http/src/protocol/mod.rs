//! Core HTTP protocol types.
//!
//! - **Headers**: [`Headers`] and the case-insensitive [`FieldName`]
//! - **Request**: the parsed [`Request`] and its [`RequestLine`]
//! - **Response**: [`WriterState`], [`PayloadItem`] and the status reason table
//! - **Errors**:
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response writing errors
//!   - [`HandlerError`]: Errors a handler asks the connection to render

mod headers;
pub use headers::FieldName;
pub use headers::Headers;
pub use headers::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, TRAILER, TRAILERS, TRANSFER_ENCODING};

mod request;
pub use request::Request;
pub use request::RequestLine;

mod message;
pub use message::PayloadItem;

mod response;
pub use response::WriterState;
pub use response::reason_phrase;

mod error;
pub use error::HandlerError;
pub use error::HeaderNotFound;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
