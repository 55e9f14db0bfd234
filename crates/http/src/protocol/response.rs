//! Response-side protocol types: the writer state and the status line
//! reason phrases.

use std::fmt;

use http::StatusCode;

/// Where a [`ResponseWriter`](crate::connection::ResponseWriter) is in the
/// response. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    /// The chunked body has been terminated, nothing more may be written.
    Finished,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriterState::StatusLine => "status line",
            WriterState::Headers => "headers",
            WriterState::Body => "body",
            WriterState::Finished => "finished body",
        })
    }
}

/// Reason phrase written after the status code.
///
/// Only the handful of codes this server emits have one, every other code
/// gets an empty phrase.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}
