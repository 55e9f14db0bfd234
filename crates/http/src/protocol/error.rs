use std::io;

use http::StatusCode;
use thiserror::Error;

use crate::protocol::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("request line requires 3 parts, got {parts}")]
    InvalidRequestLine { parts: usize },

    #[error("{method} method not supported")]
    UnsupportedMethod { method: String },

    #[error("{target} is an invalid request target")]
    InvalidTarget { target: String },

    #[error("{version} is an unsupported protocol or version")]
    UnsupportedVersion { version: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid character in field name: {name}")]
    InvalidFieldName { name: String },

    #[error("invalid content-length header: {value}")]
    InvalidContentLength { value: String },

    #[error("length of body {received} is more than content length {declared}")]
    BodyTooLarge { declared: usize, received: usize },

    #[error("incomplete request, stream ended while parsing {stage}")]
    IncompleteRequest { stage: &'static str },

    #[error("parse called after the request was complete")]
    InvalidState,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line(parts: usize) -> Self {
        Self::InvalidRequestLine { parts }
    }

    pub fn unsupported_method<S: ToString>(method: S) -> Self {
        Self::UnsupportedMethod { method: method.to_string() }
    }

    pub fn invalid_target<S: ToString>(target: S) -> Self {
        Self::InvalidTarget { target: target.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_field_name<S: ToString>(name: S) -> Self {
        Self::InvalidFieldName { name: name.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(value: S) -> Self {
        Self::InvalidContentLength { value: value.to_string() }
    }

    pub fn body_too_large(declared: usize, received: usize) -> Self {
        Self::BodyTooLarge { declared, received }
    }

    pub fn incomplete(stage: &'static str) -> Self {
        Self::IncompleteRequest { stage }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true for the errors raised while parsing the request line.
    pub fn is_request_line(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequestLine { .. }
                | Self::UnsupportedMethod { .. }
                | Self::InvalidTarget { .. }
                | Self::UnsupportedVersion { .. }
        )
    }

    /// Returns true for the errors raised while parsing a header line.
    pub fn is_header(&self) -> bool {
        matches!(self, Self::InvalidHeader { .. } | Self::InvalidFieldName { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("{operation} called while writing {state}")]
    InvalidState { operation: &'static str, state: WriterState },

    #[error("trailer {name} was not declared in the response headers")]
    UndeclaredTrailer { name: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_state(operation: &'static str, state: WriterState) -> Self {
        Self::InvalidState { operation, state }
    }

    pub fn undeclared_trailer<S: ToString>(name: S) -> Self {
        Self::UndeclaredTrailer { name: name.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Error returned by a handler, rendered by the connection as a response
/// when nothing has been written yet.
#[derive(Error, Debug)]
#[error("{status}: {message}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new<S: ToString>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.to_string() }
    }
}

impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e)
    }
}

#[derive(Error, Debug)]
#[error("{name} header does not exist")]
pub struct HeaderNotFound {
    pub name: String,
}
