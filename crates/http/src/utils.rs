//! Utility macros and functions for the HTTP crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the HTTP crate implementation.

use bytes::{BufMut, BytesMut};
use std::io;

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(target.starts_with('/'), ParseError::invalid_target(target));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Position of the first `\r\n` in `src`.
pub(crate) fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(2).position(|window| window == b"\r\n")
}

/// Writer over a `BytesMut`, so `write!` can format straight into the
/// output buffer.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl io::Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
