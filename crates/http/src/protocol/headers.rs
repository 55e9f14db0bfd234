//! Case-insensitive header collection.
//!
//! [`Headers`] is keyed by [`FieldName`], whose equality, ordering and hashing
//! ignore ASCII case, so `Host`, `host` and `HOST` always land on the same
//! entry no matter who inserted them. The spelling of the first insertion is
//! kept and used when the headers are written back out.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::codec::HeaderDecoder;
use crate::protocol::{HeaderNotFound, ParseError};

/// A header field name that compares case-insensitively.
#[derive(Debug, Clone)]
pub struct FieldName(Cow<'static, str>);

impl FieldName {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The name as it was spelled on insertion.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for FieldName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for FieldName {}

impl Ord for FieldName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for FieldName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for FieldName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

pub const CONTENT_LENGTH: FieldName = FieldName::from_static("Content-Length");
pub const CONTENT_TYPE: FieldName = FieldName::from_static("Content-Type");
pub const CONNECTION: FieldName = FieldName::from_static("Connection");
pub const TRANSFER_ENCODING: FieldName = FieldName::from_static("Transfer-Encoding");
pub const TRAILERS: FieldName = FieldName::from_static("Trailers");
pub const TRAILER: FieldName = FieldName::from_static("Trailer");

/// Header fields of a request or response.
///
/// Duplicates are never rejected: [`Headers::append`] joins a repeated field
/// onto the existing value with `", "`, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<FieldName, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers sent with every plain response: the body length, `Connection:
    /// close` and a `text/plain` content type.
    pub fn defaults(body_len: usize) -> Self {
        let mut headers = Self::new();
        headers.set(CONTENT_LENGTH, body_len.to_string());
        headers.set(CONNECTION, "close");
        headers.set(CONTENT_TYPE, "text/plain");
        headers
    }

    /// Parses at most one header line from `data`.
    ///
    /// Returns the number of bytes consumed and whether the end of the header
    /// section was reached. Zero bytes consumed means `data` does not hold a
    /// full line yet.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        HeaderDecoder.decode(data, self)
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Result<&str, HeaderNotFound> {
        self.value(name).ok_or_else(|| HeaderNotFound { name: name.to_string() })
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(&FieldName::new(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&FieldName::new(name))
    }

    /// Inserts a field, merging with an existing value as `"old, new"`.
    pub fn append<N: Into<FieldName>, V: Into<String>>(&mut self, name: N, value: V) {
        let value = value.into();
        match self.fields.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    /// Inserts a field, replacing any existing value. An existing entry keeps
    /// its original spelling.
    pub fn set<N: Into<FieldName>, V: Into<String>>(&mut self, name: N, value: V) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&FieldName::new(name))
    }

    /// Replaces a default response header.
    ///
    /// `Transfer-Encoding: chunked` and `Content-Length` are mutually
    /// exclusive, so switching to chunked drops the length.
    pub fn override_default<N: Into<FieldName>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        if name == TRANSFER_ENCODING && value.eq_ignore_ascii_case("chunked") {
            self.fields.remove(&CONTENT_LENGTH);
        }
        self.set(name, value);
    }

    /// Iterates over `(name, value)` pairs, ordered by case-folded name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The trailer names declared by a `Trailers` (or `Trailer`) header.
    pub(crate) fn declared_trailers(&self) -> Vec<FieldName> {
        self.fields
            .get(&TRAILERS)
            .or_else(|| self.fields.get(&TRAILER))
            .map(|value| value.split(',').map(str::trim).filter(|name| !name.is_empty()).map(FieldName::from).collect())
            .unwrap_or_default()
    }
}

impl<N: Into<FieldName>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.append("Host", "localhost:42069");

        assert_eq!(headers.get("host").unwrap(), "localhost:42069");
        assert_eq!(headers.get("HOST").unwrap(), "localhost:42069");
        assert!(headers.contains("hOsT"));
        assert_eq!(headers.get("accept").unwrap_err().name, "accept");
    }

    #[test]
    fn append_merges_in_arrival_order() {
        let mut headers = Headers::new();
        headers.append("Set-Person", "lane-loves-go");
        headers.append("set-person", "prime-loves-zig");
        headers.append("SET-PERSON", "tj-loves-ocaml");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("set-person").unwrap(), "lane-loves-go, prime-loves-zig, tj-loves-ocaml");
    }

    #[test]
    fn set_keeps_first_spelling() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        headers.set("content-type", "text/html");

        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("Content-Type", "text/html")]);
    }

    #[test]
    fn defaults() {
        let headers = Headers::defaults(13);

        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("Connection", "close"), ("Content-Length", "13"), ("Content-Type", "text/plain")]
        );
    }

    #[test]
    fn override_default_replaces_case_insensitively() {
        let mut headers = Headers::defaults(0);
        headers.override_default("content-type", "text/html");

        assert_eq!(headers.get("Content-Type").unwrap(), "text/html");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn chunked_removes_content_length() {
        let mut headers = Headers::defaults(42);
        headers.override_default("Transfer-Encoding", "chunked");

        assert!(!headers.contains("content-length"));
        assert_eq!(headers.get("transfer-encoding").unwrap(), "chunked");
    }

    #[test]
    fn declared_trailers() {
        let mut headers = Headers::defaults(0);
        assert!(headers.declared_trailers().is_empty());

        headers.set("Trailers", "X-Content-SHA256, X-Content-Length");
        assert_eq!(
            headers.declared_trailers(),
            vec![FieldName::from("x-content-sha256"), FieldName::from("x-content-length")]
        );
    }

    #[test]
    fn collect_from_pairs() {
        let headers: Headers = [("Accept", "text/html"), ("accept", "*/*")].into_iter().collect();
        assert_eq!(headers.get("Accept").unwrap(), "text/html, */*");
    }
}
