//! Case-insensitive header storage and the streaming header-line parser.
//!
//! Storage is an [`http::HeaderMap`], so field names are lower-case
//! [`HeaderName`]s and every lookup is case-insensitive. A repeated field name
//! never overwrites: its values are joined with `", "` in arrival order.

use http::header::{AsHeaderName, Entry, IntoHeaderName};
use http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use tracing::trace;

use crate::protocol::ParseError;
use crate::utils::{CRLF, ensure, find_crlf};

/// A map from header field name to a single, possibly comma-joined, value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HeaderMap,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`, ignoring case.
    ///
    /// Values that aren't visible ASCII read as `None`; use
    /// [`Headers::get_value`] for the raw bytes.
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.inner.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn get_value<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.inner.get(name)
    }

    pub fn contains<K: AsHeaderName>(&self, name: K) -> bool {
        self.inner.contains_key(name)
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn set<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.inner.insert(name, value);
    }

    /// Stores `value` under `name`, joining it onto any previous value with `", "`.
    ///
    /// # Errors
    ///
    /// Fails when the joined bytes aren't a valid header value.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) -> Result<(), InvalidHeaderValue> {
        match self.inner.entry(name) {
            Entry::Occupied(mut entry) => {
                let joined = [entry.get().as_bytes(), b", ".as_slice(), value.as_bytes()].concat();
                entry.insert(HeaderValue::from_bytes(&joined)?);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
        Ok(())
    }

    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        self.inner.remove(name)
    }

    /// The number of distinct field names.
    pub fn len(&self) -> usize {
        self.inner.keys_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.inner.iter()
    }

    /// Parses at most one header line from the front of `buf`.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// terminates the header section was reached. When `buf` holds no complete
    /// line, nothing is consumed and the caller should wait for more bytes.
    ///
    /// # Errors
    ///
    /// - [`ParseError::MalformedHeader`] when the colon is missing, starts the
    ///   line, or is preceded by whitespace, or when the value holds control
    ///   characters
    /// - [`ParseError::InvalidFieldName`] when the field name holds a byte
    ///   outside the token character set
    pub fn parse(&mut self, buf: &[u8]) -> Result<(usize, bool), ParseError> {
        if buf.starts_with(CRLF) {
            return Ok((CRLF.len(), true));
        }

        let Some(line_end) = find_crlf(buf) else {
            return Ok((0, false));
        };

        let line = buf[..line_end].trim_ascii();
        let colon = line.iter().position(|&b| b == b':').ok_or(ParseError::malformed_header("missing colon"))?;
        ensure!(colon > 0, ParseError::malformed_header("missing field name"));
        ensure!(!line[colon - 1].is_ascii_whitespace(), ParseError::malformed_header("whitespace before colon"));

        let raw_name = &line[..colon];
        let name = HeaderName::from_bytes(raw_name).map_err(|e| {
            trace!(cause = %e, "rejected header field name");
            ParseError::invalid_field_name(String::from_utf8_lossy(raw_name))
        })?;
        let value = HeaderValue::from_bytes(line[colon + 1..].trim_ascii()).map_err(|e| {
            trace!(cause = %e, "rejected header field value");
            ParseError::malformed_header("invalid field value")
        })?;

        trace!(name = %name, value = ?value, "parsed header line");
        self.append(name, value).map_err(|e| {
            trace!(cause = %e, "failed to join repeated header");
            ParseError::malformed_header("invalid field value")
        })?;

        Ok((line_end + CRLF.len(), false))
    }
}
