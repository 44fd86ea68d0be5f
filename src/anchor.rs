//! Anchors - source spans carried by indexing-facts nodes
//!
//! An anchor ties a fact back to the exact bytes it came from. The extractor
//! only ever reads them.

use serde::{Deserialize, Deserializer, Serialize};

/// A span of source text together with the literal text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Anchor {
    /// Literal text of the span
    pub value: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Anchor {
    /// Create an anchor starting at `start`; the end is derived from the text length.
    pub fn new(value: impl Into<String>, start: usize) -> Self {
        let value = value.into();
        let end = start + value.len();
        Self { value, start, end }
    }

    /// Create an anchor with an explicit span.
    pub fn with_span(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value: value.into(),
            start,
            end,
        }
    }

    /// Literal text of the span
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
struct RawAnchor {
    value: String,
    start: usize,
    end: Option<usize>,
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAnchor::deserialize(deserializer)?;
        Ok(match raw.end {
            Some(end) => Anchor::with_span(raw.value, raw.start, end),
            None => Anchor::new(raw.value, raw.start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_derived_from_text() {
        let anchor = Anchor::new("foo", 7);
        assert_eq!(anchor.end, 10);
        assert_eq!(anchor.len(), 3);
        assert!(!anchor.is_empty());
    }

    #[test]
    fn test_deserialize_without_end() {
        let anchor: Anchor = serde_json::from_str(r#"{"value": "clk", "start": 20}"#).unwrap();
        assert_eq!(anchor, Anchor::with_span("clk", 20, 23));
    }

    #[test]
    fn test_deserialize_keeps_explicit_end() {
        let anchor: Anchor =
            serde_json::from_str(r#"{"value": "a_b", "start": 4, "end": 9}"#).unwrap();
        assert_eq!(anchor.start, 4);
        assert_eq!(anchor.end, 9);
        assert_eq!(anchor.value(), "a_b");
    }
}
