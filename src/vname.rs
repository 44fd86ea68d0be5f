//! VName - globally unique identity for every emitted node
//!
//! A VName pairs a signature with the corpus/root/path/language descriptors
//! of the file it belongs to. Signatures of declarations are hierarchical:
//!
//! ```text
//! module foo();
//!   wire x;      ==> x#variable#foo#module
//! endmodule
//!
//! module bar();
//!   wire x;      ==> x#variable#bar#module
//! endmodule
//! ```
//!
//! Anchors use their byte span instead: `@start:end`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind tag of one signature segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Module,
    Class,
    Variable,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Module => "module",
            SegmentKind::Class => "class",
            SegmentKind::Variable => "variable",
        }
    }
}

impl FromStr for SegmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "module" => Ok(SegmentKind::Module),
            "class" => Ok(SegmentKind::Class),
            "variable" => Ok(SegmentKind::Variable),
            _ => Err(Error::InvalidSignature(format!("Unknown segment kind: {}", s))),
        }
    }
}

/// A local name tagged with what it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(name: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Names are written with `\` and `#` backslash-escaped, so an escaped
/// Verilog identifier such as `\a#b ` cannot pose as two segments.
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.name.chars() {
            if c == '\\' || c == '#' {
                f.write_str("\\")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "#{}", self.kind.as_str())
    }
}

/// Split a rendered signature on unescaped `#`, unescaping each part.
fn split_segments(s: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('\\' | '#')) => current.push(escaped),
                _ => {
                    return Err(Error::InvalidSignature(format!("Bad escape in signature: {}", s)));
                }
            },
            '#' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    Ok(parts)
}

/// Signature part of a VName.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Declaration name followed by the names of its enclosing scopes, innermost first.
    /// The file node has no segments.
    Scoped(Vec<Segment>),
    /// Byte span of an anchor.
    Span { start: usize, end: usize },
}

impl Signature {
    /// Empty signature of a file node
    pub fn file() -> Self {
        Signature::Scoped(Vec::new())
    }

    pub fn segments(&self) -> &[Segment] {
        match self {
            Signature::Scoped(segments) => segments,
            Signature::Span { .. } => &[],
        }
    }

    /// Qualify this signature with the segments of an enclosing scope.
    pub fn within(self, parent: &Signature) -> Signature {
        let mut segments = match self {
            Signature::Scoped(segments) => segments,
            span @ Signature::Span { .. } => return span,
        };
        segments.extend(parent.segments().iter().cloned());
        Signature::Scoped(segments)
    }

    /// Segment-wise prefix test.
    ///
    /// `x#variable` is a prefix of `x#variable#foo#module` but not of
    /// `xy#variable#foo#module`.
    pub fn starts_with(&self, prefix: &Signature) -> bool {
        match (self, prefix) {
            (Signature::Scoped(segments), Signature::Scoped(prefix)) => {
                segments.starts_with(prefix)
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Signature::Scoped(segments) if segments.is_empty())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Scoped(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str("#")?;
                    }
                    write!(f, "{}", segment)?;
                }
                Ok(())
            }
            Signature::Span { start, end } => write!(f, "@{}:{}", start, end),
        }
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(span) = s.strip_prefix('@') {
            let (start, end) = span
                .split_once(':')
                .ok_or_else(|| Error::InvalidSignature(format!("Span must be @start:end: {}", s)))?;
            let start = start
                .parse()
                .map_err(|_| Error::InvalidSignature(format!("Invalid span start: {}", start)))?;
            let end = end
                .parse()
                .map_err(|_| Error::InvalidSignature(format!("Invalid span end: {}", end)))?;
            return Ok(Signature::Span { start, end });
        }
        if s.is_empty() {
            return Ok(Signature::file());
        }

        let parts = split_segments(s)?;
        if parts.len() % 2 != 0 {
            return Err(Error::InvalidSignature(format!(
                "Signature must be name#kind pairs: {}",
                s
            )));
        }
        let segments = parts
            .chunks(2)
            .map(|pair| -> Result<Segment> { Ok(Segment::new(pair[0].as_str(), pair[1].parse()?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(Signature::Scoped(segments))
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Base signature of a module declaration: `name#module`
pub fn module_signature(name: &str) -> Signature {
    Signature::Scoped(vec![Segment::new(name, SegmentKind::Module)])
}

/// Base signature of a class declaration: `name#class`
pub fn class_signature(name: &str) -> Signature {
    Signature::Scoped(vec![Segment::new(name, SegmentKind::Class)])
}

/// Base signature of a variable or instance: `name#variable`
pub fn variable_signature(name: &str) -> Signature {
    Signature::Scoped(vec![Segment::new(name, SegmentKind::Variable)])
}

/// Identifier record for one node of the output graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VName {
    pub signature: Signature,
    pub path: String,
    pub language: String,
    pub root: String,
    pub corpus: String,
}

impl VName {
    pub fn new(
        signature: Signature,
        path: impl Into<String>,
        corpus: impl Into<String>,
        root: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            signature,
            path: path.into(),
            language: language.into(),
            root: root.into(),
            corpus: corpus.into(),
        }
    }
}

impl fmt::Display for VName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_rendering() {
        let foo = module_signature("foo").within(&Signature::file());
        let x = variable_signature("x").within(&foo);
        assert_eq!(foo.to_string(), "foo#module");
        assert_eq!(x.to_string(), "x#variable#foo#module");
        assert_eq!(Signature::Span { start: 7, end: 10 }.to_string(), "@7:10");
        assert_eq!(Signature::file().to_string(), "");
    }

    #[test]
    fn test_same_name_in_different_scopes() {
        let foo = module_signature("foo");
        let bar = module_signature("bar");
        let x_foo = variable_signature("x").within(&foo);
        let x_bar = variable_signature("x").within(&bar);
        assert_ne!(x_foo, x_bar);
        assert_ne!(x_foo.to_string(), x_bar.to_string());
    }

    #[test]
    fn test_prefix_matches_whole_segments() {
        let x = variable_signature("x").within(&module_signature("foo"));
        let xy = variable_signature("xy").within(&module_signature("foo"));

        assert!(x.starts_with(&variable_signature("x")));
        assert!(!xy.starts_with(&variable_signature("x")));
        assert!(!x.starts_with(&module_signature("x")));
        assert!(x.starts_with(&Signature::file()));
        assert!(!Signature::Span { start: 0, end: 1 }.starts_with(&Signature::file()));
    }

    #[test]
    fn test_parse_signature() {
        let parsed: Signature = "x#variable#foo#module".parse().unwrap();
        assert_eq!(parsed, variable_signature("x").within(&module_signature("foo")));

        let span: Signature = "@3:9".parse().unwrap();
        assert_eq!(span, Signature::Span { start: 3, end: 9 });

        assert!("x#variable#foo".parse::<Signature>().is_err());
        assert!("x#wire".parse::<Signature>().is_err());
        assert!("@3".parse::<Signature>().is_err());
    }

    #[test]
    fn test_escaped_identifier_cannot_forge_scopes() {
        let forged = module_signature(r"\x#variable#m ").within(&Signature::file());
        let nested = variable_signature("x").within(&module_signature("m"));
        assert_eq!(forged.to_string(), r"\\x\#variable\#m #module");
        assert_ne!(forged.to_string(), nested.to_string());

        let parsed: Signature = forged.to_string().parse().unwrap();
        assert_eq!(parsed, forged);
        assert!(r"x\q#variable".parse::<Signature>().is_err());
    }

    #[test]
    fn test_vname_json_shape() {
        let vname = VName::new(module_signature("foo"), "top.sv", "vxref", "", "verilog");
        let json = serde_json::to_string(&vname).unwrap();
        assert_eq!(
            json,
            r#"{"signature":"foo#module","path":"top.sv","language":"verilog","root":"","corpus":"vxref"}"#
        );
        let back: VName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vname);
    }
}
