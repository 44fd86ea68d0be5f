//! Kythe schema vocabulary
//!
//! Fact names, edge kinds and the node kind values the extractor writes:
//! - `/kythe/node/kind`: file, record, variable, anchor
//! - `/kythe/edge/defines/binding`: anchor → declaration
//! - `/kythe/edge/ref`: anchor → declaration
//! - `/kythe/edge/childof`: declaration → enclosing declaration
//! - `/kythe/edge/typed`: instance → instantiated type
//!
//! See <https://kythe.io/docs/schema/> for the full schema.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Names of facts attached to a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactName {
    NodeKind,
    Subkind,
    Complete,
    Text,
    LocStart,
    LocEnd,
}

impl FactName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactName::NodeKind => "/kythe/node/kind",
            FactName::Subkind => "/kythe/subkind",
            FactName::Complete => "/kythe/complete",
            FactName::Text => "/kythe/text",
            FactName::LocStart => "/kythe/loc/start",
            FactName::LocEnd => "/kythe/loc/end",
        }
    }

    pub fn all() -> &'static [FactName] {
        &[
            FactName::NodeKind,
            FactName::Subkind,
            FactName::Complete,
            FactName::Text,
            FactName::LocStart,
            FactName::LocEnd,
        ]
    }
}

impl FromStr for FactName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FactName::all()
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| crate::Error::UnknownKind(format!("Unknown fact name: {}", s)))
    }
}

impl std::fmt::Display for FactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of edges between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Anchor binds the name of a declaration
    DefinesBinding,
    /// Anchor refers to a declaration
    Ref,
    /// Declaration is nested in another declaration
    ChildOf,
    /// Instance has the given type
    Typed,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::DefinesBinding => "/kythe/edge/defines/binding",
            EdgeKind::Ref => "/kythe/edge/ref",
            EdgeKind::ChildOf => "/kythe/edge/childof",
            EdgeKind::Typed => "/kythe/edge/typed",
        }
    }

    pub fn all() -> &'static [EdgeKind] {
        &[
            EdgeKind::DefinesBinding,
            EdgeKind::Ref,
            EdgeKind::ChildOf,
            EdgeKind::Typed,
        ]
    }

    /// Edges whose source is an anchor rather than a semantic node.
    pub fn is_anchored(&self) -> bool {
        matches!(self, EdgeKind::DefinesBinding | EdgeKind::Ref)
    }
}

impl FromStr for EdgeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/kythe/edge/defines/binding" | "defines/binding" => Ok(EdgeKind::DefinesBinding),
            "/kythe/edge/ref" | "ref" => Ok(EdgeKind::Ref),
            "/kythe/edge/childof" | "childof" => Ok(EdgeKind::ChildOf),
            "/kythe/edge/typed" | "typed" => Ok(EdgeKind::Typed),
            _ => Err(crate::Error::UnknownKind(format!("Unknown edge kind: {}", s))),
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! serialize_as_str {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    )*};
}

serialize_as_str!(FactName, EdgeKind);

/// Values of `/kythe/node/kind`
pub mod node_kind {
    pub const FILE: &str = "file";
    pub const RECORD: &str = "record";
    pub const VARIABLE: &str = "variable";
    pub const ANCHOR: &str = "anchor";
}

/// Values of `/kythe/subkind`
pub mod subkind {
    pub const MODULE: &str = "module";
    pub const CLASS: &str = "class";
}

/// Values of `/kythe/complete`
pub mod complete {
    pub const DEFINITION: &str = "definition";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_name_roundtrip() {
        for name in FactName::all() {
            let parsed: FactName = name.as_str().parse().unwrap();
            assert_eq!(*name, parsed);
        }
        assert!("/kythe/node/subkind".parse::<FactName>().is_err());
    }

    #[test]
    fn test_edge_kind_roundtrip() {
        for kind in EdgeKind::all() {
            let parsed: EdgeKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
        assert_eq!("ref".parse::<EdgeKind>().unwrap(), EdgeKind::Ref);
    }

    #[test]
    fn test_anchored_edges() {
        assert!(EdgeKind::DefinesBinding.is_anchored());
        assert!(EdgeKind::Ref.is_anchored());
        assert!(!EdgeKind::ChildOf.is_anchored());
        assert!(!EdgeKind::Typed.is_anchored());
    }

    #[test]
    fn test_serialize_as_schema_path() {
        let json = serde_json::to_string(&EdgeKind::ChildOf).unwrap();
        assert_eq!(json, r#""/kythe/edge/childof""#);
        let back: FactName = serde_json::from_str(r#""/kythe/loc/end""#).unwrap();
        assert_eq!(back, FactName::LocEnd);
    }
}
