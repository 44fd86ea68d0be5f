//! Indexing-facts tree - the input of the extractor
//!
//! Built upstream from a Verilog syntax tree. Every node carries a kind tag,
//! the anchors that name it, and its children in source order:
//! - `File`: the root; anchors are the path and the full text
//! - `Module` / `Class`: named declarations that open a scope
//! - `ModuleInstance` / `ClassInstance`: instantiations of a declared type
//! - `VariableDefinition` / `VariableReference`: declared and used names

use crate::anchor::Anchor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind tag of an indexing-facts node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingFactType {
    File,
    Module,
    ModuleInstance,
    Class,
    ClassInstance,
    VariableDefinition,
    VariableReference,
}

impl IndexingFactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingFactType::File => "file",
            IndexingFactType::Module => "module",
            IndexingFactType::ModuleInstance => "module_instance",
            IndexingFactType::Class => "class",
            IndexingFactType::ClassInstance => "class_instance",
            IndexingFactType::VariableDefinition => "variable_definition",
            IndexingFactType::VariableReference => "variable_reference",
        }
    }

    pub fn all() -> &'static [IndexingFactType] {
        &[
            IndexingFactType::File,
            IndexingFactType::Module,
            IndexingFactType::ModuleInstance,
            IndexingFactType::Class,
            IndexingFactType::ClassInstance,
            IndexingFactType::VariableDefinition,
            IndexingFactType::VariableReference,
        ]
    }

    /// Nodes of this kind open a new scope for their children.
    pub fn introduces_scope(&self) -> bool {
        matches!(
            self,
            IndexingFactType::File
                | IndexingFactType::Module
                | IndexingFactType::Class
                | IndexingFactType::ModuleInstance
                | IndexingFactType::ClassInstance
        )
    }

    /// Nodes of this kind declare something visible to later references.
    pub fn is_definition(&self) -> bool {
        !matches!(
            self,
            IndexingFactType::File | IndexingFactType::VariableReference
        )
    }

    /// Minimum number of anchors a well-formed node of this kind carries.
    pub fn required_anchors(&self) -> usize {
        match self {
            IndexingFactType::File => 0,
            IndexingFactType::ModuleInstance | IndexingFactType::ClassInstance => 2,
            _ => 1,
        }
    }
}

impl FromStr for IndexingFactType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "file" => Ok(IndexingFactType::File),
            "module" => Ok(IndexingFactType::Module),
            "module_instance" => Ok(IndexingFactType::ModuleInstance),
            "class" => Ok(IndexingFactType::Class),
            "class_instance" => Ok(IndexingFactType::ClassInstance),
            "variable_definition" | "variable" => Ok(IndexingFactType::VariableDefinition),
            "variable_reference" | "ref" => Ok(IndexingFactType::VariableReference),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for IndexingFactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of the indexing-facts tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingFactNode {
    pub kind: IndexingFactType,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub children: Vec<IndexingFactNode>,
}

impl IndexingFactNode {
    /// Create a node with no anchors and no children
    pub fn new(kind: IndexingFactType) -> Self {
        Self {
            kind,
            anchors: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: IndexingFactNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> IndexingFactType {
        self.kind
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn children(&self) -> &[IndexingFactNode] {
        &self.children
    }

    /// Anchor at `index`, or a `MissingAnchor` error naming this node's kind.
    pub fn anchor(&self, index: usize) -> Result<&Anchor> {
        self.anchors.get(index).ok_or(Error::MissingAnchor {
            kind: self.kind,
            expected: index + 1,
            found: self.anchors.len(),
        })
    }

    /// All nodes of the subtree in pre-order, starting with this one.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All nodes of the subtree with the given kind, in pre-order.
    pub fn find_all(&self, kind: IndexingFactType) -> Vec<&IndexingFactNode> {
        self.descendants().filter(|n| n.kind == kind).collect()
    }

    pub fn count(&self, kind: IndexingFactType) -> usize {
        self.descendants().filter(|n| n.kind == kind).count()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a IndexingFactNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a IndexingFactNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> IndexingFactNode {
        IndexingFactNode::new(IndexingFactType::File)
            .with_child(
                IndexingFactNode::new(IndexingFactType::Module)
                    .with_anchor(Anchor::new("foo", 7))
                    .with_child(
                        IndexingFactNode::new(IndexingFactType::VariableDefinition)
                            .with_anchor(Anchor::new("x", 20)),
                    ),
            )
            .with_child(
                IndexingFactNode::new(IndexingFactType::Module)
                    .with_anchor(Anchor::new("bar", 40)),
            )
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in IndexingFactType::all() {
            let parsed: IndexingFactType = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
        assert!("interface".parse::<IndexingFactType>().is_err());
    }

    #[test]
    fn test_scope_and_definition_kinds() {
        assert!(IndexingFactType::File.introduces_scope());
        assert!(IndexingFactType::ClassInstance.introduces_scope());
        assert!(!IndexingFactType::VariableDefinition.introduces_scope());
        assert!(IndexingFactType::VariableDefinition.is_definition());
        assert!(!IndexingFactType::File.is_definition());
        assert!(!IndexingFactType::VariableReference.is_definition());
    }

    #[test]
    fn test_required_anchors() {
        assert_eq!(IndexingFactType::File.required_anchors(), 0);
        assert_eq!(IndexingFactType::Module.required_anchors(), 1);
        assert_eq!(IndexingFactType::Class.required_anchors(), 1);
        assert_eq!(IndexingFactType::ModuleInstance.required_anchors(), 2);
        assert_eq!(IndexingFactType::ClassInstance.required_anchors(), 2);
        assert_eq!(IndexingFactType::VariableDefinition.required_anchors(), 1);
        assert_eq!(IndexingFactType::VariableReference.required_anchors(), 1);
    }

    #[test]
    fn test_descendants_preorder() {
        let tree = sample_tree();
        let kinds: Vec<_> = tree.descendants().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IndexingFactType::File,
                IndexingFactType::Module,
                IndexingFactType::VariableDefinition,
                IndexingFactType::Module,
            ]
        );

        let modules = tree.find_all(IndexingFactType::Module);
        assert_eq!(modules[0].anchors[0].value, "foo");
        assert_eq!(modules[1].anchors[0].value, "bar");
        assert_eq!(tree.count(IndexingFactType::VariableReference), 0);
    }

    #[test]
    fn test_missing_anchor() {
        let node = IndexingFactNode::new(IndexingFactType::Module);
        match node.anchor(0) {
            Err(Error::MissingAnchor { kind, expected, found }) => {
                assert_eq!(kind, IndexingFactType::Module);
                assert_eq!(expected, 1);
                assert_eq!(found, 0);
            }
            other => panic!("expected MissingAnchor, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_tree() {
        let json = r#"{
            "kind": "file",
            "children": [
                {"kind": "module", "anchors": [{"value": "foo", "start": 7}]}
            ]
        }"#;
        let tree: IndexingFactNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.kind, IndexingFactType::File);
        assert!(tree.anchors.is_empty());
        assert_eq!(tree.children[0].anchors[0].end, 10);
    }
}
