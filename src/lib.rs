//! # vxref - Verilog cross-reference extractor
//!
//! Turns the indexing-facts tree of a Verilog source file into Kythe facts
//! and edges: declarations, references and the scopes that contain them.
//!
//! vxref provides:
//! - Hierarchical, collision-free VNames for modules, classes and variables
//! - Reference resolution through a stack of visible scopes
//! - Kythe entries written to any [`FactSink`] (JSON lines, in-memory graph)

pub mod anchor;
pub mod tree;
pub mod vname;
pub mod schema;
pub mod scope;
pub mod emitter;
pub mod graph;
pub mod extractor;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use anchor::Anchor;
pub use tree::{IndexingFactNode, IndexingFactType};
pub use vname::{Signature, VName};
pub use schema::{EdgeKind, FactName};
pub use emitter::{FactSink, JsonLinesEmitter};
pub use graph::FactGraph;
pub use extractor::{ExtractionSummary, KytheFactsExtractor, extract_facts, extract_facts_with};
pub use config::ExtractorOptions;

/// Result type alias for vxref operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vxref operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} node has {found} anchors, expected at least {expected}")]
    MissingAnchor {
        kind: IndexingFactType,
        expected: usize,
        found: usize,
    },

    #[error("Ancestor stack is empty")]
    EmptyVNameStack,

    #[error("Scope stack is empty")]
    EmptyScopeStack,

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
