//! Kythe fact extraction
//!
//! Walks an indexing-facts tree depth-first and writes Kythe facts and edges
//! to a [`FactSink`]. Two stacks follow the walk:
//! - [`VNameContext`] holds the enclosing declarations; new signatures are
//!   qualified with the innermost one
//! - [`ScopeContext`] holds the definitions visible to references
//!
//! A scope-opening node is fully traversed before its own VName is added to
//! the enclosing scope, so a module's contents are resolved before the module
//! itself becomes visible to its siblings.

use crate::anchor::Anchor;
use crate::config::ExtractorOptions;
use crate::emitter::{FactSink, JsonLinesEmitter};
use crate::schema::{EdgeKind, FactName, complete, node_kind, subkind};
use crate::scope::{ScopeContext, VNameContext};
use crate::tree::{IndexingFactNode, IndexingFactType};
use crate::vname::{Signature, VName, class_signature, module_signature, variable_signature};
use crate::{Error, Result};
use tracing::{debug, info, trace};

/// Counters collected during one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub nodes: usize,
    pub definitions: usize,
    pub references: usize,
    pub unresolved: usize,
}

impl std::fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} definitions, {} references ({} unresolved)",
            self.nodes, self.definitions, self.references, self.unresolved
        )
    }
}

/// Traverses an indexing-facts tree and emits Kythe facts for one file.
pub struct KytheFactsExtractor<S: FactSink> {
    /// Path of the Verilog file the tree was built from
    file_path: String,
    options: ExtractorOptions,
    /// VNames of the enclosing declarations
    vnames: VNameContext,
    /// Definitions visible from the node being visited
    scopes: ScopeContext,
    sink: S,
    summary: ExtractionSummary,
}

impl<S: FactSink> KytheFactsExtractor<S> {
    pub fn new(file_path: impl Into<String>, options: ExtractorOptions, sink: S) -> Self {
        Self {
            file_path: file_path.into(),
            options,
            vnames: VNameContext::new(),
            scopes: ScopeContext::new(),
            sink,
            summary: ExtractionSummary::default(),
        }
    }

    /// Extract facts from a whole tree. The root is expected to be a file node.
    pub fn extract(&mut self, root: &IndexingFactNode) -> Result<ExtractionSummary> {
        debug!(file = %self.file_path, root = %root.kind(), "extracting facts");
        // Each run starts from empty stacks, even after an aborted one.
        self.vnames = VNameContext::new();
        self.scopes = ScopeContext::new();
        self.summary = ExtractionSummary::default();
        self.visit(root)?;
        self.sink.flush()?;
        info!(file = %self.file_path, summary = %self.summary, "extraction finished");
        Ok(self.summary)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn visit(&mut self, node: &IndexingFactNode) -> Result<()> {
        let kind = node.kind();
        if node.anchors().len() < kind.required_anchors() {
            return Err(Error::MissingAnchor {
                kind,
                expected: kind.required_anchors(),
                found: node.anchors().len(),
            });
        }
        self.summary.nodes += 1;

        let vname = match kind {
            IndexingFactType::File => self.extract_file(node)?,
            IndexingFactType::Module => {
                self.extract_record(node, module_signature, subkind::MODULE)?
            }
            IndexingFactType::Class => self.extract_record(node, class_signature, subkind::CLASS)?,
            IndexingFactType::ModuleInstance => self.extract_instance(node, module_signature)?,
            IndexingFactType::ClassInstance => self.extract_instance(node, class_signature)?,
            IndexingFactType::VariableDefinition => self.extract_variable_definition(node)?,
            IndexingFactType::VariableReference => self.extract_variable_reference(node)?,
        };

        if kind.introduces_scope() {
            self.visit_scope(node, &vname)?;
        } else {
            self.visit_children(node)?;
        }

        if kind.is_definition() {
            self.summary.definitions += 1;
            let parent = self.vnames.top()?;
            self.sink.emit_edge(&vname, EdgeKind::ChildOf, parent)?;
            self.scopes.current_scope()?.push(vname);
        }
        Ok(())
    }

    /// Visit the children of a scope-opening node with its VName and a fresh scope pushed.
    fn visit_scope(&mut self, node: &IndexingFactNode, vname: &VName) -> Result<()> {
        self.vnames.push(vname.clone());
        self.scopes.push_scope();
        debug!(signature = %vname.signature, depth = self.vnames.depth(), "enter scope");

        self.visit_children(node)?;

        self.scopes.close_scope(self.options.scope_merge)?;
        self.vnames.pop()?;
        debug!(signature = %vname.signature, "leave scope");
        Ok(())
    }

    fn visit_children(&mut self, node: &IndexingFactNode) -> Result<()> {
        for child in node.children() {
            self.visit(child)?;
        }
        Ok(())
    }

    fn extract_file(&mut self, node: &IndexingFactNode) -> Result<VName> {
        // File nodes have no language in Kythe.
        let file_vname = VName::new(
            Signature::file(),
            &self.file_path,
            &self.options.corpus,
            &self.options.root,
            "",
        );
        self.sink.emit_fact(&file_vname, FactName::NodeKind, node_kind::FILE)?;
        if let Some(content) = node.anchors().get(1) {
            self.sink.emit_fact(&file_vname, FactName::Text, content.value())?;
        }
        Ok(file_vname)
    }

    /// Modules and classes: anchors are the name and an optional end label.
    fn extract_record(
        &mut self,
        node: &IndexingFactNode,
        base_signature: fn(&str) -> Signature,
        record_subkind: &str,
    ) -> Result<VName> {
        let name = node.anchor(0)?;
        let signature = self
            .vnames
            .scope_relative_signature(base_signature(name.value()))?;
        let vname = self.vname(signature);

        self.sink.emit_fact(&vname, FactName::NodeKind, node_kind::RECORD)?;
        self.sink.emit_fact(&vname, FactName::Subkind, record_subkind)?;
        self.sink.emit_fact(&vname, FactName::Complete, complete::DEFINITION)?;

        let name_anchor = self.emit_anchor(name)?;
        self.sink.emit_edge(&name_anchor, EdgeKind::DefinesBinding, &vname)?;

        if let Some(end_label) = node.anchors().get(1) {
            let end_label_anchor = self.emit_anchor(end_label)?;
            self.sink.emit_edge(&end_label_anchor, EdgeKind::Ref, &vname)?;
        }
        Ok(vname)
    }

    /// Module and class instances: anchors are the type name and the instance name.
    fn extract_instance(
        &mut self,
        node: &IndexingFactNode,
        type_signature: fn(&str) -> Signature,
    ) -> Result<VName> {
        let type_name = node.anchor(0)?;
        let instance_name = node.anchor(1)?;
        let signature = self
            .vnames
            .scope_relative_signature(variable_signature(instance_name.value()))?;
        let vname = self.vname(signature);

        self.sink.emit_fact(&vname, FactName::NodeKind, node_kind::VARIABLE)?;
        self.sink.emit_fact(&vname, FactName::Complete, complete::DEFINITION)?;

        let type_anchor = self.emit_anchor(type_name)?;
        self.summary.references += 1;
        match self.scopes.search_for_definition(&type_signature(type_name.value())) {
            Some(definition) => {
                self.sink.emit_edge(&type_anchor, EdgeKind::Ref, definition)?;
                self.sink.emit_edge(&vname, EdgeKind::Typed, definition)?;
            }
            None => {
                self.summary.unresolved += 1;
                trace!(name = type_name.value(), "unresolved instance type");
            }
        }

        let instance_anchor = self.emit_anchor(instance_name)?;
        self.sink.emit_edge(&instance_anchor, EdgeKind::DefinesBinding, &vname)?;
        Ok(vname)
    }

    fn extract_variable_definition(&mut self, node: &IndexingFactNode) -> Result<VName> {
        let name = node.anchor(0)?;
        let signature = self
            .vnames
            .scope_relative_signature(variable_signature(name.value()))?;
        let vname = self.vname(signature);

        self.sink.emit_fact(&vname, FactName::NodeKind, node_kind::VARIABLE)?;
        self.sink.emit_fact(&vname, FactName::Complete, complete::DEFINITION)?;

        let anchor = self.emit_anchor(name)?;
        self.sink.emit_edge(&anchor, EdgeKind::DefinesBinding, &vname)?;
        Ok(vname)
    }

    /// References are identified by their anchor.
    fn extract_variable_reference(&mut self, node: &IndexingFactNode) -> Result<VName> {
        let name = node.anchor(0)?;
        let anchor = self.emit_anchor(name)?;
        self.summary.references += 1;

        match self.scopes.search_for_definition(&variable_signature(name.value())) {
            Some(definition) => {
                self.sink.emit_edge(&anchor, EdgeKind::Ref, definition)?;
            }
            None => {
                self.summary.unresolved += 1;
                trace!(name = name.value(), "unresolved reference");
            }
        }
        Ok(anchor)
    }

    /// Emit the anchor node for a span and return its VName.
    fn emit_anchor(&mut self, anchor: &Anchor) -> Result<VName> {
        let vname = self.vname(Signature::Span {
            start: anchor.start,
            end: anchor.end,
        });
        self.sink.emit_fact(&vname, FactName::NodeKind, node_kind::ANCHOR)?;
        self.sink.emit_fact(&vname, FactName::LocStart, &anchor.start.to_string())?;
        self.sink.emit_fact(&vname, FactName::LocEnd, &anchor.end.to_string())?;
        self.sink.emit_fact(&vname, FactName::Text, anchor.value())?;
        Ok(vname)
    }

    fn vname(&self, signature: Signature) -> VName {
        VName::new(
            signature,
            &self.file_path,
            &self.options.corpus,
            &self.options.root,
            &self.options.language,
        )
    }
}

/// Extract the facts of one tree as JSON lines, with default options.
pub fn extract_facts(tree: &IndexingFactNode, file_path: &str) -> Result<String> {
    extract_facts_with(tree, file_path, &ExtractorOptions::default())
}

/// Extract the facts of one tree as JSON lines.
pub fn extract_facts_with(
    tree: &IndexingFactNode,
    file_path: &str,
    options: &ExtractorOptions,
) -> Result<String> {
    let mut extractor =
        KytheFactsExtractor::new(file_path, options.clone(), JsonLinesEmitter::new(Vec::new()));
    extractor.extract(tree)?;
    let bytes = extractor.into_sink().into_inner();
    Ok(String::from_utf8(bytes)?)
}
