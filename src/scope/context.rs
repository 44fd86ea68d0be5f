//! Visible-definition scopes and reference resolution
//!
//! Resolution algorithm:
//! 1. Walk scopes from the innermost to the outermost
//! 2. Inside a scope, walk definitions from the newest to the oldest
//! 3. The first definition whose signature starts with the lookup prefix wins
//! 4. No match → unresolved (not an error)
//!
//! A scope's definitions are only visible to its own nested nodes until the
//! scope closes; what happens to them afterwards is decided by [`ScopeMerge`].

use crate::vname::{Signature, VName};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What a closed scope leaves behind in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMerge {
    /// Definitions of the closed scope are appended to the parent scope.
    #[default]
    Parent,
    /// Definitions of the closed scope are dropped; only the scope's own
    /// declaration is added to the parent by the extractor.
    Encapsulate,
}

/// Stack of open scopes, innermost last.
#[derive(Debug, Default)]
pub struct ScopeContext {
    scopes: Vec<Vec<VName>>,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new empty scope
    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Definitions of the innermost scope, for appending
    pub fn current_scope(&mut self) -> Result<&mut Vec<VName>> {
        self.scopes.last_mut().ok_or(Error::EmptyScopeStack)
    }

    /// Remove the innermost scope and return its definitions
    pub fn pop_scope(&mut self) -> Result<Vec<VName>> {
        self.scopes.pop().ok_or(Error::EmptyScopeStack)
    }

    /// Pop the innermost scope and hand its definitions to the parent per `merge`.
    ///
    /// Closing the outermost scope just drops its definitions.
    pub fn close_scope(&mut self, merge: ScopeMerge) -> Result<()> {
        let definitions = self.pop_scope()?;
        if merge == ScopeMerge::Parent {
            if let Some(parent) = self.scopes.last_mut() {
                parent.extend(definitions);
            }
        }
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Find the nearest visible definition whose signature starts with `prefix`.
    pub fn search_for_definition(&self, prefix: &Signature) -> Option<&VName> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|vname| vname.signature.starts_with(prefix))
    }
}
