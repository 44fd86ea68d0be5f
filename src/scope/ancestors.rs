//! Ancestor stack used to qualify signatures

use crate::vname::{Signature, VName};
use crate::{Error, Result};

/// VNames of the scopes enclosing the node being visited, innermost last.
#[derive(Debug, Default)]
pub struct VNameContext {
    stack: Vec<VName>,
}

impl VNameContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vname: VName) {
        self.stack.push(vname);
    }

    pub fn pop(&mut self) -> Result<VName> {
        self.stack.pop().ok_or(Error::EmptyVNameStack)
    }

    /// Innermost enclosing VName
    pub fn top(&self) -> Result<&VName> {
        self.stack.last().ok_or(Error::EmptyVNameStack)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Qualify `base` with the signature of the innermost ancestor.
    pub fn scope_relative_signature(&self, base: Signature) -> Result<Signature> {
        Ok(base.within(&self.top()?.signature))
    }
}
