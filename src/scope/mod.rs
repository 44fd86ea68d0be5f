//! Scope tracking during extraction
//!
//! Two stacks follow the traversal: the ancestors whose signatures qualify new
//! declarations, and the scopes whose definitions references resolve against.

pub mod ancestors;
pub mod context;

pub use ancestors::VNameContext;
pub use context::{ScopeContext, ScopeMerge};
