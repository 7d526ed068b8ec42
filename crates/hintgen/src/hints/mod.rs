//! Hints module — annotation key grammar and the per-event hint tree.

pub mod grammar;
pub mod tree;

pub use grammar::{HintKey, KeyScope};
pub use tree::{HintScope, HintTree};
