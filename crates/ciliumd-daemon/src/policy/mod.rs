//! Policy tree state (path resolution, mutation, import).
//!
//! Owns the single rooted tree the daemon evaluates decisions against. The
//! rule model and the decision engine live in `ciliumd_core::policy`.

pub mod import;
pub mod path;
pub mod tree;

pub use path::find_node;
pub use tree::{PolicyTree, MAX_POLICY_DEPTH};
