//! ciliumd daemon library entry.
//!
//! This crate wires the config loader, the policy tree, and the label
//! allocator into the daemon state. It is intended to be consumed by the
//! binary (`main.rs`), by API transports, and by integration tests.

pub mod config;
pub mod daemon;
pub mod labels;
pub mod policy;

pub use daemon::Daemon;
