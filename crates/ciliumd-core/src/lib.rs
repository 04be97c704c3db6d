//! ciliumd core: policy data model, rule capability, and decision engine.
//!
//! This crate defines the policy tree nodes, the search context they are
//! evaluated against, and the error surface shared by the daemon and its
//! tooling. It carries no runtime or storage dependencies so it can be reused
//! wherever a policy decision has to be computed.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! The decision engine is total; every fallible path surfaces as
//! `CiliumError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod labels;
pub mod policy;

/// Shared result type.
pub use error::{CiliumError, Result};
