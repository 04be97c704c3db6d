//! Top-level facade crate for ciliumd.
//!
//! Re-exports the policy core and the daemon library so users can depend on a single crate.

pub mod core {
    pub use ciliumd_core::*;
}

pub mod daemon {
    pub use ciliumd_daemon::*;
}
