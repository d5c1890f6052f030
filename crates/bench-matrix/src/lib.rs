//! bench-matrix: a benchmark-matrix orchestrator.
//!
//! Given a catalog of compiled benchmark variants (the same data structure
//! built under different memory-consistency-model compilation strategies),
//! this crate derives which binaries belong to which comparison group,
//! builds one parameterized driver command per (subtest, binary-set)
//! combination, and drives execution — optionally repeating the whole
//! matrix across source-control branches for A/B comparison.
//!
//! The crate measures nothing itself: the benchmark driver, the build
//! system, and source control are external collaborators reached through
//! the process seam in [`exec`].

pub mod catalog;
pub mod derive;
pub mod dispatch;
pub mod exec;
pub mod matrix;
pub mod resolve;
pub mod runner;
pub mod scm;
pub mod types;

pub mod error;

pub use catalog::Registry;
pub use dispatch::{Dispatcher, Selection};
pub use error::MatrixError;
pub use matrix::{Invocation, DEFAULT_DRIVER};
pub use runner::{BranchRunner, RunPolicy, BRANCH_PREFIX};
pub use types::{ParamValue, TestEntry, Variant};
