//! Structural diff engine producing auditable patch operations.

mod engine;

pub use engine::{diff, PatchOp, PatchOpKind};
