//! Story records and single-field revisions.

mod record;

pub use record::{FieldRevision, Story};
