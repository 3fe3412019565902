//! Change history
//!
//! Storage appends an entry here for every expense row it creates, edits or
//! deletes, and for settings changes. Updates carry a field-level summary
//! produced by [`generate_diff`], e.g. `paid_status.may: false -> true`.

mod diff;
mod entry;
mod logger;

pub use diff::{generate_detailed_diff, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
