pub mod snapshot;

pub use snapshot::{OutputFormat, Snapshot, SnapshotError};
