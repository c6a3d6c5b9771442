pub mod fetcher;
pub mod keys;
pub mod predicate;
pub mod snapshot;

pub use fetcher::{decode_snapshot, fetch_snapshot, SnapshotSource, SourceError};
pub use keys::{PermissionKey, UnknownPermissionKey};
pub use predicate::{can, can_all, can_any};
pub use snapshot::{
    AccountId, PermissionSnapshot, RawSnapshotRow, Role, SnapshotDecodeError, UnknownRole,
};
