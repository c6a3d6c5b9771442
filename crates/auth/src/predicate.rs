//! Pure predicates over a snapshot. No I/O, no hidden state; safe to call
//! on every evaluation of every gate.

use crate::keys::PermissionKey;
use crate::snapshot::PermissionSnapshot;

/// `true` iff the snapshot exists and allows `key`. `None` denies.
pub fn can(snapshot: Option<&PermissionSnapshot>, key: PermissionKey) -> bool {
    match snapshot {
        Some(snapshot) => snapshot.permissions().contains(&key),
        None => false,
    }
}

/// `true` iff at least one of `keys` is allowed. Empty `keys` denies.
pub fn can_any(snapshot: Option<&PermissionSnapshot>, keys: &[PermissionKey]) -> bool {
    keys.iter().any(|key| can(snapshot, *key))
}

/// `true` iff every key in `keys` is allowed. `None` denies even for an
/// empty list; a non-null snapshot satisfies an empty list vacuously.
pub fn can_all(snapshot: Option<&PermissionSnapshot>, keys: &[PermissionKey]) -> bool {
    snapshot.is_some() && keys.iter().all(|key| can(snapshot, *key))
}
