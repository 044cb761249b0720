//! Best-effort mirroring of the local store to remote object storage.
//!
//! The local store is always authoritative while the process runs. The
//! mirror is pulled once at startup ([`restore_from_remote`]) and pushed after
//! every write by [`MirroredStore`]. Mirror failures are logged at `warn` and
//! never change the result of a store operation. A failed push leaves a
//! marker beside the store file, and the startup pull is skipped until a
//! later push succeeds.

mod credentials;
mod error;
mod gcs;
mod mirror;
mod mirrored;
mod restore;

pub use credentials::{
    Credentials, ServiceAccountKey, TokenSource, ACCESS_TOKEN_ENV, CREDENTIALS_JSON_ENV,
};
pub use error::{SyncError, SyncResult};
pub use gcs::{GcsMirror, DEFAULT_ENDPOINT};
pub use mirror::{FsMirror, RemoteMirror};
pub use mirrored::MirroredStore;
pub use restore::{
    pending_marker_path, push_snapshot, restore_from_remote, validate_snapshot, SyncOutcome,
};
