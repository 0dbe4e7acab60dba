//! Durable per-session conversation memory.
//!
//! A session is keyed by an opaque, client-chosen identifier and holds the
//! full turn history, a rolling summary and the compaction counter. Stores
//! only expose `get` and a merge-style `merge_set`; read-modify-write cycles
//! are serialized per key with [`SessionLocks`].

pub mod lock;
pub mod record;
pub mod store;

pub use lock::SessionLocks;
pub use record::{SessionPatch, SessionRecord, DEFAULT_SUMMARY};
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore};
