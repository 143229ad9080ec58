//! Filesystem-backed document store.
//!
//! Folio maps a two-level key, `(collection, resource)`, to one serialized
//! document on disk. Collections are directories under the store root and
//! resources are files inside them:
//!
//! ```text
//! <root>/
//! └── users/
//!     ├── John.json
//!     └── Paul.json
//! ```
//!
//! # Layers
//!
//! - [`paths`] -- suffix-tolerant resolution (`users/John` finds `users/John.json`)
//! - [`LockTable`] -- one lazily-created write lock per collection
//! - [`RecordStore`] -- write / read / read-all / delete on top of both
//!
//! # Design Rules
//!
//! 1. Writes go to a temporary file in the collection directory and are
//!    renamed over the record, so readers see the old or the new document,
//!    never a partial one.
//! 2. Writes and deletes are serialized per collection but run in parallel
//!    across collections.
//! 3. Reads take no lock.
//! 4. The store never interprets document contents; encoding belongs to
//!    the [`Codec`].
//! 5. Every error is returned to the caller, never logged and dropped.
//!
//! # Example
//!
//! ```
//! use folio_store::RecordStore;
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = RecordStore::open_default(dir.path()).unwrap();
//!
//! store.write("users", "John", &json!({ "name": "John", "age": 30 })).unwrap();
//! let john: serde_json::Value = store.read("users", "John").unwrap();
//! assert_eq!(john["age"], 30);
//!
//! store.delete("users", "John").unwrap();
//! assert!(store.read::<serde_json::Value>("users", "John").is_err());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod locks;
pub mod logger;
pub mod names;
pub mod paths;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{Codec, JsonCodec};
pub use config::StoreOptions;
pub use error::{StoreError, StoreResult};
pub use locks::LockTable;
pub use logger::{Level, Logger, NullLogger, TracingLogger};
pub use store::RecordStore;
