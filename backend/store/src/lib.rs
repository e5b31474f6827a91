//! Document record store.
//!
//! [`DocumentStore`] keeps the ordered collection in memory and rewrites the
//! whole collection to a [`BlobStore`](scanflow_core::BlobStore) on every
//! mutation.

pub mod blob;
pub mod store;

pub use blob::{default_blob_path, FileBlobStore, MemoryBlobStore, BLOB_KEY};
pub use store::DocumentStore;
