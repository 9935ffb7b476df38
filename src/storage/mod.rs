//! The `storage` module proxies file uploads into the managed blob store.
//!
//! Uploaded content is stored under a generated unique key and handed back
//! as a storage locator plus a time-bounded signed URL; nothing is ever
//! persisted locally. All durability lives in the external store.

pub mod blob_store;

pub use blob_store::{BlobStore, FileReference, StoredBlob};

#[cfg(test)]
mod tests;
