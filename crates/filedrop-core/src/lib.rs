//! filedrop-core - Storage types for the filedrop upload service
//!
//! This crate knows nothing about HTTP. It owns the upload directory, decides
//! what an accepted upload is called on disk, and writes the bytes.

pub mod error;
pub mod naming;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use naming::{ArtifactNamer, NamingScheme, TimestampNamer, UniqueNamer};
pub use store::{ArtifactWriter, DiskStore, StoredArtifact};
