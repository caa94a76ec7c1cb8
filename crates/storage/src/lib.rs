//! Blob storage for result and image attachments.
//!
//! [`BlobStore`] is the key/bytes backend (local disk, S3 or memory);
//! [`AttachmentStore`] layers the image/latents pair on top of it.

pub mod attachments;
pub mod blob;
pub mod error;
pub mod local;
pub mod memory;
pub mod s3;

pub use attachments::{AttachmentPair, AttachmentStore};
pub use blob::BlobStore;
pub use error::BlobError;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;
