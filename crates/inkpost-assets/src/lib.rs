//! Asset handling for inkpost drafts and articles.
//!
//! - [`resolve`]: turns image and link references found in Markdown into
//!   fetchable URLs for a document's asset namespace.
//! - [`reconcile`]: rewrites a draft's image references after an upload batch
//!   completes.
//! - [`namespace`] and [`upload`]: the value types and collaborator traits
//!   shared with the editing session.
pub mod namespace;
pub mod reconcile;
pub mod resolve;
pub mod upload;

pub use namespace::{AssetNamespace, NamespaceAllocator, SlugNamespaceAllocator};
pub use reconcile::{ReconcileReport, count_image_references, reconcile};
pub use resolve::AssetResolver;
pub use upload::{PendingFile, UploadBatch, UploadError, UploadService, UploadedAsset};
