//! Append-only persistence for enrolled speaker templates.
//!
//! A [`TemplateRecord`] pairs a speaker label with a
//! [`FeatureSequence`](speakerid_dtw::FeatureSequence). Stores implement
//! [`TemplateStore`]: `append` adds one record, `scan` streams every
//! committed record in insertion order without loading the whole store.
//!
//! # File format
//!
//! [`FileStore`] writes self-delimiting text records (see [`codec::encode`]):
//!
//! ```text
//! 3:alice        <- frame count, ':', label
//! 12.5           <- 3 x dim components, one per line
//! -3.0625
//! ...
//! ```
//!
//! The frame count alone determines where the next record starts, so the
//! file is scanned without an index.

pub mod codec;
mod error;
mod file;
mod memory;
mod record;
mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{validate_label, TemplateRecord};
pub use store::{Records, TemplateStore};
