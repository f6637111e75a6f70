//! Speaker identification by nearest-template DTW matching.
//!
//! Enrolled templates (a label plus a feature sequence) live in a
//! [`TemplateStore`](speakerid_templates::TemplateStore). Identification
//! compares a probe sequence against every template with
//! [`speakerid_dtw::distance`] and returns the closest one.
//!
//! # Usage
//!
//! ```
//! use speakerid::{Config, SpeakerId};
//! use speakerid_dtw::{FeatureSequence, Mode};
//!
//! let sid = SpeakerId::with_memory_store(Config { dim: 2, ..Config::default() }).unwrap();
//!
//! let alice = FeatureSequence::from_frames([[1.0, 0.0], [0.5, 0.5]]).unwrap();
//! let bob = FeatureSequence::from_frames([[-3.0, 2.0]]).unwrap();
//! sid.enroll("alice", alice.clone()).unwrap();
//! sid.enroll("bob", bob).unwrap();
//!
//! let m = sid.identify(&alice, Mode::Full).unwrap();
//! assert_eq!(m.label, "alice");
//! assert_eq!(m.distance, 0.0);
//! ```
//!
//! # Decision rule
//!
//! Templates are compared in insertion order and a candidate replaces the
//! current best only when strictly closer, so the earliest enrolled template
//! wins ties. This holds with parallel comparison too ([`Config::workers`]).
//! A corrupt stored record aborts identification instead of being skipped.

mod config;
mod engine;
mod enroll;
mod error;
mod speakers;

pub use config::Config;
pub use engine::{Candidate, Identifier, MatchResult};
pub use enroll::Enroller;
pub use error::Error;
pub use speakers::{LabelSummary, SpeakerId};

pub use tokio_util::sync::CancellationToken;
