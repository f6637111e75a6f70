use std::sync::Arc;

use speakerid_dtw::FeatureSequence;
use speakerid_templates::{validate_label, TemplateRecord, TemplateStore};
use tracing::debug;

use crate::Error;

/// Validates and stores new templates.
///
/// Re-enrolling a label adds another independent template for that speaker;
/// nothing is deduplicated.
pub struct Enroller {
    store: Arc<dyn TemplateStore>,
}

impl Enroller {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Checks `(label, sequence)` without touching the store.
    ///
    /// The label must be non-empty and free of line breaks; the sequence must
    /// be non-empty with the store's frame dimension.
    pub fn validate(&self, label: &str, sequence: &FeatureSequence) -> Result<(), Error> {
        validate_label(label)?;
        sequence.ensure_matchable(self.store.dim())?;
        Ok(())
    }

    /// Appends `(label, sequence)` to the store after [`validate`](Self::validate).
    /// Invalid input never reaches the store.
    pub fn enroll(&self, label: &str, sequence: FeatureSequence) -> Result<(), Error> {
        self.validate(label, &sequence)?;

        let frames = sequence.len();
        let record = TemplateRecord::new(label, sequence)?;
        self.store.append(&record)?;

        debug!(label, frames, "template enrolled");
        Ok(())
    }
}
