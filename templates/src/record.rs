use speakerid_dtw::FeatureSequence;

use crate::StoreError;

/// One enrolled reference utterance.
///
/// Several records may share a label; each is an independent template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub label: String,
    pub sequence: FeatureSequence,
}

impl TemplateRecord {
    /// Creates a record after checking the label and sequence.
    pub fn new(label: impl Into<String>, sequence: FeatureSequence) -> Result<Self, StoreError> {
        let label = label.into();
        validate_label(&label)?;
        if sequence.is_empty() {
            return Err(StoreError::EmptySequence);
        }
        Ok(Self { label, sequence })
    }
}

/// A label is non-empty text without line breaks. It is stored verbatim.
pub fn validate_label(label: &str) -> Result<(), StoreError> {
    if label.is_empty() {
        return Err(StoreError::InvalidLabel("label is empty".into()));
    }
    if label.contains(['\n', '\r']) {
        return Err(StoreError::InvalidLabel(format!(
            "label {label:?} contains a line break"
        )));
    }
    Ok(())
}
