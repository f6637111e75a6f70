use crate::{StoreError, TemplateRecord};

/// Records produced by one scan, in insertion order.
pub type Records<'a> = Box<dyn Iterator<Item = Result<TemplateRecord, StoreError>> + 'a>;

/// An append-only collection of enrolled templates.
///
/// Implementations must be safe for concurrent use: appends are exclusive,
/// scans may overlap each other and in-flight appends, and a scan never
/// observes a partially written record. Use [`MemoryStore`](crate::MemoryStore)
/// for ephemeral storage and [`FileStore`](crate::FileStore) for persistence.
pub trait TemplateStore: Send + Sync {
    /// Components per frame of every stored template.
    fn dim(&self) -> usize;

    /// Appends one record. On error nothing is stored.
    fn append(&self, record: &TemplateRecord) -> Result<(), StoreError>;

    /// Starts a fresh read pass over all records committed so far.
    ///
    /// Records are produced one at a time. A corrupt record yields
    /// [`StoreError::CorruptRecord`] and ends the pass.
    fn scan(&self) -> Result<Records<'_>, StoreError>;
}

/// Fails unless `record` can be stored in a store of dimension `dim`.
pub(crate) fn check_record(dim: usize, record: &TemplateRecord) -> Result<(), StoreError> {
    crate::record::validate_label(&record.label)?;
    if record.sequence.is_empty() {
        return Err(StoreError::EmptySequence);
    }
    if record.sequence.dim() != dim {
        return Err(StoreError::DimensionMismatch {
            expected: dim,
            got: record.sequence.dim(),
        });
    }
    Ok(())
}
