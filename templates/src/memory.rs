use parking_lot::RwLock;

use crate::store::{check_record, Records};
use crate::{StoreError, TemplateRecord, TemplateStore};

/// In-memory [`TemplateStore`] implementation.
/// Data is lost on restart. Suitable for testing or ephemeral use.
pub struct MemoryStore {
    dim: usize,
    records: RwLock<Vec<TemplateRecord>>,
}

impl MemoryStore {
    /// Creates an empty store for frames of `dim` components.
    pub fn new(dim: usize) -> Result<Self, StoreError> {
        if dim == 0 {
            return Err(StoreError::ZeroDimension);
        }
        Ok(Self {
            dim,
            records: RwLock::new(Vec::new()),
        })
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for MemoryStore {
    fn dim(&self) -> usize {
        self.dim
    }

    fn append(&self, record: &TemplateRecord) -> Result<(), StoreError> {
        check_record(self.dim, record)?;
        self.records.write().push(record.clone());
        Ok(())
    }

    fn scan(&self) -> Result<Records<'_>, StoreError> {
        // Records appended after this point belong to the next pass.
        let end = self.len();
        Ok(Box::new(
            (0..end).map(move |i| Ok::<_, StoreError>(self.records.read()[i].clone())),
        ))
    }
}
