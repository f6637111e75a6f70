use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::codec::{encode, RecordReader};
use crate::store::{check_record, Records};
use crate::{StoreError, TemplateRecord, TemplateStore};

/// Append-only flat-file [`TemplateStore`].
///
/// The file is created on the first append. Each append writes one fully
/// encoded record with a single `write_all` under the store's write lock and
/// syncs it; a failed write truncates the file back to its previous length.
/// A scan records the file length under the read lock and never reads past
/// it, so records appended during a scan are left for the next pass.
///
/// The lock is per instance: open one `FileStore` per path per process.
pub struct FileStore {
    path: PathBuf,
    dim: usize,
    lock: RwLock<()>,
}

impl FileStore {
    /// Opens the store at `path`. The file need not exist yet.
    pub fn open(path: impl AsRef<Path>, dim: usize) -> Result<Self, StoreError> {
        if dim == 0 {
            return Err(StoreError::ZeroDimension);
        }
        let path = path.as_ref().to_path_buf();
        match fs::metadata(&path) {
            Ok(meta) if !meta.is_file() => {
                return Err(StoreError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a regular file", path.display()),
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Self {
            path,
            dim,
            lock: RwLock::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the committed prefix of the file, or `None` if absent.
    fn committed_len(&self) -> Result<Option<u64>, StoreError> {
        let _guard = self.lock.read();
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl TemplateStore for FileStore {
    fn dim(&self) -> usize {
        self.dim
    }

    fn append(&self, record: &TemplateRecord) -> Result<(), StoreError> {
        check_record(self.dim, record)?;

        let mut buf = Vec::new();
        encode(record, &mut buf);

        let _guard = self.lock.write();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let before = file.metadata()?.len();

        if let Err(e) = file.write_all(&buf).and_then(|_| file.sync_data()) {
            warn!(path = %self.path.display(), error = %e, "template append failed, rolling back");
            if let Err(trunc) = file.set_len(before) {
                warn!(path = %self.path.display(), error = %trunc, "rollback failed");
            }
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            label = %record.label,
            frames = record.sequence.len(),
            bytes = buf.len(),
            "template appended"
        );
        Ok(())
    }

    fn scan(&self) -> Result<Records<'_>, StoreError> {
        let Some(len) = self.committed_len()? else {
            debug!(path = %self.path.display(), "template store absent, empty scan");
            return Ok(Box::new(std::iter::empty()));
        };
        let file = File::open(&self.path)?;
        debug!(path = %self.path.display(), bytes = len, "template scan started");
        Ok(Box::new(RecordReader::new(
            BufReader::new(file.take(len)),
            self.dim,
        )))
    }
}
