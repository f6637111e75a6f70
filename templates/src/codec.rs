use std::io::BufRead;

use speakerid_dtw::FeatureSequence;

use crate::{StoreError, TemplateRecord};

/// Serializes one record in the store's text layout:
///
/// ```text
/// <frame_count>:<label>\n
/// <component>\n        frame_count x dim lines, frame-major
/// ...
/// ```
///
/// Components use Rust's shortest round-trip float formatting, so decoding
/// yields bit-identical values. Each record declares its own length, so a
/// reader never needs to look into the next record.
pub fn encode(record: &TemplateRecord, out: &mut Vec<u8>) {
    let seq = &record.sequence;
    out.extend_from_slice(format!("{}:{}\n", seq.len(), record.label).as_bytes());
    for v in seq.as_flat() {
        out.extend_from_slice(format!("{v}\n").as_bytes());
    }
}

/// Lazily decodes records from a buffered reader.
///
/// Yields records in order. The first malformed record yields
/// [`StoreError::CorruptRecord`] and ends the iteration; no attempt is made
/// to resynchronize.
pub struct RecordReader<R> {
    reader: R,
    dim: usize,
    index: usize,
    done: bool,
    line: String,
}

impl<R: BufRead> RecordReader<R> {
    /// Creates a reader for records whose frames have `dim` components.
    pub fn new(reader: R, dim: usize) -> Self {
        Self {
            reader,
            dim,
            index: 0,
            done: false,
            line: String::new(),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::CorruptRecord {
            index: self.index,
            reason: reason.into(),
        }
    }

    /// Reads one `\n`-terminated line into `self.line` without the terminator.
    /// Returns `Ok(false)` on a clean end of input.
    fn read_line(&mut self) -> Result<bool, StoreError> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                self.corrupt("invalid utf-8")
            } else {
                StoreError::Io(e)
            }
        })?;
        if n == 0 {
            return Ok(false);
        }
        if !self.line.ends_with('\n') {
            return Err(self.corrupt("truncated line"));
        }
        self.line.pop();
        if self.line.ends_with('\r') {
            self.line.pop();
        }
        Ok(true)
    }

    fn read_record(&mut self) -> Result<Option<TemplateRecord>, StoreError> {
        if !self.read_line()? {
            return Ok(None);
        }

        let (count, label) = match self.line.split_once(':') {
            Some((c, l)) => (c.to_string(), l.to_string()),
            None => return Err(self.corrupt("missing frame count separator")),
        };
        let frames: usize = count
            .parse()
            .map_err(|_| self.corrupt(format!("invalid frame count {count:?}")))?;
        if frames == 0 {
            return Err(self.corrupt("zero frame count"));
        }
        if label.is_empty() {
            return Err(self.corrupt("empty label"));
        }
        let total = frames
            .checked_mul(self.dim)
            .ok_or_else(|| self.corrupt(format!("frame count {frames} overflows")))?;

        // Cap the up-front allocation; the header alone is not trusted.
        let mut data = Vec::with_capacity(total.min(1 << 16));
        for k in 0..total {
            if !self.read_line()? {
                return Err(self.corrupt(format!(
                    "truncated: expected {total} values, got {k}"
                )));
            }
            let v: f32 = self
                .line
                .trim()
                .parse()
                .map_err(|_| self.corrupt(format!("invalid value {:?}", self.line)))?;
            data.push(v);
        }

        let sequence = FeatureSequence::from_flat(self.dim, data)
            .map_err(|e| self.corrupt(e.to_string()))?;
        Ok(Some(TemplateRecord { label, sequence }))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<TemplateRecord, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(rec)) => {
                self.index += 1;
                Some(Ok(rec))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
