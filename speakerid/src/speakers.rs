use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use speakerid_dtw::{FeatureSequence, Mode};
use speakerid_templates::{FileStore, MemoryStore, TemplateStore};
use tokio_util::sync::CancellationToken;

use crate::{Candidate, Config, Enroller, Error, Identifier, MatchResult};

/// Templates enrolled under one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub templates: usize,
    pub frames: usize,
}

/// Enrollment and identification over one shared template store.
///
/// Thread-safe: all methods can be called concurrently.
pub struct SpeakerId {
    cfg: Config,
    store: Arc<dyn TemplateStore>,
    enroller: Enroller,
    identifier: Identifier,
}

impl SpeakerId {
    /// Creates a SpeakerId over `store`, whose frame dimension must match
    /// `cfg.dim`.
    pub fn new(cfg: Config, store: Arc<dyn TemplateStore>) -> Result<Self, Error> {
        let cfg = cfg.with_defaults();
        if store.dim() != cfg.dim {
            return Err(Error::DimensionMismatch {
                expected: cfg.dim,
                got: store.dim(),
            });
        }
        Ok(Self {
            enroller: Enroller::new(Arc::clone(&store)),
            identifier: Identifier::new(&cfg, Arc::clone(&store)),
            cfg,
            store,
        })
    }

    /// Creates a SpeakerId with an in-memory store.
    pub fn with_memory_store(cfg: Config) -> Result<Self, Error> {
        let cfg = cfg.with_defaults();
        let store = MemoryStore::new(cfg.dim)?;
        Self::new(cfg, Arc::new(store))
    }

    /// Creates a SpeakerId backed by the template file at `path`.
    pub fn open(cfg: Config, path: impl AsRef<Path>) -> Result<Self, Error> {
        let cfg = cfg.with_defaults();
        let store = FileStore::open(path, cfg.dim)?;
        Self::new(cfg, Arc::new(store))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }

    /// See [`Enroller::validate`].
    pub fn validate(&self, label: &str, sequence: &FeatureSequence) -> Result<(), Error> {
        self.enroller.validate(label, sequence)
    }

    /// See [`Enroller::enroll`].
    pub fn enroll(&self, label: &str, sequence: FeatureSequence) -> Result<(), Error> {
        self.enroller.enroll(label, sequence)
    }

    /// See [`Identifier::identify`].
    pub fn identify(&self, probe: &FeatureSequence, mode: Mode) -> Result<MatchResult, Error> {
        self.identifier.identify(probe, mode)
    }

    /// See [`Identifier::identify_with_cancel`].
    pub fn identify_with_cancel(
        &self,
        probe: &FeatureSequence,
        mode: Mode,
        cancel: &CancellationToken,
    ) -> Result<MatchResult, Error> {
        self.identifier.identify_with_cancel(probe, mode, cancel)
    }

    /// See [`Identifier::rank_with_cancel`].
    pub fn rank(
        &self,
        probe: &FeatureSequence,
        mode: Mode,
        k: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, Error> {
        self.identifier.rank_with_cancel(probe, mode, k, cancel)
    }

    /// Lists enrolled labels in order of first enrollment.
    pub fn labels(&self) -> Result<Vec<LabelSummary>, Error> {
        let mut out: Vec<LabelSummary> = Vec::new();
        let mut pos: HashMap<String, usize> = HashMap::new();
        for rec in self.store.scan()? {
            let rec = rec?;
            let frames = rec.sequence.len();
            match pos.get(&rec.label) {
                Some(&i) => {
                    out[i].templates += 1;
                    out[i].frames += frames;
                }
                None => {
                    pos.insert(rec.label.clone(), out.len());
                    out.push(LabelSummary {
                        label: rec.label,
                        templates: 1,
                        frames,
                    });
                }
            }
        }
        Ok(out)
    }
}
