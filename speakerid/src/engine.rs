use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use speakerid_dtw::{distance, FeatureSequence, Mode};
use speakerid_templates::{TemplateRecord, TemplateStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Config, Error};

/// Records handed to the worker threads per round when comparing in parallel.
const BATCH_PER_WORKER: usize = 16;

/// Outcome of [`Identifier::identify`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Label of the closest template.
    pub label: String,

    /// DTW distance to that template.
    pub distance: f64,

    /// Wall-clock time of the whole scan. Diagnostic only.
    pub elapsed: Duration,

    /// Insertion index of the winning template.
    pub index: usize,

    /// Number of templates compared.
    pub compared: usize,
}

/// One scored template, as returned by [`Identifier::rank`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub index: usize,
    pub label: String,
    pub distance: f64,
}

/// Matches probe sequences against every template in a store.
///
/// The closest template wins. On equal distances the template enrolled
/// first wins: a later candidate replaces the current best only if it is
/// strictly closer. Parallel comparison reduces in insertion order, so the
/// tie-break does not depend on thread scheduling.
pub struct Identifier {
    store: Arc<dyn TemplateStore>,
    workers: usize,
}

impl Identifier {
    pub fn new(cfg: &Config, store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            workers: cfg.workers.max(1),
        }
    }

    /// Returns the closest enrolled template to `probe`.
    ///
    /// Fails with [`Error::EmptyStore`] if nothing is enrolled and with
    /// [`Error::CorruptRecord`] if any stored record is unreadable; corrupt
    /// records are never skipped.
    pub fn identify(&self, probe: &FeatureSequence, mode: Mode) -> Result<MatchResult, Error> {
        self.identify_with_cancel(probe, mode, &CancellationToken::new())
    }

    /// Like [`identify`](Self::identify), checking `cancel` between template
    /// comparisons. Fails with [`Error::Cancelled`] once it is triggered.
    pub fn identify_with_cancel(
        &self,
        probe: &FeatureSequence,
        mode: Mode,
        cancel: &CancellationToken,
    ) -> Result<MatchResult, Error> {
        let start = Instant::now();
        let mut best: Option<Candidate> = None;
        let compared = self.evaluate(probe, mode, cancel, |c| {
            if best.as_ref().is_none_or(|b| c.distance < b.distance) {
                best = Some(c);
            }
        })?;
        let best = best.ok_or(Error::EmptyStore)?;
        let elapsed = start.elapsed();

        info!(
            label = %best.label,
            distance = best.distance,
            index = best.index,
            compared,
            %mode,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "speaker identified"
        );
        Ok(MatchResult {
            label: best.label,
            distance: best.distance,
            elapsed,
            index: best.index,
            compared,
        })
    }

    /// Returns the `k` closest templates ordered by `(distance, index)`.
    /// `k == 0` returns every template.
    pub fn rank(&self, probe: &FeatureSequence, mode: Mode, k: usize) -> Result<Vec<Candidate>, Error> {
        self.rank_with_cancel(probe, mode, k, &CancellationToken::new())
    }

    pub fn rank_with_cancel(
        &self,
        probe: &FeatureSequence,
        mode: Mode,
        k: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, Error> {
        let mut all = Vec::new();
        self.evaluate(probe, mode, cancel, |c| all.push(c))?;
        if all.is_empty() {
            return Err(Error::EmptyStore);
        }
        all.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        if k > 0 {
            all.truncate(k);
        }
        Ok(all)
    }

    /// Scores every stored template, calling `visit` in insertion order.
    /// Returns the number of templates compared.
    fn evaluate(
        &self,
        probe: &FeatureSequence,
        mode: Mode,
        cancel: &CancellationToken,
        mut visit: impl FnMut(Candidate),
    ) -> Result<usize, Error> {
        probe.ensure_matchable(self.store.dim())?;

        let mut records = self.store.scan()?.enumerate();
        let mut compared = 0;

        if self.workers <= 1 {
            for (index, rec) in records {
                check_cancel(cancel, compared)?;
                let rec = rec?;
                visit(score(probe, index, rec, mode)?);
                compared += 1;
            }
            return Ok(compared);
        }

        let batch_size = self.workers * BATCH_PER_WORKER;
        loop {
            check_cancel(cancel, compared)?;
            let batch: Vec<(usize, TemplateRecord)> = records
                .by_ref()
                .take(batch_size)
                .map(|(i, r)| r.map(|r| (i, r)))
                .collect::<Result<_, _>>()?;
            if batch.is_empty() {
                return Ok(compared);
            }
            debug!(size = batch.len(), first = batch[0].0, "scoring template batch");

            for c in self.score_parallel(probe, batch, mode, cancel)? {
                visit(c);
                compared += 1;
            }
        }
    }

    /// Scores a batch on scoped threads; results come back in batch order.
    fn score_parallel(
        &self,
        probe: &FeatureSequence,
        batch: Vec<(usize, TemplateRecord)>,
        mode: Mode,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, Error> {
        let chunk = batch.len().div_ceil(self.workers);
        let mut chunks: Vec<Vec<(usize, TemplateRecord)>> = Vec::with_capacity(self.workers);
        let mut rest = batch.into_iter();
        loop {
            let part: Vec<_> = rest.by_ref().take(chunk).collect();
            if part.is_empty() {
                break;
            }
            chunks.push(part);
        }

        let results: Vec<Result<Vec<Candidate>, Error>> = thread::scope(|s| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|part| {
                    s.spawn(move || {
                        let mut out = Vec::with_capacity(part.len());
                        for (index, rec) in part {
                            if cancel.is_cancelled() {
                                return Err(Error::Cancelled);
                            }
                            out.push(score(probe, index, rec, mode)?);
                        }
                        Ok(out)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut out = Vec::new();
        for r in results {
            out.extend(r?);
        }
        Ok(out)
    }
}

fn score(
    probe: &FeatureSequence,
    index: usize,
    rec: TemplateRecord,
    mode: Mode,
) -> Result<Candidate, Error> {
    let d = distance(probe, &rec.sequence, mode)?;
    Ok(Candidate {
        index,
        label: rec.label,
        distance: d,
    })
}

fn check_cancel(cancel: &CancellationToken, compared: usize) -> Result<(), Error> {
    if cancel.is_cancelled() {
        warn!(compared, "identification cancelled");
        return Err(Error::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use speakerid_templates::{MemoryStore, Records, StoreError};

    use super::*;

    fn seq(frames: &[[f32; 2]]) -> FeatureSequence {
        FeatureSequence::from_frames(frames).unwrap()
    }

    fn store_with(records: Vec<(&str, Vec<[f32; 2]>)>) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new(2).unwrap());
        for (label, frames) in records {
            store
                .append(&TemplateRecord::new(label, seq(&frames)).unwrap())
                .unwrap();
        }
        store
    }

    fn identifier(store: Arc<MemoryStore>, workers: usize) -> Identifier {
        Identifier::new(
            &Config {
                dim: 2,
                mode: Mode::Full,
                workers,
            },
            store,
        )
    }

    #[test]
    fn exact_copy_wins() {
        let a = vec![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0]];
        let b = vec![[-4.0, 5.0], [0.0, 0.0]];
        let id = identifier(store_with(vec![("alice", a.clone()), ("bob", b)]), 1);

        let m = id.identify(&seq(&a), Mode::Full).unwrap();
        assert_eq!(m.label, "alice");
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.index, 0);
        assert_eq!(m.compared, 2);
    }

    #[test]
    fn first_enrolled_wins_ties() {
        let t = vec![[1.0, 1.0]];
        let id = identifier(
            store_with(vec![("carol", t.clone()), ("dave", t.clone()), ("carol", t.clone())]),
            1,
        );
        let m = id.identify(&seq(&[[0.0, 1.0]]), Mode::Banded).unwrap();
        assert_eq!(m.label, "carol");
        assert_eq!(m.index, 0);
        assert_eq!(m.distance, 1.0);

        let id = identifier(store_with(vec![("dave", t.clone()), ("carol", t)]), 1);
        let m = id.identify(&seq(&[[0.0, 1.0]]), Mode::Banded).unwrap();
        assert_eq!(m.label, "dave");
    }

    #[test]
    fn empty_store() {
        let id = identifier(store_with(vec![]), 1);
        assert!(matches!(
            id.identify(&seq(&[[0.0, 0.0]]), Mode::Full),
            Err(Error::EmptyStore)
        ));
        assert!(matches!(
            id.rank(&seq(&[[0.0, 0.0]]), Mode::Full, 3),
            Err(Error::EmptyStore)
        ));
    }

    #[test]
    fn probe_is_validated() {
        let id = identifier(store_with(vec![("alice", vec![[0.0, 0.0]])]), 1);
        assert!(matches!(
            id.identify(&FeatureSequence::empty(), Mode::Full),
            Err(Error::EmptySequence)
        ));
        let wrong = FeatureSequence::from_flat(3, vec![0.0; 3]).unwrap();
        assert!(matches!(
            id.identify(&wrong, Mode::Full),
            Err(Error::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn rank_orders_by_distance_then_index() {
        let id = identifier(
            store_with(vec![
                ("far", vec![[9.0, 9.0]]),
                ("near", vec![[1.0, 0.0]]),
                ("exact", vec![[0.0, 0.0]]),
                ("near-again", vec![[0.0, 1.0]]),
            ]),
            1,
        );
        let probe = seq(&[[0.0, 0.0]]);
        let ranked = id.rank(&probe, Mode::Full, 3).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["exact", "near", "near-again"]);

        assert_eq!(id.rank(&probe, Mode::Full, 0).unwrap().len(), 4);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut records: Vec<(String, Vec<[f32; 2]>)> = Vec::new();
        for i in 0..100 {
            let v = (i % 10) as f32;
            let frames: Vec<[f32; 2]> = (0..1 + i % 4).map(|k| [v, k as f32]).collect();
            records.push((format!("s{}", i % 10), frames));
        }
        let store = Arc::new(MemoryStore::new(2).unwrap());
        for (label, frames) in &records {
            store
                .append(&TemplateRecord::new(label.as_str(), seq(frames)).unwrap())
                .unwrap();
        }

        let probe = seq(&[[3.0, 0.0], [3.0, 1.0]]);
        let seq_id = identifier(Arc::clone(&store), 1);
        let par_id = identifier(store, 4);
        for mode in [Mode::Full, Mode::Banded] {
            let a = seq_id.identify(&probe, mode).unwrap();
            let b = par_id.identify(&probe, mode).unwrap();
            assert_eq!((a.label.as_str(), a.index, a.distance), (b.label.as_str(), b.index, b.distance));
            assert_eq!(b.compared, 100);
            assert_eq!(
                seq_id.rank(&probe, mode, 0).unwrap(),
                par_id.rank(&probe, mode, 0).unwrap()
            );
        }
    }

    /// Cancels `token` as soon as record `after` has been read from a scan.
    struct CancelAfter {
        inner: Arc<MemoryStore>,
        after: usize,
        token: CancellationToken,
    }

    impl TemplateStore for CancelAfter {
        fn dim(&self) -> usize {
            self.inner.dim()
        }

        fn append(&self, record: &TemplateRecord) -> Result<(), StoreError> {
            self.inner.append(record)
        }

        fn scan(&self) -> Result<Records<'_>, StoreError> {
            let token = self.token.clone();
            let after = self.after;
            Ok(Box::new(self.inner.scan()?.enumerate().map(move |(i, r)| {
                if i == after {
                    token.cancel();
                }
                r
            })))
        }
    }

    fn ten_templates() -> Arc<MemoryStore> {
        store_with(
            (0..10)
                .map(|i| ("alice", vec![[i as f32, 0.0], [i as f32, 1.0]]))
                .collect(),
        )
    }

    #[test]
    fn cancel_between_comparisons_stops_the_scan() {
        let id = identifier(ten_templates(), 1);
        let cancel = CancellationToken::new();
        let mut visited = 0;
        let res = id.evaluate(&seq(&[[0.0, 0.0]]), Mode::Full, &cancel, |_| {
            visited += 1;
            if visited == 3 {
                cancel.cancel();
            }
        });
        assert!(matches!(res, Err(Error::Cancelled)));
        assert_eq!(visited, 3);
    }

    #[test]
    fn cancel_mid_scan() {
        for workers in [1, 4] {
            let token = CancellationToken::new();
            let store = Arc::new(CancelAfter {
                inner: ten_templates(),
                after: 4,
                token: token.clone(),
            });
            let id = Identifier::new(
                &Config {
                    dim: 2,
                    mode: Mode::Full,
                    workers,
                },
                store,
            );
            let probe = seq(&[[0.0, 0.0]]);
            assert!(
                matches!(
                    id.identify_with_cancel(&probe, Mode::Full, &token),
                    Err(Error::Cancelled)
                ),
                "workers {workers}"
            );
            assert!(matches!(
                id.rank_with_cancel(&probe, Mode::Full, 0, &token),
                Err(Error::Cancelled)
            ));

            // Without cancellation the same store is scanned to the end.
            let m = id.identify(&probe, Mode::Full).unwrap();
            assert_eq!(m.compared, 10);
        }
    }

    #[test]
    fn cancelled_before_first_comparison() {
        let id = identifier(store_with(vec![("alice", vec![[0.0, 0.0]])]), 1);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            id.identify_with_cancel(&seq(&[[0.0, 0.0]]), Mode::Full, &cancel),
            Err(Error::Cancelled)
        ));

        let id = identifier(store_with(vec![("alice", vec![[0.0, 0.0]])]), 3);
        assert!(matches!(
            id.identify_with_cancel(&seq(&[[0.0, 0.0]]), Mode::Full, &cancel),
            Err(Error::Cancelled)
        ));
    }
}
