//! Background and parallel extraction over batches of texts.
//!
//! [`BatchInterface`] runs a batch on a worker thread and streams one
//! [`BatchRow`] per text back over a channel. Batches can be cancelled by id;
//! cancellation is cooperative and observed between texts.
//!
//! [`extract_parallel`] splits a batch across scoped threads. All of them read
//! the same grammar, which is never mutated after it is built.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{KopeckError, Result};
use crate::money::{Extractor, MoneyMatch};
use crate::token::Tagger;

/// Matches found in one text of a batch.
#[derive(Debug)]
pub struct BatchRow {
    /// Position of the text in the submitted batch.
    pub index: usize,
    pub matches: Result<Vec<MoneyMatch>>,
}

/// Cancellation token shared with the worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

/// Opaque batch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

/// Handle to a running or completed batch.
pub struct BatchHandle {
    pub id: BatchId,
    cancel: CancelToken,
    started: Instant,
    join: Option<JoinHandle<()>>,
    pub results: Receiver<BatchRow>,
}
impl BatchHandle {
    /// Request cancellation (cooperative). Texts already processed stay in the channel.
    pub fn cancel(&self) { self.cancel.cancel(); }
    /// Elapsed time since start.
    pub fn elapsed(&self) -> Duration { self.started.elapsed() }
    /// Drain every row and wait for the worker to finish.
    pub fn collect(mut self) -> Vec<BatchRow> {
        let rows: Vec<BatchRow> = self.results.iter().collect();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!(id = ?self.id, "batch worker panicked");
            }
        }
        rows
    }
}

/// Batch submission options.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Texts not started before the deadline are skipped.
    pub timeout: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Active = Arc<Mutex<HashMap<BatchId, CancelToken>>>;

/// Registry managing batch lifecycles.
pub struct BatchInterface<T: Tagger + 'static> {
    extractor: Arc<Extractor<T>>,
    next_id: Mutex<u64>,
    active: Active,
}

impl<T: Tagger + 'static> BatchInterface<T> {
    pub fn new(extractor: Arc<Extractor<T>>) -> Self {
        Self { extractor, next_id: Mutex::new(0), active: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn allocate_id(&self) -> BatchId {
        let mut g = lock(&self.next_id);
        *g += 1;
        BatchId(*g)
    }

    /// Submit texts for extraction on a background thread.
    pub fn start_batch(&self, texts: Vec<String>, options: BatchOptions) -> BatchHandle {
        let id = self.allocate_id();
        let cancel = CancelToken::new();
        lock(&self.active).insert(id, cancel.clone());

        let (tx, rx) = mpsc::channel();
        let extractor = Arc::clone(&self.extractor);
        let active = Arc::clone(&self.active);
        let cancel_for_thread = cancel.clone();
        let started = Instant::now();
        let deadline = options.timeout.map(|d| started + d);
        let join = std::thread::spawn(move || {
            let total = texts.len();
            for (index, text) in texts.into_iter().enumerate() {
                if cancel_for_thread.is_cancelled() {
                    info!(?id, index, total, "batch cancelled");
                    break;
                }
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    info!(?id, index, total, "batch timed out");
                    break;
                }
                let matches = extractor.extract(&text);
                if tx.send(BatchRow { index, matches }).is_err() {
                    debug!(?id, "batch receiver dropped");
                    break;
                }
            }
            lock(&active).remove(&id);
        });

        BatchHandle { id, cancel, started, join: Some(join), results: rx }
    }

    /// Run a batch synchronously on the current thread.
    pub fn run_sync(&self, texts: &[String]) -> Vec<Result<Vec<MoneyMatch>>> {
        texts.iter().map(|text| self.extractor.extract(text)).collect()
    }

    /// Cancel a batch by id. False when it is unknown or already finished.
    pub fn cancel(&self, id: BatchId) -> bool {
        if let Some(tok) = lock(&self.active).get(&id) {
            tok.cancel();
            true
        } else { false }
    }
}

/// Extracts from every text using up to `workers` threads. Results are in
/// input order.
pub fn extract_parallel<T, S>(extractor: &Extractor<T>, texts: &[S], workers: usize) -> Vec<Result<Vec<MoneyMatch>>>
where
    T: Tagger,
    S: AsRef<str> + Sync,
{
    if texts.is_empty() {
        return Vec::new();
    }
    let chunk = texts.len().div_ceil(workers.max(1));
    std::thread::scope(|scope| {
        let handles: Vec<_> = texts
            .chunks(chunk)
            .map(|part| {
                let worker = scope.spawn(move || {
                    part.iter().map(|text| extractor.extract(text.as_ref())).collect::<Vec<_>>()
                });
                (part.len(), worker)
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|(len, worker)| {
                worker.join().unwrap_or_else(|_| {
                    warn!(len, "extraction worker panicked");
                    (0..len)
                        .map(|_| Err(KopeckError::Invariant("extraction worker panicked".into())))
                        .collect()
                })
            })
            .collect()
    })
}
