use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use polaroid_studio_application::{
    ApplicationError, DecodeCompletion, DecodeJob, DecodeMetrics, DecodeOutcome, DecodePipeline,
    ImageDecoder,
};
use polaroid_studio_domain::BatchToken;
use tracing::{debug, warn};

#[derive(Default)]
struct MetricsState {
    submitted_jobs: u64,
    encoded_jobs: u64,
    failed_jobs: u64,
    skipped_jobs: u64,
}

impl MetricsState {
    fn snapshot(&self) -> DecodeMetrics {
        DecodeMetrics {
            submitted_jobs: self.submitted_jobs,
            encoded_jobs: self.encoded_jobs,
            failed_jobs: self.failed_jobs,
            skipped_jobs: self.skipped_jobs,
        }
    }

    fn record(&mut self, outcome: &DecodeOutcome) {
        match outcome {
            DecodeOutcome::Encoded(_) => self.encoded_jobs += 1,
            DecodeOutcome::Failed(_) => self.failed_jobs += 1,
            DecodeOutcome::Skipped => self.skipped_jobs += 1,
        }
    }
}

fn run_job(decoder: &dyn ImageDecoder, job: &DecodeJob, latest_batch: u64) -> DecodeOutcome {
    if job.batch.get() < latest_batch {
        return DecodeOutcome::Skipped;
    }
    match decoder.encode_data_url(&job.file) {
        Ok(data_url) => DecodeOutcome::Encoded(data_url),
        Err(error) => {
            warn!(file = %job.file.name, %error, "decode failed");
            DecodeOutcome::Failed(error.to_string())
        }
    }
}

/// Decodes on a small pool of worker threads. Results come back in
/// completion order, which is usually not submission order.
///
/// Only `supersede` moves the batch watermark. A worker checks it when it
/// picks a job up, so a job that is already decoding still completes.
pub struct ThreadedDecodePipeline {
    latest_batch: Arc<AtomicU64>,
    submit_tx: mpsc::Sender<DecodeJob>,
    result_rx: Mutex<mpsc::Receiver<DecodeCompletion>>,
    metrics: Arc<Mutex<MetricsState>>,
}

impl ThreadedDecodePipeline {
    pub fn new(decoder: Arc<dyn ImageDecoder>, workers: usize) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<DecodeJob>();
        let (result_tx, result_rx) = mpsc::channel::<DecodeCompletion>();
        let submit_rx = Arc::new(Mutex::new(submit_rx));
        let latest_batch = Arc::new(AtomicU64::new(0));
        let metrics = Arc::new(Mutex::new(MetricsState::default()));

        for worker in 0..workers.max(1) {
            spawn_worker(
                worker,
                Arc::clone(&submit_rx),
                result_tx.clone(),
                Arc::clone(&latest_batch),
                Arc::clone(&metrics),
                Arc::clone(&decoder),
            );
        }

        Self {
            latest_batch,
            submit_tx,
            result_rx: Mutex::new(result_rx),
            metrics,
        }
    }
}

impl DecodePipeline for ThreadedDecodePipeline {
    fn submit(&self, job: DecodeJob) -> Result<(), ApplicationError> {
        {
            let mut metrics = self
                .metrics
                .lock()
                .map_err(|_| ApplicationError::Pipeline("decode metrics lock poisoned".to_string()))?;
            metrics.submitted_jobs += 1;
        }
        self.submit_tx.send(job).map_err(|error| {
            ApplicationError::Pipeline(format!("failed to enqueue decode job: {error}"))
        })
    }

    fn supersede(&self, batch: BatchToken) {
        self.latest_batch.fetch_max(batch.get(), Ordering::SeqCst);
    }

    fn try_receive(&self) -> Result<Option<DecodeCompletion>, ApplicationError> {
        let receiver = self
            .result_rx
            .lock()
            .map_err(|_| ApplicationError::Pipeline("decode result lock poisoned".to_string()))?;

        match receiver.try_recv() {
            Ok(completion) => Ok(Some(completion)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ApplicationError::Pipeline(
                "decode result channel disconnected".to_string(),
            )),
        }
    }

    fn metrics(&self) -> Result<DecodeMetrics, ApplicationError> {
        let metrics = self
            .metrics
            .lock()
            .map_err(|_| ApplicationError::Pipeline("decode metrics lock poisoned".to_string()))?;
        Ok(metrics.snapshot())
    }
}

fn spawn_worker(
    worker: usize,
    submit_rx: Arc<Mutex<mpsc::Receiver<DecodeJob>>>,
    result_tx: mpsc::Sender<DecodeCompletion>,
    latest_batch: Arc<AtomicU64>,
    metrics: Arc<Mutex<MetricsState>>,
    decoder: Arc<dyn ImageDecoder>,
) {
    thread::spawn(move || loop {
        let job = match submit_rx.lock() {
            Ok(receiver) => receiver.recv(),
            Err(_) => return,
        };
        let Ok(job) = job else {
            debug!(worker, "decode worker shutting down");
            return;
        };

        let outcome = run_job(decoder.as_ref(), &job, latest_batch.load(Ordering::SeqCst));
        if let Ok(mut m) = metrics.lock() {
            m.record(&outcome);
        }

        let completion = DecodeCompletion {
            batch: job.batch,
            name: job.file.name,
            outcome,
        };
        if result_tx.send(completion).is_err() {
            return;
        }
    });
}

/// Runs every job on the calling thread during `try_receive`, in submission
/// order. Backs `run --deterministic`, where the gallery must follow the
/// folder listing.
pub struct InlineDecodePipeline {
    decoder: Arc<dyn ImageDecoder>,
    queue: RefCell<VecDeque<DecodeJob>>,
    latest_batch: RefCell<u64>,
    metrics: RefCell<MetricsState>,
}

impl InlineDecodePipeline {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            decoder,
            queue: RefCell::new(VecDeque::new()),
            latest_batch: RefCell::new(0),
            metrics: RefCell::new(MetricsState::default()),
        }
    }
}

impl DecodePipeline for InlineDecodePipeline {
    fn submit(&self, job: DecodeJob) -> Result<(), ApplicationError> {
        self.metrics.borrow_mut().submitted_jobs += 1;
        self.queue.borrow_mut().push_back(job);
        Ok(())
    }

    fn supersede(&self, batch: BatchToken) {
        let mut latest = self.latest_batch.borrow_mut();
        *latest = (*latest).max(batch.get());
    }

    fn try_receive(&self) -> Result<Option<DecodeCompletion>, ApplicationError> {
        let Some(job) = self.queue.borrow_mut().pop_front() else {
            return Ok(None);
        };
        let latest = *self.latest_batch.borrow();
        let outcome = run_job(self.decoder.as_ref(), &job, latest);
        self.metrics.borrow_mut().record(&outcome);
        Ok(Some(DecodeCompletion {
            batch: job.batch,
            name: job.file.name,
            outcome,
        }))
    }

    fn metrics(&self) -> Result<DecodeMetrics, ApplicationError> {
        Ok(self.metrics.borrow().snapshot())
    }
}
