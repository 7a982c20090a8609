use crate::{Outcome, PdfUnlocker, Result, UnlockConfig, UnlockError, UnlockRequest};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Identifies one submitted job.
pub type JobId = u64;

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sent from a worker thread when its job is done.
#[derive(Debug)]
pub struct WorkerEvent {
    pub job: JobId,
    pub outcome: Outcome,
}

// ── UnlockWorker ─────────────────────────────────────────────────────────────

/// Runs each unlock job on its own thread and hands the outcome back over a
/// channel.
///
/// Worker threads only own their request and a sender. The receiving end
/// stays here and is drained by whoever owns the worker, which is the
/// interactive thread in the desktop form.
pub struct UnlockWorker {
    unlocker: PdfUnlocker,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    waker: Option<Waker>,
    next_job: JobId,
}

impl UnlockWorker {
    pub fn new(config: UnlockConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            unlocker: PdfUnlocker::with_config(config),
            tx,
            rx,
            waker: None,
            next_job: 1,
        }
    }

    /// Call `waker` after every event is sent, e.g. to schedule a repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Start `request` on a new thread. Returns as soon as the thread exists.
    pub fn spawn(&mut self, request: UnlockRequest) -> Result<JobId> {
        let job = self.next_job;
        self.next_job += 1;

        let unlocker = self.unlocker.clone();
        let tx = self.tx.clone();
        let waker = self.waker.clone();

        thread::Builder::new()
            .name(format!("unlock-{job}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| unlocker.unlock(&request)));
                let outcome = result.unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    warn!(job, %message, "unlock worker panicked");
                    Err(UnlockError::WorkerPanicked(message))
                });
                drop(request);

                if tx.send(WorkerEvent { job, outcome }).is_err() {
                    debug!(job, "outcome dropped: receiver is gone");
                    return;
                }
                if let Some(wake) = waker {
                    wake();
                }
            })?;

        debug!(job, "unlock job started");
        Ok(job)
    }

    /// Next finished job, if any, without blocking.
    pub fn try_next(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Block for up to `timeout` waiting for a finished job.
    pub fn next_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
