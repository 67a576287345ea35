//! # Thread-affine dispatcher.
//!
//! [`Dispatcher`] hands units of work ("jobs") to the single delivery thread.
//! A job submitted from the delivery thread runs inline; a job submitted from
//! any other thread goes through an unbounded [`tokio::sync::mpsc`] queue that the
//! delivery thread drains.
//!
//! ## Architecture
//! ```text
//! Producers (any thread):             Delivery thread:
//!   Bus::post ──┐
//!   Controller ─┼──► Dispatcher::run ──► [unbounded queue] ──► DeliveryLoop ──► job()
//!   ...       ──┘        │
//!                        └── already on delivery thread ──► job() inline
//! ```
//!
//! ## Rules
//! - **Inline on delivery**: `run()` from the delivery thread executes the job before returning.
//! - **Never blocks**: `run()` from elsewhere enqueues and returns immediately.
//! - **Per-producer FIFO**: jobs from one thread run in submission order; no global order
//!   across threads.
//! - **No cancellation**: an enqueued job runs unless the loop goes away.
//! - **Drop, don't fail**: if the loop is gone the job is logged and dropped.
//! - **Panics propagate**: a panicking job unwinds on the delivery thread.
//!
//! ## Driving the loop
//! - [`DeliveryLoop::pump`] for hosts that own their UI loop (call once per frame/tick);
//! - [`DeliveryLoop::run`] to await jobs on a tokio runtime until cancelled;
//! - [`Dispatcher::spawn`] for a dedicated delivery thread.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::thread::{self, JoinHandle, ThreadId};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::DispatchError;

/// A unit of work for the delivery thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Substitutable seam for thread-affine execution.
///
/// [`Dispatcher`] is the production implementation; tests may provide their own.
pub trait Dispatch: Send + Sync {
    /// True when the calling thread is the delivery thread.
    fn is_delivery_context(&self) -> bool;

    /// Runs `job` on the delivery thread: inline if already there, queued otherwise.
    fn run(&self, job: Job);
}

/// Cloneable, thread-safe handle for submitting jobs to the delivery thread.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
    delivery: ThreadId,
    depth: Arc<AtomicUsize>,
    warn_depth: Option<usize>,
}

impl Dispatcher {
    /// Makes the **calling thread** the delivery thread.
    ///
    /// The returned [`DeliveryLoop`] cannot leave this thread; drive it with
    /// [`DeliveryLoop::pump`] or [`DeliveryLoop::run`].
    pub fn attach_current(cfg: &Config) -> (Dispatcher, DeliveryLoop) {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let depth = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher {
            tx,
            delivery: thread::current().id(),
            depth: depth.clone(),
            warn_depth: cfg.queue_warn_threshold(),
        };
        let delivery = DeliveryLoop {
            rx,
            depth,
            _local: PhantomData,
        };
        (dispatcher, delivery)
    }

    /// Starts a dedicated delivery thread named `cfg.thread_name`.
    ///
    /// The thread exits once every [`Dispatcher`] clone has been dropped and the
    /// queue is drained.
    pub fn spawn(cfg: &Config) -> std::io::Result<(Dispatcher, DeliveryThread)> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let depth = Arc::new(AtomicUsize::new(0));
        let loop_depth = depth.clone();

        let handle = thread::Builder::new()
            .name(cfg.thread_name.clone())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    loop_depth.fetch_sub(1, AtomicOrdering::AcqRel);
                    job();
                }
                debug!("delivery thread exiting: all dispatchers dropped");
            })?;

        let dispatcher = Dispatcher {
            tx,
            delivery: handle.thread().id(),
            depth,
            warn_depth: cfg.queue_warn_threshold(),
        };
        Ok((dispatcher, DeliveryThread { handle }))
    }

    /// Number of jobs queued and not yet started.
    pub fn pending(&self) -> usize {
        self.depth.load(AtomicOrdering::Acquire)
    }

    /// Identity of the delivery thread.
    pub fn delivery_thread(&self) -> ThreadId {
        self.delivery
    }

    fn enqueue(&self, job: Job) {
        let depth = self.depth.fetch_add(1, AtomicOrdering::AcqRel) + 1;
        if self.warn_depth.is_some_and(|limit| depth > limit) {
            warn!(depth, "delivery queue is backing up; is the delivery loop being driven?");
        }

        if self.tx.send(job).is_err() {
            self.depth.fetch_sub(1, AtomicOrdering::AcqRel);
            let err = DispatchError::TargetUnavailable {
                reason: "delivery loop closed",
            };
            warn!(label = err.as_label(), "{err}; dropping job");
        }
    }
}

impl Dispatch for Dispatcher {
    fn is_delivery_context(&self) -> bool {
        thread::current().id() == self.delivery
    }

    fn run(&self, job: Job) {
        if self.is_delivery_context() {
            job();
        } else {
            self.enqueue(job);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("delivery", &self.delivery)
            .field("pending", &self.pending())
            .finish()
    }
}

/// Receiving end of a [`Dispatcher`], pinned to the delivery thread.
///
/// Dropping it makes later cross-thread submissions log and drop.
pub struct DeliveryLoop {
    rx: mpsc::UnboundedReceiver<Job>,
    depth: Arc<AtomicUsize>,
    // keeps the loop on the thread that attached it
    _local: PhantomData<*const ()>,
}

impl DeliveryLoop {
    /// Runs every job queued so far (and any queued while running), then returns.
    ///
    /// Returns the number of jobs executed.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            self.depth.fetch_sub(1, AtomicOrdering::AcqRel);
            job();
            ran += 1;
        }
        ran
    }

    /// Awaits and runs jobs until `token` is cancelled or every dispatcher is dropped.
    ///
    /// Must be awaited on the delivery thread (e.g. a current-thread runtime or `LocalSet`).
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                job = self.rx.recv() => match job {
                    Some(job) => {
                        self.depth.fetch_sub(1, AtomicOrdering::AcqRel);
                        job();
                    }
                    None => break,
                }
            }
        }
        debug!("delivery loop stopped");
    }
}

/// Handle to the thread started by [`Dispatcher::spawn`].
pub struct DeliveryThread {
    handle: JoinHandle<()>,
}

impl DeliveryThread {
    /// Identity of the delivery thread.
    pub fn thread_id(&self) -> ThreadId {
        self.handle.thread().id()
    }

    /// Waits for the thread to exit (after all dispatchers are dropped).
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[test]
    fn test_inline_on_delivery_thread() {
        let (dispatcher, mut delivery) = Dispatcher::attach_current(&Config::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        dispatcher.run(Box::new(move || {
            h.fetch_add(1, AtomicOrdering::SeqCst);
        }));

        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(delivery.pump(), 0);
    }

    #[test]
    fn test_cross_thread_jobs_run_on_delivery_in_order() {
        let (dispatcher, mut delivery) = Dispatcher::attach_current(&Config::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let producer = {
            let dispatcher = dispatcher.clone();
            let seen = seen.clone();
            thread::spawn(move || {
                for i in 0..5 {
                    let seen = seen.clone();
                    dispatcher.run(Box::new(move || {
                        seen.lock().push((i, thread::current().id()));
                    }));
                }
            })
        };
        producer.join().unwrap();

        assert!(seen.lock().is_empty());
        assert_eq!(dispatcher.pending(), 5);
        assert_eq!(delivery.pump(), 5);
        assert_eq!(dispatcher.pending(), 0);

        let seen = seen.lock();
        let order: Vec<i32> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(seen.iter().all(|(_, t)| *t == thread::current().id()));
    }

    #[test]
    fn test_job_dropped_after_loop_is_gone() {
        let (dispatcher, delivery) = Dispatcher::attach_current(&Config::default());
        drop(delivery);

        let hits = Arc::new(AtomicUsize::new(0));
        let producer = {
            let dispatcher = dispatcher.clone();
            let hits = hits.clone();
            thread::spawn(move || {
                dispatcher.run(Box::new(move || {
                    hits.fetch_add(1, AtomicOrdering::SeqCst);
                }));
            })
        };
        producer.join().unwrap();

        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn test_spawned_delivery_thread() {
        let cfg = Config {
            thread_name: "test-delivery".into(),
            ..Config::default()
        };
        let (dispatcher, thread) = Dispatcher::spawn(&cfg).unwrap();
        assert!(!dispatcher.is_delivery_context());
        assert_eq!(dispatcher.delivery_thread(), thread.thread_id());

        let (tx, rx) = std::sync::mpsc::channel();
        dispatcher.run(Box::new(move || {
            let name = thread::current().name().map(str::to_owned);
            let _ = tx.send(name);
        }));
        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("test-delivery"));

        drop(dispatcher);
        thread.join().unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_run_until_cancelled() {
        let (dispatcher, delivery) = Dispatcher::attach_current(&Config::default());
        let token = CancellationToken::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let producer = {
            let dispatcher = dispatcher.clone();
            let hits = hits.clone();
            let token = token.clone();
            thread::spawn(move || {
                let h = hits.clone();
                dispatcher.run(Box::new(move || {
                    h.fetch_add(1, AtomicOrdering::SeqCst);
                }));
                // cancellation is itself a job so it lands after the first one
                dispatcher.run(Box::new(move || token.cancel()));
            })
        };

        delivery.run(token).await;
        producer.join().unwrap();
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }
}
