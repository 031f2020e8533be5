// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-size worker pool for offloading deferred work.
//!
//! The engine loop uses this to push the fixed-step render dispatch off the
//! timing thread. Workers block on a channel; a cooperative stop flag plus
//! channel disconnection shuts them down. This is the one fully thread-safe
//! primitive in the runtime.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// An error raised by the worker pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Work was submitted after [`WorkerPool::stop`].
    #[error("worker pool is stopped; task rejected")]
    Stopped,
    /// The task panicked while executing on a worker.
    #[error("task panicked on a worker thread: {0}")]
    TaskPanicked(String),
    /// The task was dropped before producing a result (pool torn down).
    #[error("task was dropped before completion")]
    Cancelled,
}

/// The receiving end of a submitted task's result.
///
/// Waiting surfaces the task's outcome, including a captured panic; the
/// worker that ran the task is unaffected either way.
#[derive(Debug)]
pub struct TaskHandle<T> {
    result_rx: crossbeam_channel::Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes and returns its result.
    pub fn wait(self) -> Result<T, PoolError> {
        match self.result_rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(PoolError::TaskPanicked(panic_message(&payload))),
            Err(_) => Err(PoolError::Cancelled),
        }
    }

    /// Returns the result if the task has already finished.
    pub fn try_wait(&self) -> Option<Result<T, PoolError>> {
        match self.result_rx.try_recv() {
            Ok(Ok(value)) => Some(Ok(value)),
            Ok(Err(payload)) => Some(Err(PoolError::TaskPanicked(panic_message(&payload)))),
            Err(crossbeam_channel::TryRecvError::Empty) => None,
            Err(crossbeam_channel::TryRecvError::Disconnected) => Some(Err(PoolError::Cancelled)),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// A fixed set of persistent worker threads draining a FIFO task queue.
///
/// `stop` is cooperative: each worker finishes its in-flight task, drains
/// what it can, and exits once the queue disconnects. Tasks still queued
/// when `stop` is observed may or may not run; callers must not rely on
/// drain-to-completion at stop time.
pub struct WorkerPool {
    job_tx: Option<crossbeam_channel::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    stopped: AtomicBool,
}

impl WorkerPool {
    /// Creates a pool with `threads` workers (minimum one).
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(threads);
        for index in 0..threads {
            let rx = job_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("lumen-worker-{index}"))
                .spawn(move || {
                    // recv returns Err once the sender is dropped and the
                    // queue is empty; that is the exit condition.
                    while let Ok(job) = rx.recv() {
                        job();
                    }
                    log::debug!("Worker thread exiting.");
                })
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }

        log::info!("WorkerPool started with {threads} worker(s).");
        Self {
            job_tx: Some(job_tx),
            workers,
            stopped: AtomicBool::new(false),
        }
    }

    /// Creates a pool sized to the host's available parallelism.
    pub fn with_default_threads() -> Self {
        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        Self::new(threads)
    }

    /// Submits `task` and returns a handle to its eventual result.
    ///
    /// Fails with [`PoolError::Stopped`] once [`stop`](Self::stop) has been
    /// called; a stopped pool never silently accepts work. A panic inside
    /// `task` is captured into the handle and does not kill the worker.
    pub fn submit<T, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(PoolError::Stopped);
        }
        let job_tx = self.job_tx.as_ref().ok_or(PoolError::Stopped)?;

        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task));
            if let Err(payload) = &outcome {
                log::warn!(
                    "Pooled task panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
            // The submitter may have dropped the handle; that's fine.
            let _ = result_tx.send(outcome);
        });

        job_tx.send(job).map_err(|_| PoolError::Stopped)?;
        Ok(TaskHandle { result_rx })
    }

    /// Fire-and-forget variant of [`submit`](Self::submit).
    pub fn execute<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(task).map(drop)
    }

    /// Returns `true` once the pool has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Signals all workers to exit and joins them. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        // Dropping the sender disconnects the queue and wakes every worker.
        self.job_tx.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("A worker thread terminated abnormally.");
            }
        }
        log::info!("WorkerPool stopped.");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
