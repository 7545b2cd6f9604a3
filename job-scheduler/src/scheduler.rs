//! Queue draining, per-repository mutual exclusion, and retry/backoff
//! (§4.J, §5).
//!
//! The scheduler is deliberately blind to what a task *does* — ingesting,
//! parsing, embedding and so on are all implemented by the caller's
//! [`TaskRunner`]. This keeps job-scheduler decoupled from `store`,
//! `source-fetcher`, `callgraph`, etc., the same boundary discipline the
//! rest of this workspace uses everywhere a crate would otherwise have to
//! depend on everything else.
//!
//! Mutual exclusion guards only the sequential `Ingest -> Parse` chain: two
//! tasks of those kinds for the same `repository_id` never execute
//! concurrently, since each mutates the store the next one reads. The five
//! fan-out tasks (`Metrics`/`CallGraph`/`Embed`/`Duplication`/`Vulns`) carry
//! no such lock and run in parallel against each other, bounded only by the
//! worker pool's semaphore — `ingest -> parse -> (metrics || callgraph ||
//! embed || duplication || vulns)` (§5).

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify, Semaphore};
use tracing::{info, instrument, warn};

use domain::RepoId;

use crate::backoff::{self, FailureKind};
use crate::task::{QueuedTask, Task, TaskKind};

#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TaskFailure {
    pub fn transient(message: impl Into<String>) -> Self {
        Self { kind: FailureKind::Transient, message: message.into() }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self { kind: FailureKind::Permanent, message: message.into() }
    }
}

/// Implemented by the caller to actually execute a task. The scheduler
/// only knows how to queue, retry, and sequence these.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, task: &Task) -> Result<(), TaskFailure>;

    /// Fires once all five fan-out tasks for a repository have finished
    /// (successfully or exhausted their retries) — the pipeline barrier.
    async fn on_pipeline_complete(&self, _repo_id: RepoId) {}
}

const FANOUT: [TaskKind; 5] =
    [TaskKind::Metrics, TaskKind::CallGraph, TaskKind::Embed, TaskKind::Duplication, TaskKind::Vulns];

struct RepoLocks {
    locks: Mutex<HashMap<RepoId, Arc<Mutex<()>>>>,
}

impl RepoLocks {
    fn new() -> Self {
        Self { locks: Mutex::new(HashMap::new()) }
    }

    async fn get(&self, repo_id: RepoId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(repo_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

pub struct JobScheduler<R: TaskRunner> {
    pub(crate) runner: Arc<R>,
    queue: Mutex<BinaryHeap<QueuedTask>>,
    notify: Notify,
    seq: AtomicU64,
    repo_locks: RepoLocks,
    cancelled: Mutex<HashSet<RepoId>>,
    fanout_remaining: Mutex<HashMap<RepoId, usize>>,
    concurrency: Arc<Semaphore>,
}

impl<R: TaskRunner + 'static> JobScheduler<R> {
    pub fn new(runner: R, max_concurrency: usize) -> Arc<Self> {
        Arc::new(Self {
            runner: Arc::new(runner),
            queue: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            seq: AtomicU64::new(0),
            repo_locks: RepoLocks::new(),
            cancelled: Mutex::new(HashSet::new()),
            fanout_remaining: Mutex::new(HashMap::new()),
            concurrency: Arc::new(Semaphore::new(max_concurrency)),
        })
    }

    /// Enqueues the entry point of a new pipeline run (`Ingest`).
    pub async fn submit_pipeline(&self, repo_id: RepoId) {
        self.enqueue(Task::new(repo_id, TaskKind::Ingest)).await;
    }

    pub async fn enqueue(&self, task: Task) {
        let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        let mut queue = self.queue.lock().await;
        queue.push(QueuedTask { task, seq });
        drop(queue);
        self.notify.notify_one();
    }

    /// Cooperative cancellation: running tasks are not pre-empted, but no
    /// further task for this repository will start, and its fan-out
    /// barrier is dropped rather than waited on.
    pub async fn cancel(&self, repo_id: RepoId) {
        self.cancelled.lock().await.insert(repo_id);
    }

    async fn is_cancelled(&self, repo_id: RepoId) -> bool {
        self.cancelled.lock().await.contains(&repo_id)
    }

    async fn pop(&self) -> Task {
        loop {
            {
                let mut queue = self.queue.lock().await;
                if let Some(queued) = queue.pop() {
                    return queued.task;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Spawns `workers` worker loops draining the shared queue. Returns
    /// once `shutdown` is notified; in-flight tasks still run to
    /// completion.
    pub async fn run(self: &Arc<Self>, workers: usize) {
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let scheduler = self.clone();
            handles.push(tokio::spawn(async move { scheduler.worker_loop(id).await }));
        }
        for handle in handles {
            let _ = handle.await;
        }
    }

    #[instrument(skip(self), fields(worker = id))]
    async fn worker_loop(self: Arc<Self>, id: usize) {
        loop {
            let task = self.pop().await;
            if self.is_cancelled(task.repo_id).await {
                info!(repo_id = task.repo_id.get(), kind = ?task.kind, "skipping task for cancelled repository");
                continue;
            }
            let _permit = self.concurrency.acquire().await.expect("semaphore not closed");
            if matches!(task.kind, TaskKind::Ingest | TaskKind::Parse) {
                let repo_lock = self.repo_locks.get(task.repo_id).await;
                let _guard = repo_lock.lock().await;
                self.execute_with_retry(task).await;
            } else {
                self.execute_with_retry(task).await;
            }
        }
    }

    #[instrument(skip(self), fields(repo_id = task.repo_id.get(), kind = ?task.kind))]
    async fn execute_with_retry(&self, mut task: Task) {
        loop {
            task.attempt += 1;
            match self.runner.run(&task).await {
                Ok(()) => {
                    self.on_task_success(&task).await;
                    return;
                }
                Err(failure) => match failure.kind {
                    FailureKind::Permanent => {
                        warn!(error = %failure.message, "task failed permanently");
                        self.on_task_terminal(&task).await;
                        return;
                    }
                    FailureKind::Transient => {
                        if backoff::exhausted(task.attempt) {
                            warn!(error = %failure.message, attempts = task.attempt, "retries exhausted");
                            self.on_task_terminal(&task).await;
                            return;
                        }
                        let delay = backoff::delay_for(task.attempt);
                        warn!(error = %failure.message, attempt = task.attempt, delay_secs = delay.as_secs(), "retrying transient failure");
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }
    }

    async fn on_task_success(&self, task: &Task) {
        match task.kind {
            TaskKind::Ingest => self.enqueue(Task::new(task.repo_id, TaskKind::Parse)).await,
            TaskKind::Parse => self.start_fanout(task.repo_id).await,
            _ => self.complete_fanout_task(task.repo_id).await,
        }
    }

    /// A permanently-failed or retry-exhausted task still advances the
    /// pipeline: ingest/parse failures mean there is nothing left to run
    /// for this repository, and a fan-out task failing just means that
    /// one phase's results are missing, not that the barrier never fires.
    async fn on_task_terminal(&self, task: &Task) {
        match task.kind {
            TaskKind::Ingest | TaskKind::Parse => {}
            _ => self.complete_fanout_task(task.repo_id).await,
        }
    }

    async fn start_fanout(&self, repo_id: RepoId) {
        self.fanout_remaining.lock().await.insert(repo_id, FANOUT.len());
        for kind in FANOUT {
            self.enqueue(Task::new(repo_id, kind)).await;
        }
    }

    async fn complete_fanout_task(&self, repo_id: RepoId) {
        let done = {
            let mut remaining = self.fanout_remaining.lock().await;
            match remaining.get_mut(&repo_id) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    let done = *count == 0;
                    if done {
                        remaining.remove(&repo_id);
                    }
                    done
                }
                None => false,
            }
        };
        if done && !self.is_cancelled(repo_id).await {
            self.runner.on_pipeline_complete(repo_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Blocks every fan-out task on a `Barrier` sized to the full fan-out
    /// count; if the scheduler still serialised them behind the per-repo
    /// lock, the barrier would never release and the test would time out.
    struct FanoutRunner {
        barrier: Arc<Barrier>,
        completions: AtomicUsize,
    }

    #[async_trait]
    impl TaskRunner for FanoutRunner {
        async fn run(&self, task: &Task) -> Result<(), TaskFailure> {
            if task.kind == TaskKind::Ingest || task.kind == TaskKind::Parse {
                return Ok(());
            }
            self.barrier.wait().await;
            self.completions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn fanout_tasks_run_concurrently_not_behind_the_repo_lock() {
        let runner = FanoutRunner { barrier: Arc::new(Barrier::new(FANOUT.len())), completions: AtomicUsize::new(0) };
        let scheduler = JobScheduler::new(runner, FANOUT.len());
        scheduler.submit_pipeline(RepoId(1)).await;

        let scheduler_clone = scheduler.clone();
        let run_handle = tokio::spawn(async move { scheduler_clone.run(FANOUT.len()).await });

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if scheduler.runner.completions.load(Ordering::SeqCst) == FANOUT.len() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("fan-out tasks deadlocked instead of running concurrently");

        run_handle.abort();
    }
}
