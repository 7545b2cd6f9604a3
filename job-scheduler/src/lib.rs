//! Priority task queue with per-repository mutual exclusion, fan-out, and
//! retry/backoff (§4.J).

pub mod backoff;
pub mod error;
pub mod scheduler;
pub mod task;

pub use backoff::FailureKind;
pub use error::{Result, SchedulerError};
pub use scheduler::{JobScheduler, TaskFailure, TaskRunner};
pub use task::{Task, TaskKind};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use domain::RepoId;

    use super::*;

    struct RecordingRunner {
        seen: Mutex<Vec<(i64, TaskKind, u32)>>,
        completed: AtomicUsize,
        fail_once: TaskKind,
        failed_already: AtomicUsize,
    }

    impl RecordingRunner {
        fn new(fail_once: TaskKind) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                completed: AtomicUsize::new(0),
                fail_once,
                failed_already: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskRunner for RecordingRunner {
        async fn run(&self, task: &Task) -> std::result::Result<(), TaskFailure> {
            self.seen.lock().await.push((task.repo_id.get(), task.kind, task.attempt));
            if task.kind == self.fail_once && self.failed_already.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(TaskFailure::transient("simulated transient failure"));
            }
            Ok(())
        }

        async fn on_pipeline_complete(&self, _repo_id: RepoId) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ingest_then_parse_then_fanout_then_barrier() {
        let runner = RecordingRunner::new(TaskKind::Embed);
        let scheduler = JobScheduler::new(runner, 4);

        let handle = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(4).await })
        };

        scheduler.submit_pipeline(RepoId(1)).await;

        // Let the pipeline drain: ingest -> parse -> 5-way fanout, with one
        // retried transient failure along the way.
        tokio::time::sleep(Duration::from_secs(10)).await;
        handle.abort();

        let seen = scheduler.runner.seen.lock().await;
        let kinds: Vec<TaskKind> = seen.iter().map(|(_, k, _)| *k).collect();
        assert!(kinds.contains(&TaskKind::Ingest));
        assert!(kinds.contains(&TaskKind::Parse));
        for kind in [
            TaskKind::Metrics,
            TaskKind::CallGraph,
            TaskKind::Embed,
            TaskKind::Duplication,
            TaskKind::Vulns,
        ] {
            assert!(kinds.contains(&kind), "missing fan-out task {kind:?}");
        }
        assert_eq!(scheduler.runner.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_repository_never_reaches_barrier() {
        let runner = RecordingRunner::new(TaskKind::Vulns);
        let scheduler = JobScheduler::new(runner, 4);

        let handle = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(2).await })
        };

        scheduler.submit_pipeline(RepoId(7)).await;
        scheduler.cancel(RepoId(7)).await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.abort();

        assert_eq!(scheduler.runner.completed.load(Ordering::SeqCst), 0);
    }
}
