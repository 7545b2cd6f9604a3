//! Task shape and queue ordering (§4.J).

use std::cmp::Ordering;

use domain::RepoId;

/// Fixed pipeline order per repository: ingest and parse run strictly
/// sequentially; the remaining five run as a fan-out, followed by the
/// barrier that marks the repo `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Ingest,
    Parse,
    Metrics,
    CallGraph,
    Embed,
    Duplication,
    Vulns,
}

impl TaskKind {
    /// Earlier phases have higher priority, so an ingest queued behind a
    /// pile of fan-out tasks from other repos still jumps ahead of new
    /// ingests queued after it (same phase, FIFO via `seq`).
    fn phase_rank(self) -> u8 {
        match self {
            TaskKind::Ingest => 0,
            TaskKind::Parse => 1,
            TaskKind::Metrics
            | TaskKind::CallGraph
            | TaskKind::Embed
            | TaskKind::Duplication
            | TaskKind::Vulns => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub repo_id: RepoId,
    pub kind: TaskKind,
    pub priority: u8,
    pub attempt: u32,
}

impl Task {
    pub fn new(repo_id: RepoId, kind: TaskKind) -> Self {
        Self { repo_id, kind, priority: 0, attempt: 0 }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

/// A queued task plus tie-breaking metadata. `BinaryHeap` is a max-heap, so
/// `Ord` is defined to put the task that should run *next* at the top:
/// higher `priority`, then earlier pipeline phase, then earlier `seq`
/// (FIFO within the same priority and phase).
#[derive(Debug, Clone)]
pub struct QueuedTask {
    pub task: Task,
    pub seq: u64,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.task
            .priority
            .cmp(&other.task.priority)
            .then_with(|| other.task.kind.phase_rank().cmp(&self.task.kind.phase_rank()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn earlier_phase_and_fifo_order_wins_at_equal_priority() {
        let mut heap = BinaryHeap::new();
        heap.push(QueuedTask { task: Task::new(RepoId(1), TaskKind::Metrics), seq: 2 });
        heap.push(QueuedTask { task: Task::new(RepoId(1), TaskKind::Ingest), seq: 1 });
        heap.push(QueuedTask { task: Task::new(RepoId(2), TaskKind::Ingest), seq: 3 });

        let first = heap.pop().unwrap();
        assert_eq!(first.task.kind, TaskKind::Ingest);
        assert_eq!(first.seq, 1);
    }

    #[test]
    fn higher_priority_wins_regardless_of_phase() {
        let mut heap = BinaryHeap::new();
        heap.push(QueuedTask { task: Task::new(RepoId(1), TaskKind::Ingest), seq: 1 });
        heap.push(QueuedTask {
            task: Task::new(RepoId(2), TaskKind::Embed).with_priority(5),
            seq: 2,
        });
        let first = heap.pop().unwrap();
        assert_eq!(first.task.kind, TaskKind::Embed);
    }
}
