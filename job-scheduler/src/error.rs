use domain::RepoId;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("repository {0} already has a pipeline run in progress")]
    AlreadyRunning(RepoId),
    #[error("task was cancelled")]
    Cancelled,
    #[error("task runner failed: {0}")]
    Runner(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
