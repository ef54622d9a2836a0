//! # Tracking of asynchronous operations
//!
//! Every accepted mutating call hands back the uuid of a task. The
//! [TaskPoller] fetches that task at a fixed interval until its status is no
//! longer in progress (`PENDING` or `RUNNING`). Any other status, `QUEUED`
//! included, ends the wait and is reported as received, known or not.
//!
//! A wait also ends when the optional deadline passes or when its
//! cancellation token is triggered, even in the middle of a sleep. A failed
//! fetch ends the wait at once without retry.
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use crate::{
    client::PilotError,
    repository::{Kind, Repository, RepositoryError},
};
use prismpilot_models::models::{Task, TaskStatus};

/// How a wait on a task ended
#[derive(Debug)]
pub enum TaskOutcome {
    /// The task reached a terminal status, successful or not
    Completed(Task),
    /// Fetching the task failed, its state is unknown
    Error(RepositoryError),
    Cancelled,
    TimedOut,
}

impl TaskOutcome {
    /// Terminal status of the task, if it reached one
    pub fn status(&self) -> Option<&TaskStatus> {
        match self {
            TaskOutcome::Completed(task) => Some(&task.status),
            _ => None,
        }
    }

    /// `Ok` only for a task that succeeded.
    pub fn into_result(self, task: Uuid) -> Result<Task, PilotError> {
        match self {
            TaskOutcome::Completed(completed) if completed.status == TaskStatus::Succeeded => {
                Ok(completed)
            }
            TaskOutcome::Completed(completed) => Err(PilotError::TaskFailed {
                task,
                status: completed.status,
            }),
            TaskOutcome::Error(source) => Err(PilotError::TaskError { task, source }),
            TaskOutcome::Cancelled => Err(PilotError::Cancelled(task)),
            TaskOutcome::TimedOut => Err(PilotError::TimedOut(task)),
        }
    }
}

#[derive(Debug)]
pub struct TaskPoller<'a, R: Repository> {
    repository: &'a R,
    interval: Duration,
    deadline: Option<Duration>,
    cancellation: CancellationToken,
}

impl<'a, R: Repository> TaskPoller<'a, R> {
    pub fn new(repository: &'a R, interval: Duration) -> TaskPoller<'a, R> {
        TaskPoller {
            repository,
            interval,
            deadline: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Give up once this much time has passed since the wait started
    pub fn with_deadline(mut self, deadline: Duration) -> TaskPoller<'a, R> {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> TaskPoller<'a, R> {
        self.cancellation = cancellation;
        self
    }

    /// Fetch the current state of the task once
    pub async fn fetch(&self, task: Uuid) -> Result<Task, RepositoryError> {
        let json = self.repository.get(Kind::Task, &task.to_string()).await?;
        trace!("Task {} read as {}", task, json);
        serde_json::from_value(json).map_err(RepositoryError::Deserialize)
    }

    #[instrument(skip(self), fields(task = %task))]
    pub async fn wait(&self, task: Uuid) -> TaskOutcome {
        let deadline = self.deadline.map(|deadline| Instant::now() + deadline);
        loop {
            if self.cancellation.is_cancelled() {
                debug!("Wait on task {} cancelled", task);
                return TaskOutcome::Cancelled;
            }

            let current = match self.fetch(task).await {
                Ok(current) => current,
                Err(e) => {
                    warn!("Could not fetch task {}: {}", task, e);
                    return TaskOutcome::Error(e);
                }
            };
            if !current.status.is_in_progress() {
                debug!("Task {} ended with status {}", task, current.status);
                return TaskOutcome::Completed(current);
            }
            debug!(
                "Task {} is {} ({}%)",
                task,
                current.status,
                current.percentage_complete.unwrap_or(0)
            );

            let next = Instant::now() + self.interval;
            let (wake, expires) = match deadline {
                Some(deadline) if deadline < next => (deadline, true),
                _ => (next, false),
            };
            tokio::select! {
                _ = self.cancellation.cancelled() => {
                    debug!("Wait on task {} cancelled", task);
                    return TaskOutcome::Cancelled;
                }
                _ = sleep_until(wake) => {}
            }
            if expires {
                warn!("Task {} still {} at deadline", task, current.status);
                return TaskOutcome::TimedOut;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        client::FailureClass,
        testing::{FakeRepository, TASK},
    };

    const INTERVAL: Duration = Duration::from_secs(1);

    fn task_uuid() -> Uuid {
        Uuid::parse_str(TASK).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_terminal() {
        let repository = FakeRepository::new()
            .with_task_statuses(TASK, &["PENDING", "RUNNING", "RUNNING", "SUCCEEDED"]);
        let poller = TaskPoller::new(&repository, INTERVAL);

        let started = Instant::now();
        let outcome = poller.wait(task_uuid()).await;
        assert_eq!(outcome.status(), Some(&TaskStatus::Succeeded));
        assert_eq!(started.elapsed(), INTERVAL * 3);
        assert_eq!(repository.gets(), 4);
        assert!(outcome.into_result(task_uuid()).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_task_is_terminal() {
        let repository = FakeRepository::new().with_task_statuses(TASK, &["RUNNING", "FAILED"]);
        let poller = TaskPoller::new(&repository, INTERVAL);

        let err = poller
            .wait(task_uuid())
            .await
            .into_result(task_uuid())
            .unwrap_err();
        assert!(matches!(err, PilotError::TaskFailed { status: TaskStatus::Failed, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_is_returned_verbatim() {
        let repository = FakeRepository::new().with_task_statuses(TASK, &["RUNNING", "ABORTED"]);
        let poller = TaskPoller::new(&repository, INTERVAL);

        let outcome = poller.wait(task_uuid()).await;
        assert_eq!(
            outcome.status(),
            Some(&TaskStatus::Other("ABORTED".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn queued_task_is_not_polled_again() {
        let repository = FakeRepository::new().with_task_statuses(TASK, &["QUEUED", "SUCCEEDED"]);
        let poller = TaskPoller::new(&repository, INTERVAL);

        let started = Instant::now();
        let outcome = poller.wait(task_uuid()).await;
        assert_eq!(outcome.status(), Some(&TaskStatus::Queued));
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(repository.gets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_ends_the_wait() {
        let repository = FakeRepository::new();
        let poller = TaskPoller::new(&repository, INTERVAL);

        let outcome = poller.wait(task_uuid()).await;
        assert!(matches!(outcome, TaskOutcome::Error(RepositoryError::NotFound(_))));
        assert_eq!(repository.gets(), 1);

        let err = outcome.into_result(task_uuid()).unwrap_err();
        assert!(matches!(err, PilotError::TaskError { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_while_running_is_not_retried() {
        let repository = FakeRepository::new().with_task_outage(TASK, &["RUNNING", "RUNNING"]);
        let poller = TaskPoller::new(&repository, INTERVAL);

        let started = Instant::now();
        let outcome = poller.wait(task_uuid()).await;
        assert!(matches!(outcome, TaskOutcome::Error(RepositoryError::Request(..))));
        assert_eq!(started.elapsed(), INTERVAL * 2);
        assert_eq!(repository.gets(), 3);

        let err = outcome.into_result(task_uuid()).unwrap_err();
        assert!(matches!(err, PilotError::TaskError { .. }));
        assert_eq!(err.class(), FailureClass::Undetermined);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_ends_the_wait() {
        let repository = FakeRepository::new().with_task_statuses(TASK, &["RUNNING"]);
        let poller = TaskPoller::new(&repository, INTERVAL).with_deadline(Duration::from_millis(2500));

        let started = Instant::now();
        let outcome = poller.wait(task_uuid()).await;
        assert!(matches!(outcome, TaskOutcome::TimedOut));
        assert_eq!(started.elapsed(), Duration::from_millis(2500));
        assert_eq!(repository.gets(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_sleep() {
        let repository = FakeRepository::new().with_task_statuses(TASK, &["RUNNING"]);
        let token = CancellationToken::new();
        let poller = TaskPoller::new(&repository, Duration::from_secs(60))
            .with_cancellation(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            token.cancel();
        });

        let started = Instant::now();
        let outcome = poller.wait(task_uuid()).await;
        assert!(matches!(outcome, TaskOutcome::Cancelled));
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
        assert_eq!(repository.gets(), 1);
    }
}
