//! In-process fire-and-forget job queue with pollable status.
//!
//! Finished statuses are kept for a retention window and then evicted by
//! the worker; pending ones stay until their job runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use super::email::{EmailJob, Mailer};
use super::TaskError;
use crate::logging::pii::Redacted;

pub type TaskId = Uuid;

const QUEUE_CAPACITY: usize = 256;

/// How long a finished status stays pollable by default.
pub const STATUS_RETENTION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Success,
    Failure(String),
}

#[derive(Debug, Clone)]
struct TaskRecord {
    status: TaskStatus,
    finished_at: Option<Instant>,
}

type StatusTable = Arc<DashMap<TaskId, TaskRecord>>;

/// Handle for submitting jobs. Clones share one worker and one status table.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<(TaskId, EmailJob)>,
    statuses: StatusTable,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("tracked", &self.statuses.len())
            .finish_non_exhaustive()
    }
}

impl TaskQueue {
    /// Spawns the worker on the current runtime with [`STATUS_RETENTION`].
    /// The worker exits once every handle is dropped and the backlog is drained.
    pub fn start(mailer: Arc<dyn Mailer>) -> (Self, JoinHandle<()>) {
        Self::start_with_retention(mailer, STATUS_RETENTION)
    }

    /// Finished statuses become unknown (`None`) between `retention` and
    /// twice `retention` after completion.
    pub fn start_with_retention(
        mailer: Arc<dyn Mailer>,
        retention: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let statuses: StatusTable = Arc::new(DashMap::new());
        let worker = tokio::spawn(run_worker(rx, mailer, statuses.clone(), retention));
        (Self { tx, statuses }, worker)
    }

    /// Returns as soon as the job is queued; delivery happens on the worker.
    pub fn enqueue_email(&self, job: EmailJob) -> Result<TaskId, TaskError> {
        let id = Uuid::new_v4();
        self.statuses.insert(
            id,
            TaskRecord {
                status: TaskStatus::Pending,
                finished_at: None,
            },
        );
        if let Err(err) = self.tx.try_send((id, job)) {
            self.statuses.remove(&id);
            return Err(match err {
                mpsc::error::TrySendError::Full(_) => TaskError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => TaskError::QueueClosed,
            });
        }
        debug!(task_id = %id, "Email job queued");
        Ok(id)
    }

    pub fn status(&self, id: TaskId) -> Option<TaskStatus> {
        self.statuses.get(&id).map(|entry| entry.value().status.clone())
    }

    /// Number of statuses currently held, pending and finished.
    pub fn tracked(&self) -> usize {
        self.statuses.len()
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<(TaskId, EmailJob)>,
    mailer: Arc<dyn Mailer>,
    statuses: StatusTable,
    retention: Duration,
) {
    // A zero period would panic inside tokio.
    let mut sweep = tokio::time::interval(retention.max(Duration::from_millis(1)));
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = rx.recv() => {
                let Some((id, job)) = next else {
                    break;
                };
                let status = match mailer.send(&job).await {
                    Ok(()) => TaskStatus::Success,
                    Err(err) => {
                        warn!(task_id = %id, recipient = %Redacted(&job.recipient), error = %err, "Email job failed");
                        TaskStatus::Failure(err.to_string())
                    }
                };
                statuses.insert(
                    id,
                    TaskRecord {
                        status,
                        finished_at: Some(Instant::now()),
                    },
                );
            }
            _ = sweep.tick() => evict_finished(&statuses, retention),
        }
    }
    debug!("Task queue worker stopped");
}

fn evict_finished(statuses: &DashMap<TaskId, TaskRecord>, retention: Duration) {
    let before = statuses.len();
    statuses.retain(|_, record| {
        record
            .finished_at
            .map_or(true, |finished| finished.elapsed() < retention)
    });
    let evicted = before.saturating_sub(statuses.len());
    if evicted > 0 {
        debug!(evicted, "Evicted finished task statuses");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_keeps_pending_and_recent_records() {
        let statuses = DashMap::new();
        let pending = Uuid::new_v4();
        let recent = Uuid::new_v4();
        statuses.insert(
            pending,
            TaskRecord {
                status: TaskStatus::Pending,
                finished_at: None,
            },
        );
        statuses.insert(
            recent,
            TaskRecord {
                status: TaskStatus::Success,
                finished_at: Some(Instant::now()),
            },
        );

        evict_finished(&statuses, Duration::from_secs(60));
        assert_eq!(statuses.len(), 2);

        evict_finished(&statuses, Duration::ZERO);
        assert!(statuses.contains_key(&pending));
        assert!(!statuses.contains_key(&recent));
    }

    #[test]
    fn status_serialises_with_tag() {
        let json = serde_json::to_value(TaskStatus::Failure("smtp down".into())).unwrap();
        assert_eq!(json["status"], "FAILURE");
        assert_eq!(json["detail"], "smtp down");
        assert_eq!(
            serde_json::to_value(TaskStatus::Pending).unwrap()["status"],
            "PENDING"
        );
    }
}
