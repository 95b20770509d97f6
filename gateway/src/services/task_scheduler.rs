// gateway/src/services/task_scheduler.rs

//! Deferred status checks.
//!
//! The gateway only enqueues; running the check and acting on its result belongs
//! to the worker that drains the queue.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{AdhocTask, ItemRef, StatusCheckPayload, TaskIdentity};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};

pub const DEFAULT_STATUS_CHECK_DELAY_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
  Queued,
  Rescheduled,
}

#[async_trait]
pub trait TaskScheduler: Send + Sync {
  /// Queues `task`, or moves the run time of an already queued task with the same identity.
  async fn reschedule_or_queue(&self, task: AdhocTask) -> AppResult<ScheduleOutcome>;
}

/// When the status check may run: one minute before the processor token expires if
/// that lifetime is configured and longer than two minutes, otherwise after 30 minutes.
pub fn status_check_run_time(now: DateTime<Utc>, cache_expiration_minutes: Option<i64>) -> DateTime<Utc> {
  match cache_expiration_minutes {
    Some(minutes) if minutes > 2 => now + Duration::minutes(minutes - 1),
    _ => now + Duration::minutes(DEFAULT_STATUS_CHECK_DELAY_MINUTES),
  }
}

#[instrument(name = "schedule_status_check", skip(scheduler, item), fields(component = %item.component, payment_area = %item.payment_area, item_id = item.item_id))]
pub async fn schedule_status_check(
  scheduler: &dyn TaskScheduler,
  user_id: i64,
  item: &ItemRef,
  transaction_id: &str,
  earliest_run_at: DateTime<Utc>,
) -> AppResult<ScheduleOutcome> {
  let payload = StatusCheckPayload {
    transaction_id: transaction_id.to_string(),
    item_id: item.item_id,
    component: item.component.clone(),
    payment_area: item.payment_area.clone(),
    user_id,
  };
  let task = AdhocTask::status_check(&payload, earliest_run_at)
    .map_err(|e| AppError::Internal(format!("cannot encode status check payload: {}", e)))?;
  let outcome = scheduler.reschedule_or_queue(task).await?;
  info!(?outcome, %earliest_run_at, "Status check scheduled.");
  Ok(outcome)
}

/// Process-local queue.
#[derive(Debug, Default)]
pub struct InMemoryTaskQueue {
  tasks: Mutex<Vec<AdhocTask>>,
}

impl InMemoryTaskQueue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn pending_tasks(&self) -> Vec<AdhocTask> {
    self.tasks.lock().clone()
  }

  /// Tasks whose run time has come, oldest first.
  pub fn due_tasks(&self, now: DateTime<Utc>) -> Vec<AdhocTask> {
    let mut due: Vec<AdhocTask> = self
      .tasks
      .lock()
      .iter()
      .filter(|t| t.next_run_time <= now)
      .cloned()
      .collect();
    due.sort_by_key(|t| t.next_run_time);
    due
  }
}

#[async_trait]
impl TaskScheduler for InMemoryTaskQueue {
  async fn reschedule_or_queue(&self, task: AdhocTask) -> AppResult<ScheduleOutcome> {
    let identity: TaskIdentity = task.identity();
    let mut tasks = self.tasks.lock();
    if let Some(existing) = tasks.iter_mut().find(|t| t.identity() == identity) {
      existing.next_run_time = task.next_run_time;
      return Ok(ScheduleOutcome::Rescheduled);
    }
    tasks.push(task);
    Ok(ScheduleOutcome::Queued)
  }
}

/// Queue in the `paygw_mpay24_adhoc_tasks` table, unique on the task identity.
#[derive(Clone)]
pub struct PgTaskQueue {
  pool: PgPool,
}

impl PgTaskQueue {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TaskScheduler for PgTaskQueue {
  async fn reschedule_or_queue(&self, task: AdhocTask) -> AppResult<ScheduleOutcome> {
    let identity = task.identity();
    let (inserted,): (bool,) = sqlx::query_as(
      "INSERT INTO paygw_mpay24_adhoc_tasks (kind, user_id, payload, payload_key, next_run_time) \
       VALUES ($1, $2, $3, $4, $5) \
       ON CONFLICT (kind, user_id, payload_key) DO UPDATE SET next_run_time = EXCLUDED.next_run_time \
       RETURNING (xmax = 0)",
    )
    .bind(&task.kind)
    .bind(task.user_id)
    .bind(Json(&task.payload))
    .bind(&identity.payload)
    .bind(task.next_run_time)
    .fetch_one(&self.pool)
    .await?;
    Ok(if inserted {
      ScheduleOutcome::Queued
    } else {
      ScheduleOutcome::Rescheduled
    })
  }
}
