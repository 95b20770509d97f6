// tests/scheduling_tests.rs
mod common;

use common::*;
use chrono::{Duration, Utc};
use paygw_mpay24::models::{StatusCheckPayload, STATUS_CHECK_TASK};
use paygw_mpay24::services::task_scheduler::{schedule_status_check, status_check_run_time};
use paygw_mpay24::services::{InMemoryTaskQueue, ScheduleOutcome};

#[tokio::test]
async fn status_check_carries_the_order_reference() {
  setup_tracing();
  let queue = InMemoryTaskQueue::new();
  let run_at = status_check_run_time(Utc::now(), Some(20));

  let outcome = schedule_status_check(&queue, 7, &course_fee(), "abc123", run_at).await.unwrap();

  assert_eq!(outcome, ScheduleOutcome::Queued);
  let tasks = queue.pending_tasks();
  assert_eq!(tasks.len(), 1);
  assert_eq!(tasks[0].kind, STATUS_CHECK_TASK);
  assert_eq!(tasks[0].user_id, 7);
  assert_eq!(tasks[0].next_run_time, run_at);
  let payload: StatusCheckPayload = serde_json::from_value(tasks[0].payload.clone()).unwrap();
  assert_eq!(
    payload,
    StatusCheckPayload {
      transaction_id: "abc123".to_string(),
      item_id: 42,
      component: "enrol_fee".to_string(),
      payment_area: "fee".to_string(),
      user_id: 7,
    }
  );
}

#[tokio::test]
async fn rescheduling_replaces_the_run_time() {
  setup_tracing();
  let queue = InMemoryTaskQueue::new();
  let now = Utc::now();
  let first = now + Duration::minutes(30);
  let second = now + Duration::minutes(45);

  schedule_status_check(&queue, 7, &course_fee(), "abc123", first).await.unwrap();
  let outcome = schedule_status_check(&queue, 7, &course_fee(), "abc123", second).await.unwrap();

  assert_eq!(outcome, ScheduleOutcome::Rescheduled);
  let tasks = queue.pending_tasks();
  assert_eq!(tasks.len(), 1);
  assert_eq!(tasks[0].next_run_time, second);
}

#[tokio::test]
async fn different_transactions_are_separate_tasks() {
  setup_tracing();
  let queue = InMemoryTaskQueue::new();
  let now = Utc::now();

  schedule_status_check(&queue, 7, &course_fee(), "abc123", now).await.unwrap();
  schedule_status_check(&queue, 7, &course_fee(), "def456", now).await.unwrap();

  assert_eq!(queue.pending_tasks().len(), 2);
}

#[tokio::test]
async fn only_due_tasks_are_handed_out() {
  setup_tracing();
  let queue = InMemoryTaskQueue::new();
  let now = Utc::now();

  schedule_status_check(&queue, 7, &course_fee(), "late", now + Duration::minutes(10)).await.unwrap();
  schedule_status_check(&queue, 7, &course_fee(), "early", now - Duration::minutes(1)).await.unwrap();

  let due = queue.due_tasks(now);
  assert_eq!(due.len(), 1);
  assert_eq!(due[0].payload["transaction_id"], "early");
  assert_eq!(queue.due_tasks(now + Duration::minutes(10)).len(), 2);
}

#[test]
fn run_time_tracks_the_token_lifetime() {
  let now = Utc::now();
  assert_eq!(status_check_run_time(now, Some(20)), now + Duration::minutes(19));
  for short in [Some(2), Some(1), Some(0), None] {
    assert_eq!(status_check_run_time(now, short), now + Duration::minutes(30));
  }
}
