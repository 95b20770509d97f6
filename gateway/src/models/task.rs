// gateway/src/models/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_CHECK_TASK: &str = "paygw_mpay24::check_status";

/// Data carried by a deferred status check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCheckPayload {
  pub transaction_id: String,
  pub item_id: i64,
  pub component: String,
  pub payment_area: String,
  pub user_id: i64,
}

/// A deferred, schedulable unit of background work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhocTask {
  pub kind: String,
  pub user_id: i64,
  pub payload: serde_json::Value,
  pub next_run_time: DateTime<Utc>,
}

/// Two tasks with equal identity are the same job; rescheduling replaces the run time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskIdentity {
  pub kind: String,
  pub user_id: i64,
  pub payload: String,
}

impl AdhocTask {
  pub fn status_check(payload: &StatusCheckPayload, next_run_time: DateTime<Utc>) -> serde_json::Result<Self> {
    Ok(Self {
      kind: STATUS_CHECK_TASK.to_string(),
      user_id: payload.user_id,
      payload: serde_json::to_value(payload)?,
      next_run_time,
    })
  }

  pub fn identity(&self) -> TaskIdentity {
    TaskIdentity {
      kind: self.kind.clone(),
      user_id: self.user_id,
      // serde_json maps are sorted, so this is a stable key.
      payload: self.payload.to_string(),
    }
  }
}
