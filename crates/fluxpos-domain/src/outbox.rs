//! Outbox record types: one durable intent to mutate remote state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::EntityKind;

/// What the collaborator intended to do to the entity.
///
/// For entities delivered through a remote procedure this is advisory —
/// the procedure decides the effect from the payload state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxAction {
    Insert,
    Update,
    Delete,
}

impl OutboxAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OutboxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutboxAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown outbox action: {other}")),
        }
    }
}

/// Delivery state of an outbox record.
///
/// Stored lowercase; this is the single canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    Pending,
    Synced,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutboxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown outbox status: {other}")),
        }
    }
}

/// One pending or resolved intent to mutate remote state.
///
/// The payload is immutable once created; retries replay it verbatim.
/// Delivery order is `(created_at, seq)` — `seq` is a monotonic local
/// sequence assigned at enqueue, so ordering never depends on wall-clock
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub id: Uuid,
    pub entity: EntityKind,
    pub action: OutboxAction,
    pub location_id: Uuid,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub created_at: DateTime<Utc>,
    pub seq: i64,
    pub attempt_count: i32,
    pub last_error: Option<String>,
}

/// Enqueue input: what a collaborator supplies. The engine stamps the rest.
#[derive(Debug, Clone)]
pub struct NewOutboxRecord {
    pub entity: EntityKind,
    pub action: OutboxAction,
    pub location_id: Uuid,
    pub payload: serde_json::Value,
}

/// Queue counts surfaced to the embedding application's status view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutboxCounts {
    pub pending: u64,
    pub synced: u64,
    pub failed: u64,
}
