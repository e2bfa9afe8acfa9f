//! In-memory roast session model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::phase::RoastPhase;
use crate::types::{EpochMillis, EpochSeconds};

/// Lifecycle status of a session controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Finalized,
    Deleted,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Finalized => "finalized",
            SessionStatus::Deleted => "deleted",
        }
    }
}

/// Snapshot of an active roast session.
///
/// Only lives in memory; pause state is not persisted and is lost on reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastSession {
    pub roast_id: Uuid,
    pub start_ts: EpochSeconds,
    pub paused_ms: i64,
    pub pause_started_at: Option<EpochMillis>,
    pub current_phase: RoastPhase,
    pub status: SessionStatus,
}
