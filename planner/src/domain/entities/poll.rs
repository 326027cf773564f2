//! Date poll domain entity
//!
//! A poll offers candidate dates for an event whose date is not fixed yet.
//! Participants vote on each date; the organizer finalizes one of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::EventId;

/// Unique identifier for a date poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollId(pub Uuid);

impl PollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PollId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PollId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a candidate date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateOptionId(pub Uuid);

impl DateOptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DateOptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DateOptionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DateOptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Poll phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollPhase {
    Open,
    Finalized,
}

impl std::fmt::Display for PollPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollPhase::Open => write!(f, "open"),
            PollPhase::Finalized => write!(f, "finalized"),
        }
    }
}

impl std::str::FromStr for PollPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PollPhase::Open),
            "finalized" => Ok(PollPhase::Finalized),
            _ => Err(format!("Unknown poll phase: {}", s)),
        }
    }
}

/// A date poll attached to an event
#[derive(Debug, Clone, Serialize)]
pub struct DatePoll {
    pub id: PollId,
    pub event_id: EventId,
    pub phase: PollPhase,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub finalized_option: Option<DateOptionId>,
    pub created_at: DateTime<Utc>,
}

impl DatePoll {
    /// Check if the poll still accepts votes at `now`
    pub fn accepts_votes_at(&self, now: DateTime<Utc>) -> bool {
        self.phase == PollPhase::Open && self.voting_deadline.map_or(true, |d| now < d)
    }

    pub fn is_open(&self) -> bool {
        self.phase == PollPhase::Open
    }
}

/// Data needed to create a new poll
#[derive(Debug, Clone)]
pub struct NewDatePoll {
    pub event_id: EventId,
    pub voting_deadline: Option<DateTime<Utc>>,
}

/// A candidate date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateOption {
    pub id: DateOptionId,
    pub poll_id: PollId,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Data needed to add a candidate date
#[derive(Debug, Clone, Copy)]
pub struct NewDateOption {
    pub poll_id: PollId,
    pub date: NaiveDate,
}
