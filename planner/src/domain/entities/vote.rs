//! Vote domain entity
//!
//! A participant's answer for one candidate date of a date poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::poll::DateOptionId;

/// Unique identifier for a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteId(pub Uuid);

impl VoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a voting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ternary answer for a candidate date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Yes,
    IfNeedBe,
    No,
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteType::Yes => write!(f, "yes"),
            VoteType::IfNeedBe => write!(f, "if_need_be"),
            VoteType::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(VoteType::Yes),
            "if_need_be" | "ifneedbe" | "if-need-be" => Ok(VoteType::IfNeedBe),
            "no" => Ok(VoteType::No),
            _ => Err(format!(
                "Unknown vote type: {}. Use: yes, if_need_be, no",
                s
            )),
        }
    }
}

/// Anything that carries a vote type and can be tallied
pub trait Ballot {
    fn vote_type(&self) -> VoteType;
}

impl Ballot for VoteType {
    fn vote_type(&self) -> VoteType {
        *self
    }
}

impl<T: Ballot + ?Sized> Ballot for &T {
    fn vote_type(&self) -> VoteType {
        (**self).vote_type()
    }
}

/// A vote as stored by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub id: VoteId,
    pub option_id: DateOptionId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub voted_at: DateTime<Utc>,
}

impl Ballot for Vote {
    fn vote_type(&self) -> VoteType {
        self.vote_type
    }
}

/// Data needed to cast (or change) a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewVote {
    pub option_id: DateOptionId,
    pub user_id: UserId,
    pub vote_type: VoteType,
}
