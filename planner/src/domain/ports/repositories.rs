//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., the in-memory store).

use async_trait::async_trait;

use crate::domain::entities::{
    DateOption, DateOptionId, DatePoll, Event, EventId, NewDateOption, NewDatePoll, NewEvent,
    NewVote, PollId, UserId, Vote,
};
use crate::error::DomainError;

/// Repository for Event entities
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find an event by ID
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError>;

    /// Create a new event
    async fn create(&self, event: &NewEvent) -> Result<Event, DomainError>;

    /// Replace the stored event with `event`
    async fn update(&self, event: &Event) -> Result<Event, DomainError>;
}

/// Repository for date polls and their candidate dates
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Find a poll by ID
    async fn find_by_id(&self, id: &PollId) -> Result<Option<DatePoll>, DomainError>;

    /// Find the poll attached to an event
    async fn find_by_event(&self, event_id: &EventId) -> Result<Option<DatePoll>, DomainError>;

    /// Create a new poll (without options). Fails with `AlreadyExists` if the
    /// event already has one.
    async fn create(&self, poll: &NewDatePoll) -> Result<DatePoll, DomainError>;

    /// Replace the stored poll with `poll`
    async fn update(&self, poll: &DatePoll) -> Result<DatePoll, DomainError>;

    /// List the candidate dates of a poll, earliest first
    async fn list_options(&self, poll_id: &PollId) -> Result<Vec<DateOption>, DomainError>;

    /// Find a candidate date by ID
    async fn find_option(&self, id: &DateOptionId) -> Result<Option<DateOption>, DomainError>;

    /// Add a candidate date
    async fn add_option(&self, option: &NewDateOption) -> Result<DateOption, DomainError>;
}

/// Repository for votes on candidate dates
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// List the votes cast on one candidate date
    async fn list_for_option(&self, option_id: &DateOptionId) -> Result<Vec<Vote>, DomainError>;

    /// Cast a vote, replacing the user's previous vote on the same option
    async fn upsert(&self, vote: &NewVote) -> Result<Vote, DomainError>;

    /// Remove a user's vote on an option. Returns false if there was none.
    async fn delete(&self, option_id: &DateOptionId, user_id: &UserId)
        -> Result<bool, DomainError>;
}
