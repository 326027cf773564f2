use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{read, write};
use crate::domain::entities::{
    DateOption, DateOptionId, DatePoll, EventId, NewDateOption, NewDatePoll, PollId, PollPhase,
};
use crate::domain::ports::PollRepository;
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryPollRepository {
    polls: RwLock<HashMap<PollId, DatePoll>>,
    options: RwLock<HashMap<DateOptionId, DateOption>>,
}

impl InMemoryPollRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn find_by_id(&self, id: &PollId) -> Result<Option<DatePoll>, DomainError> {
        Ok(read(&self.polls)?.get(id).cloned())
    }

    async fn find_by_event(&self, event_id: &EventId) -> Result<Option<DatePoll>, DomainError> {
        Ok(read(&self.polls)?
            .values()
            .find(|p| p.event_id == *event_id)
            .cloned())
    }

    async fn create(&self, new_poll: &NewDatePoll) -> Result<DatePoll, DomainError> {
        let mut polls = write(&self.polls)?;
        if polls.values().any(|p| p.event_id == new_poll.event_id) {
            return Err(DomainError::AlreadyExists(format!(
                "Event {} already has a poll",
                new_poll.event_id
            )));
        }

        let poll = DatePoll {
            id: PollId::new(),
            event_id: new_poll.event_id,
            phase: PollPhase::Open,
            voting_deadline: new_poll.voting_deadline,
            finalized_option: None,
            created_at: Utc::now(),
        };

        polls.insert(poll.id, poll.clone());
        Ok(poll)
    }

    async fn update(&self, poll: &DatePoll) -> Result<DatePoll, DomainError> {
        let mut polls = write(&self.polls)?;
        match polls.get_mut(&poll.id) {
            Some(stored) => {
                *stored = poll.clone();
                Ok(poll.clone())
            }
            None => Err(DomainError::NotFound(format!("Poll {} not found", poll.id))),
        }
    }

    async fn list_options(&self, poll_id: &PollId) -> Result<Vec<DateOption>, DomainError> {
        let options = read(&self.options)?;
        let mut found: Vec<DateOption> = options
            .values()
            .filter(|o| o.poll_id == *poll_id)
            .cloned()
            .collect();
        found.sort_by_key(|o| o.date);
        Ok(found)
    }

    async fn find_option(&self, id: &DateOptionId) -> Result<Option<DateOption>, DomainError> {
        Ok(read(&self.options)?.get(id).cloned())
    }

    async fn add_option(&self, new_option: &NewDateOption) -> Result<DateOption, DomainError> {
        if !read(&self.polls)?.contains_key(&new_option.poll_id) {
            return Err(DomainError::NotFound(format!(
                "Poll {} not found",
                new_option.poll_id
            )));
        }

        let option = DateOption {
            id: DateOptionId::new(),
            poll_id: new_option.poll_id,
            date: new_option.date,
            created_at: Utc::now(),
        };

        write(&self.options)?.insert(option.id, option.clone());
        Ok(option)
    }
}
