//! Date poll service
//!
//! Runs the date poll of an event whose date is still open: candidate dates,
//! vote casting, live results and finalization. Finalizing confirms the
//! event's date and re-resolves its attributes.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::app::attribute_resolver;
use crate::app::vote_tally::{self, RankedOption};
use crate::config::{Config, DEFAULT_POLL_MAX_OPTIONS, DEFAULT_POLL_MIN_OPTIONS};
use crate::domain::entities::{
    DateCertainty, DateOption, DateOptionId, DatePoll, Event, EventId, NewDateOption,
    NewDatePoll, NewVote, PollId, PollPhase, UserId, Vote, VoteTally, VoteType,
};
use crate::domain::ports::{EventRepository, PollRepository, VoteRepository};
use crate::error::{AppError, DomainError};

/// Bounds on the number of candidate dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub min_options: usize,
    pub max_options: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            min_options: DEFAULT_POLL_MIN_OPTIONS,
            max_options: DEFAULT_POLL_MAX_OPTIONS,
        }
    }
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_options: config.poll_min_options,
            max_options: config.poll_max_options,
        }
    }
}

/// A poll together with its candidate dates
#[derive(Debug, Clone, Serialize)]
pub struct PollWithOptions {
    pub poll: DatePoll,
    pub options: Vec<DateOption>,
}

/// One candidate date and its tally
#[derive(Debug, Clone, Serialize)]
pub struct OptionResult {
    pub option: DateOption,
    pub tally: VoteTally,
}

/// Live results of a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    pub poll: DatePoll,
    /// Chronological
    pub options: Vec<OptionResult>,
    /// Best first
    pub ranking: Vec<RankedOption>,
    pub leading_option: Option<DateOptionId>,
}

/// Outcome of finalizing a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollFinalization {
    pub poll: DatePoll,
    pub event: Event,
}

/// Service for running date polls
pub struct PollService<ER, PR, VR>
where
    ER: EventRepository,
    PR: PollRepository,
    VR: VoteRepository,
{
    events: Arc<ER>,
    polls: Arc<PR>,
    votes: Arc<VR>,
    settings: PollSettings,
}

impl<ER, PR, VR> PollService<ER, PR, VR>
where
    ER: EventRepository,
    PR: PollRepository,
    VR: VoteRepository,
{
    pub fn new(events: Arc<ER>, polls: Arc<PR>, votes: Arc<VR>) -> Self {
        Self {
            events,
            polls,
            votes,
            settings: PollSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Open a date poll for an event whose date is being polled
    pub async fn create_poll(
        &self,
        event_id: &EventId,
        dates: Vec<NaiveDate>,
        voting_deadline: Option<DateTime<Utc>>,
    ) -> Result<PollWithOptions, AppError> {
        let event = self.find_event(event_id).await?;
        if event.planning.date_certainty != DateCertainty::Polling {
            return Err(DomainError::Conflict(format!(
                "Event {} has date certainty '{}'; only polling events get a date poll",
                event_id, event.planning.date_certainty
            ))
            .into());
        }

        if self.polls.find_by_event(event_id).await?.is_some() {
            return Err(
                DomainError::AlreadyExists(format!("Event {} already has a poll", event_id))
                    .into(),
            );
        }

        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        if dates.len() < self.settings.min_options || dates.len() > self.settings.max_options {
            return Err(DomainError::Validation(format!(
                "a poll needs between {} and {} distinct dates, got {}",
                self.settings.min_options,
                self.settings.max_options,
                dates.len()
            ))
            .into());
        }

        let poll = self
            .polls
            .create(&NewDatePoll {
                event_id: *event_id,
                voting_deadline,
            })
            .await?;

        let mut options = Vec::with_capacity(dates.len());
        for date in dates {
            let option = self
                .polls
                .add_option(&NewDateOption {
                    poll_id: poll.id,
                    date,
                })
                .await?;
            options.push(option);
        }

        tracing::info!(
            poll_id = %poll.id,
            event_id = %event_id,
            options = options.len(),
            "Date poll created"
        );

        Ok(PollWithOptions { poll, options })
    }

    /// Add another candidate date to an open poll
    pub async fn add_date_option(
        &self,
        poll_id: &PollId,
        date: NaiveDate,
    ) -> Result<DateOption, AppError> {
        let poll = self.find_poll(poll_id).await?;
        ensure_open(&poll)?;

        let existing = self.polls.list_options(poll_id).await?;
        if existing.iter().any(|o| o.date == date) {
            return Err(DomainError::AlreadyExists(format!(
                "Poll {} already offers {}",
                poll_id, date
            ))
            .into());
        }
        if existing.len() >= self.settings.max_options {
            return Err(DomainError::Validation(format!(
                "a poll can offer at most {} dates",
                self.settings.max_options
            ))
            .into());
        }

        let option = self
            .polls
            .add_option(&NewDateOption {
                poll_id: *poll_id,
                date,
            })
            .await?;
        tracing::info!(poll_id = %poll_id, option_id = %option.id, date = %date, "Date option added");
        Ok(option)
    }

    /// Cast or change a user's vote on one candidate date
    pub async fn cast_vote(
        &self,
        poll_id: &PollId,
        option_id: &DateOptionId,
        user_id: &UserId,
        vote_type: VoteType,
    ) -> Result<Vote, AppError> {
        let poll = self.find_poll(poll_id).await?;
        ensure_accepts_votes(&poll)?;
        self.find_option_in(poll_id, option_id).await?;
        self.find_polling_event(&poll).await?;

        let vote = self
            .votes
            .upsert(&NewVote {
                option_id: *option_id,
                user_id: *user_id,
                vote_type,
            })
            .await?;

        tracing::info!(
            poll_id = %poll_id,
            option_id = %option_id,
            user_id = %user_id,
            vote_type = %vote_type,
            "Vote cast"
        );

        Ok(vote)
    }

    /// Withdraw a user's vote on one candidate date
    pub async fn remove_vote(
        &self,
        option_id: &DateOptionId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let option = self
            .polls
            .find_option(option_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Date option not found: {}", option_id)))?;
        let poll = self.find_poll(&option.poll_id).await?;
        ensure_accepts_votes(&poll)?;
        self.find_polling_event(&poll).await?;

        if !self.votes.delete(option_id, user_id).await? {
            return Err(DomainError::NotFound(format!(
                "No vote by {} on {}",
                user_id, option_id
            ))
            .into());
        }

        tracing::info!(option_id = %option_id, user_id = %user_id, "Vote removed");
        Ok(())
    }

    /// Tally every candidate date of a poll
    pub async fn results(&self, poll_id: &PollId) -> Result<PollResults, AppError> {
        let poll = self.find_poll(poll_id).await?;
        let options = self.polls.list_options(poll_id).await?;

        let mut results = Vec::with_capacity(options.len());
        for option in options {
            let votes = self.votes.list_for_option(&option.id).await?;
            results.push(OptionResult {
                tally: vote_tally::tally(&votes),
                option,
            });
        }

        let ranking = vote_tally::rank_options(
            results
                .iter()
                .map(|r| (r.option.clone(), r.tally))
                .collect(),
        );
        let leading_option = vote_tally::leading_option(&ranking).map(|r| r.option.id);

        Ok(PollResults {
            poll,
            options: results,
            ranking,
            leading_option,
        })
    }

    /// Close the poll on the chosen date and confirm the event's date
    pub async fn finalize(
        &self,
        poll_id: &PollId,
        option_id: &DateOptionId,
    ) -> Result<PollFinalization, AppError> {
        let mut poll = self.find_poll(poll_id).await?;
        ensure_open(&poll)?;
        let option = self.find_option_in(poll_id, option_id).await?;
        let original = self.find_polling_event(&poll).await?;

        // Event first: the poll only closes once the date is stored
        let mut event = original.clone();
        let mut planning = event.planning;
        planning.date_certainty = DateCertainty::Confirmed;
        let resolved = attribute_resolver::resolve(&planning);
        event.apply(planning, &resolved);
        event.start_date = Some(option.date);
        let event = self.events.update(&event).await?;

        poll.phase = PollPhase::Finalized;
        poll.finalized_option = Some(option.id);
        let poll = match self.polls.update(&poll).await {
            Ok(poll) => poll,
            Err(err) => {
                if let Err(rollback) = self.events.update(&original).await {
                    tracing::error!(
                        event_id = %original.id,
                        error = %rollback,
                        "Failed to restore event after poll update failed"
                    );
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            poll_id = %poll.id,
            event_id = %event.id,
            date = %option.date,
            status = %event.status,
            "Date poll finalized"
        );

        Ok(PollFinalization { poll, event })
    }

    async fn find_event(&self, id: &EventId) -> Result<Event, AppError> {
        Ok(self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Event not found: {}", id)))?)
    }

    async fn find_poll(&self, id: &PollId) -> Result<DatePoll, AppError> {
        Ok(self
            .polls
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Poll not found: {}", id)))?)
    }

    /// Load the poll's event, refusing once its date is no longer being polled
    async fn find_polling_event(&self, poll: &DatePoll) -> Result<Event, AppError> {
        let event = self.find_event(&poll.event_id).await?;
        if event.planning.date_certainty != DateCertainty::Polling {
            return Err(DomainError::Conflict(format!(
                "Event {} has date certainty '{}'; its poll is suspended",
                event.id, event.planning.date_certainty
            ))
            .into());
        }
        Ok(event)
    }

    async fn find_option_in(
        &self,
        poll_id: &PollId,
        option_id: &DateOptionId,
    ) -> Result<DateOption, AppError> {
        match self.polls.find_option(option_id).await? {
            Some(option) if option.poll_id == *poll_id => Ok(option),
            Some(_) => Err(DomainError::Validation(format!(
                "Date option {} does not belong to poll {}",
                option_id, poll_id
            ))
            .into()),
            None => Err(DomainError::NotFound(format!("Date option not found: {}", option_id)).into()),
        }
    }
}

fn ensure_accepts_votes(poll: &DatePoll) -> Result<(), AppError> {
    if poll.accepts_votes_at(Utc::now()) {
        Ok(())
    } else {
        Err(DomainError::Conflict(format!(
            "Poll {} is no longer accepting votes",
            poll.id
        ))
        .into())
    }
}

fn ensure_open(poll: &DatePoll) -> Result<(), AppError> {
    if poll.is_open() {
        Ok(())
    } else {
        Err(DomainError::Conflict(format!("Poll {} is already finalized", poll.id)).into())
    }
}
