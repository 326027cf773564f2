//! Domain entities
//!
//! Pure domain models for events, their planning selections and date polls.

pub mod event;
pub mod event_attributes;
pub mod poll;
pub mod tally;
pub mod vote;

pub use event::{
    Event, EventId, EventStatus, NewEvent, TaxationType, ThresholdProgress, ThresholdType, VenueId,
};
pub use event_attributes::{
    DateCertainty, EventAttributeRequest, ParticipationType, ResolvedEventAttributes,
    VenueCertainty, DATE_CERTAINTY_PARAM, PARTICIPATION_TYPE_PARAM, TAXATION_TYPE_PARAM,
    VENUE_CERTAINTY_PARAM,
};
pub use poll::{DateOption, DateOptionId, DatePoll, NewDateOption, NewDatePoll, PollId, PollPhase};
pub use tally::{rounded_percentage, VoteTally};
pub use vote::{Ballot, NewVote, UserId, Vote, VoteId, VoteType};
