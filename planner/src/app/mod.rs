//! Application layer
//!
//! Contains use cases and service orchestration.
//! Attribute resolution and vote tallying are pure functions; the services
//! coordinate them with the repository ports.

pub mod attribute_resolver;
pub mod event_service;
pub mod poll_service;
pub mod vote_tally;

pub use attribute_resolver::{merge_status, resolve, resolve_params, STATUS_PRECEDENCE};
pub use event_service::{EventService, NewEventForm};
pub use poll_service::{
    OptionResult, PollFinalization, PollResults, PollService, PollSettings, PollWithOptions,
};
pub use vote_tally::{leading_option, rank_options, tally, RankedOption};
