//! Evently planner
//!
//! Event planning core: derives an event's status, ticketing and venue
//! attributes from the organizer's planning selections, and runs date polls
//! for events whose date is still open.
//! Uses hexagonal (ports & adapters) architecture; the only shipped adapters
//! are in-memory repositories.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;
