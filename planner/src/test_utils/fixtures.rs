//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::app::{attribute_resolver, NewEventForm};
use crate::domain::entities::{Event, EventAttributeRequest, EventId};

/// Build form parameters from key/value pairs
pub fn planning_params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Create an event form with a title and planning parameters
pub fn event_form(title: &str, pairs: &[(&str, &str)]) -> NewEventForm {
    NewEventForm {
        title: title.to_string(),
        params: planning_params(pairs),
    }
}

/// Create an event whose attributes are resolved from `pairs`
pub fn seed_event(pairs: &[(&str, &str)]) -> Event {
    let planning = EventAttributeRequest::from_params(&planning_params(pairs));
    let resolved = attribute_resolver::resolve(&planning);
    let now = Utc::now();
    Event {
        id: EventId::new(),
        title: "Test Event".to_string(),
        planning,
        status: resolved.status,
        is_ticketed: resolved.is_ticketed,
        taxation_type: resolved.taxation_type,
        is_virtual: resolved.is_virtual,
        venue_id: None,
        threshold_type: resolved.threshold_type,
        threshold_target: None,
        start_date: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create an event with a polled date; `extra` adds or overrides parameters
pub fn polling_event(extra: &[(&str, &str)]) -> Event {
    let mut pairs = vec![("date_certainty", "polling")];
    pairs.extend_from_slice(extra);
    seed_event(&pairs)
}

/// A date in December 2026
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, day).expect("valid December day")
}
