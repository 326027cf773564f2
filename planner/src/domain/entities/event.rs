//! Event domain entity
//!
//! Represents an organized event together with the attributes derived from the
//! organizer's planning selections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event_attributes::{EventAttributeRequest, ResolvedEventAttributes};
use super::tally::rounded_percentage;

/// Unique identifier for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a venue (venues themselves are managed elsewhere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub Uuid);

impl VenueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VenueId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VenueId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Confirmed,
    Polling,
    Draft,
    Threshold,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Confirmed => write!(f, "confirmed"),
            EventStatus::Polling => write!(f, "polling"),
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Threshold => write!(f, "threshold"),
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(EventStatus::Confirmed),
            "polling" => Ok(EventStatus::Polling),
            "draft" => Ok(EventStatus::Draft),
            "threshold" => Ok(EventStatus::Threshold),
            _ => Err(format!("Unknown event status: {}", s)),
        }
    }
}

/// How money collected for an event is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxationType {
    #[default]
    Ticketless,
    TicketedEvent,
    ContributionCollection,
}

impl std::fmt::Display for TaxationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxationType::Ticketless => write!(f, "ticketless"),
            TaxationType::TicketedEvent => write!(f, "ticketed_event"),
            TaxationType::ContributionCollection => write!(f, "contribution_collection"),
        }
    }
}

impl std::str::FromStr for TaxationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ticketless" => Ok(TaxationType::Ticketless),
            "ticketed_event" => Ok(TaxationType::TicketedEvent),
            "contribution_collection" => Ok(TaxationType::ContributionCollection),
            _ => Err(format!("Unknown taxation type: {}", s)),
        }
    }
}

/// What a threshold event has to reach before it goes ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdType {
    /// Funding target, in cents
    Revenue,
    /// Number of committed attendees
    AttendeeCount,
}

impl std::fmt::Display for ThresholdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdType::Revenue => write!(f, "revenue"),
            ThresholdType::AttendeeCount => write!(f, "attendee_count"),
        }
    }
}

impl std::str::FromStr for ThresholdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(ThresholdType::Revenue),
            "attendee_count" => Ok(ThresholdType::AttendeeCount),
            _ => Err(format!("Unknown threshold type: {}", s)),
        }
    }
}

/// An event as stored by the persistence collaborator
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Planning selections the current attributes were resolved from
    pub planning: EventAttributeRequest,
    pub status: EventStatus,
    pub is_ticketed: bool,
    pub taxation_type: TaxationType,
    pub is_virtual: bool,
    pub venue_id: Option<VenueId>,
    pub threshold_type: Option<ThresholdType>,
    /// Attendee count or revenue in cents, depending on `threshold_type`
    pub threshold_target: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Merge freshly resolved attributes into this event.
    ///
    /// The venue is only touched when the resolution explicitly clears it. The
    /// threshold target is dropped whenever the threshold kind changes, since a
    /// revenue target means nothing as an attendee count and vice versa.
    pub fn apply(&mut self, planning: EventAttributeRequest, resolved: &ResolvedEventAttributes) {
        self.planning = planning;
        self.status = resolved.status;
        self.is_ticketed = resolved.is_ticketed;
        self.taxation_type = resolved.taxation_type;
        self.is_virtual = resolved.is_virtual;
        if resolved.clears_venue() {
            self.venue_id = None;
        }
        if self.threshold_type != resolved.threshold_type {
            self.threshold_target = None;
        }
        self.threshold_type = resolved.threshold_type;
        self.updated_at = Utc::now();
    }

    pub fn is_threshold(&self) -> bool {
        self.status == EventStatus::Threshold
    }

    /// Whether a concrete venue may be attached to this event
    pub fn accepts_venue(&self) -> bool {
        self.planning.venue_certainty.allows_venue()
    }

    /// Progress toward the threshold target, if this is a threshold event with a target
    pub fn threshold_progress(
        &self,
        attendee_count: u64,
        revenue_cents: u64,
    ) -> Option<ThresholdProgress> {
        if !self.is_threshold() {
            return None;
        }
        let threshold_type = self.threshold_type?;
        let target = self.threshold_target?;
        let current = match threshold_type {
            ThresholdType::Revenue => revenue_cents,
            ThresholdType::AttendeeCount => attendee_count,
        };
        Some(ThresholdProgress::new(threshold_type, current, target))
    }
}

/// Data needed to create a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub planning: EventAttributeRequest,
    pub attributes: ResolvedEventAttributes,
}

/// How far a threshold event is from going ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdProgress {
    pub threshold_type: ThresholdType,
    pub current: u64,
    pub target: u64,
    pub met: bool,
    /// 0-100, capped once the target is exceeded
    pub percentage: u8,
}

impl ThresholdProgress {
    pub fn new(threshold_type: ThresholdType, current: u64, target: u64) -> Self {
        Self {
            threshold_type,
            current,
            target,
            met: current >= target,
            percentage: rounded_percentage(current.min(target), target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DateCertainty, ParticipationType, VenueCertainty};

    fn make_event(status: EventStatus, threshold_type: Option<ThresholdType>) -> Event {
        Event {
            id: EventId::new(),
            title: "Board game night".to_string(),
            planning: EventAttributeRequest::default(),
            status,
            is_ticketed: false,
            taxation_type: TaxationType::Ticketless,
            is_virtual: false,
            venue_id: Some(VenueId::new()),
            threshold_type,
            threshold_target: threshold_type.map(|_| 100),
            start_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn resolved(status: EventStatus) -> ResolvedEventAttributes {
        ResolvedEventAttributes {
            status,
            is_ticketed: false,
            taxation_type: TaxationType::Ticketless,
            is_virtual: false,
            venue_id: None,
            threshold_type: None,
        }
    }

    #[test]
    fn apply_keeps_venue_when_not_cleared() {
        let mut event = make_event(EventStatus::Confirmed, None);
        let venue = event.venue_id;
        event.apply(
            EventAttributeRequest::default(),
            &resolved(EventStatus::Polling),
        );
        assert_eq!(event.venue_id, venue);
        assert_eq!(event.status, EventStatus::Polling);
    }

    #[test]
    fn apply_clears_venue_when_resolution_says_so() {
        let mut event = make_event(EventStatus::Confirmed, None);
        let mut attrs = resolved(EventStatus::Confirmed);
        attrs.is_virtual = true;
        attrs.venue_id = Some(None);
        let planning = EventAttributeRequest {
            venue_certainty: VenueCertainty::Virtual,
            ..Default::default()
        };

        event.apply(planning, &attrs);

        assert!(event.is_virtual);
        assert_eq!(event.venue_id, None);
        assert!(!event.accepts_venue());
    }

    #[test]
    fn apply_drops_target_when_leaving_threshold() {
        let mut event = make_event(EventStatus::Threshold, Some(ThresholdType::Revenue));
        event.apply(
            EventAttributeRequest::default(),
            &resolved(EventStatus::Confirmed),
        );
        assert_eq!(event.threshold_type, None);
        assert_eq!(event.threshold_target, None);
    }

    #[test]
    fn apply_keeps_target_when_threshold_kind_is_unchanged() {
        let mut event = make_event(EventStatus::Threshold, Some(ThresholdType::AttendeeCount));
        let mut attrs = resolved(EventStatus::Threshold);
        attrs.threshold_type = Some(ThresholdType::AttendeeCount);
        let planning = EventAttributeRequest {
            date_certainty: DateCertainty::Polling,
            participation_type: ParticipationType::Interest,
            ..Default::default()
        };

        event.apply(planning, &attrs);

        assert_eq!(event.threshold_target, Some(100));
    }

    #[test]
    fn threshold_progress_uses_matching_measure() {
        let mut event = make_event(EventStatus::Threshold, Some(ThresholdType::Revenue));
        event.threshold_target = Some(50_000);

        let progress = event.threshold_progress(3, 12_500).unwrap();
        assert_eq!(progress.current, 12_500);
        assert_eq!(progress.percentage, 25);
        assert!(!progress.met);

        event.threshold_type = Some(ThresholdType::AttendeeCount);
        event.threshold_target = Some(20);
        let progress = event.threshold_progress(30, 0).unwrap();
        assert_eq!(progress.current, 30);
        assert_eq!(progress.percentage, 100);
        assert!(progress.met);
    }

    #[test]
    fn threshold_progress_none_without_target_or_threshold() {
        let mut event = make_event(EventStatus::Threshold, Some(ThresholdType::Revenue));
        event.threshold_target = None;
        assert!(event.threshold_progress(1, 1).is_none());

        let event = make_event(EventStatus::Confirmed, None);
        assert!(event.threshold_progress(1, 1).is_none());
    }

    #[test]
    fn event_status_display_and_from_str() {
        for status in [
            EventStatus::Confirmed,
            EventStatus::Polling,
            EventStatus::Draft,
            EventStatus::Threshold,
        ] {
            assert_eq!(status.to_string().parse::<EventStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<EventStatus>().is_err());
    }

    #[test]
    fn taxation_type_from_str() {
        assert_eq!(
            "ticketed_event".parse::<TaxationType>().unwrap(),
            TaxationType::TicketedEvent
        );
        assert_eq!(
            "Contribution_Collection".parse::<TaxationType>().unwrap(),
            TaxationType::ContributionCollection
        );
        assert!("free".parse::<TaxationType>().is_err());
    }

    #[test]
    fn threshold_type_serializes_snake_case() {
        let json = serde_json::to_string(&ThresholdType::AttendeeCount).unwrap();
        assert_eq!(json, "\"attendee_count\"");
    }

    #[test]
    fn event_id_display() {
        let id = EventId(uuid::Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }
}
