//! Event service
//!
//! Creates events and keeps their derived attributes in line with the
//! organizer's planning selections.

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::attribute_resolver;
use crate::domain::entities::{
    Event, EventAttributeRequest, EventId, NewEvent, ThresholdProgress, VenueId,
};
use crate::domain::ports::EventRepository;
use crate::error::{AppError, DomainError};

/// Submitted event form: title plus raw planning parameters
#[derive(Debug, Clone, Default)]
pub struct NewEventForm {
    pub title: String,
    pub params: HashMap<String, String>,
}

/// Service for managing events
pub struct EventService<ER>
where
    ER: EventRepository,
{
    events: Arc<ER>,
}

impl<ER> EventService<ER>
where
    ER: EventRepository,
{
    pub fn new(events: Arc<ER>) -> Self {
        Self { events }
    }

    /// Create an event from a submitted form
    pub async fn create_event(&self, form: NewEventForm) -> Result<Event, AppError> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title can't be blank".to_string()).into());
        }

        let planning = EventAttributeRequest::from_params(&form.params);
        let attributes = attribute_resolver::resolve(&planning);
        let event = self
            .events
            .create(&NewEvent {
                title: title.to_string(),
                planning,
                attributes,
            })
            .await?;

        tracing::info!(
            event_id = %event.id,
            status = %event.status,
            taxation_type = %event.taxation_type,
            "Event created"
        );

        Ok(event)
    }

    /// Get an event by ID
    pub async fn get_event(&self, id: &EventId) -> Result<Event, AppError> {
        Ok(self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Event not found: {}", id)))?)
    }

    /// Re-resolve an event's attributes from newly submitted planning parameters
    pub async fn update_planning(
        &self,
        id: &EventId,
        params: &HashMap<String, String>,
    ) -> Result<Event, AppError> {
        let mut event = self.get_event(id).await?;
        let planning = EventAttributeRequest::from_params(params);
        let resolved = attribute_resolver::resolve(&planning);

        let old_status = event.status;
        event.apply(planning, &resolved);
        let event = self.events.update(&event).await?;

        tracing::info!(
            event_id = %event.id,
            old_status = %old_status,
            new_status = %event.status,
            venue_cleared = resolved.clears_venue(),
            "Event planning updated"
        );

        Ok(event)
    }

    /// Attach a concrete venue picked by the organizer
    pub async fn assign_venue(&self, id: &EventId, venue_id: VenueId) -> Result<Event, AppError> {
        let mut event = self.get_event(id).await?;
        if !event.accepts_venue() {
            return Err(DomainError::Conflict(format!(
                "Event {} is {} and cannot have a venue",
                id, event.planning.venue_certainty
            ))
            .into());
        }

        event.venue_id = Some(venue_id);
        let event = self.events.update(&event).await?;
        tracing::info!(event_id = %event.id, venue_id = %venue_id, "Venue assigned");
        Ok(event)
    }

    /// Set the attendee count or revenue (in cents) a threshold event needs
    pub async fn set_threshold_target(&self, id: &EventId, target: u64) -> Result<Event, AppError> {
        if target == 0 {
            return Err(
                DomainError::Validation("threshold target must be positive".to_string()).into(),
            );
        }

        let mut event = self.get_event(id).await?;
        if !event.is_threshold() {
            return Err(DomainError::Conflict(format!(
                "Event {} is {}, not a threshold event",
                id, event.status
            ))
            .into());
        }

        event.threshold_target = Some(target);
        Ok(self.events.update(&event).await?)
    }

    /// Progress toward the threshold target; `None` for non-threshold events or
    /// when no target has been set
    pub async fn threshold_progress(
        &self,
        id: &EventId,
        attendee_count: u64,
        revenue_cents: u64,
    ) -> Result<Option<ThresholdProgress>, AppError> {
        let event = self.get_event(id).await?;
        let progress = event.threshold_progress(attendee_count, revenue_cents);
        if progress.is_none() {
            tracing::debug!(event_id = %id, "No threshold progress to report");
        }
        Ok(progress)
    }
}
