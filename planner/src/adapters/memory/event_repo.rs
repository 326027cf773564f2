use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{read, write};
use crate::domain::entities::{Event, EventId, NewEvent};
use crate::domain::ports::EventRepository;
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an existing event
    pub fn with_event(self, event: Event) -> Self {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event.id, event);
        self
    }

    /// Store an event as-is, keeping its ID
    pub fn insert(&self, event: Event) -> Result<(), DomainError> {
        write(&self.events)?.insert(event.id, event);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        Ok(read(&self.events)?.get(id).cloned())
    }

    async fn create(&self, new_event: &NewEvent) -> Result<Event, DomainError> {
        let now = Utc::now();
        let attributes = &new_event.attributes;
        let event = Event {
            id: EventId::new(),
            title: new_event.title.clone(),
            planning: new_event.planning,
            status: attributes.status,
            is_ticketed: attributes.is_ticketed,
            taxation_type: attributes.taxation_type,
            is_virtual: attributes.is_virtual,
            venue_id: None,
            threshold_type: attributes.threshold_type,
            threshold_target: None,
            start_date: None,
            created_at: now,
            updated_at: now,
        };

        write(&self.events)?.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, event: &Event) -> Result<Event, DomainError> {
        let mut events = write(&self.events)?;
        match events.get_mut(&event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(event.clone())
            }
            None => Err(DomainError::NotFound(format!(
                "Event {} not found",
                event.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::attribute_resolver;
    use crate::domain::entities::{EventAttributeRequest, EventStatus, VenueCertainty};

    fn new_event(title: &str) -> NewEvent {
        let planning = EventAttributeRequest {
            venue_certainty: VenueCertainty::Virtual,
            ..Default::default()
        };
        NewEvent {
            title: title.to_string(),
            planning,
            attributes: attribute_resolver::resolve(&planning),
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(&new_event("Online talk")).await.unwrap();

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Online talk");
        assert!(found.is_virtual);
        assert_eq!(found.status, EventStatus::Confirmed);
        assert_eq!(found.venue_id, None);
    }

    #[tokio::test]
    async fn update_replaces_stored_event() {
        let repo = InMemoryEventRepository::new();
        let mut event = repo.create(&new_event("Talk")).await.unwrap();
        event.title = "Renamed talk".to_string();

        repo.update(&event).await.unwrap();

        let found = repo.find_by_id(&event.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Renamed talk");
    }

    #[tokio::test]
    async fn update_missing_event_is_not_found() {
        let repo = InMemoryEventRepository::new();
        let mut event = repo.create(&new_event("Talk")).await.unwrap();
        event.id = EventId::new();

        let result = repo.update(&event).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
