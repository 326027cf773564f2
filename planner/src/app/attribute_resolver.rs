//! Event attribute resolution
//!
//! Maps the three planning selections (date certainty, venue certainty,
//! participation type) onto the persisted event attributes. Each selection is
//! looked up independently; the status candidates they produce are then merged
//! by a single precedence list. Total over its input: unknown selections were
//! already turned into defaults by the closed-set parsers.

use std::collections::HashMap;

use crate::domain::entities::{
    DateCertainty, EventAttributeRequest, EventStatus, ParticipationType,
    ResolvedEventAttributes, TaxationType, ThresholdType, VenueCertainty, VenueId,
};

/// Status candidates, highest priority first
pub const STATUS_PRECEDENCE: [EventStatus; 4] = [
    EventStatus::Threshold,
    EventStatus::Polling,
    EventStatus::Draft,
    EventStatus::Confirmed,
];

/// What the venue selection contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VenueEffect {
    status: Option<EventStatus>,
    is_virtual: bool,
    venue_id: Option<Option<VenueId>>,
}

/// What the participation selection contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParticipationEffect {
    status: Option<EventStatus>,
    is_ticketed: bool,
    taxation_type: TaxationType,
    threshold_type: Option<ThresholdType>,
}

fn date_status(date: DateCertainty) -> EventStatus {
    match date {
        DateCertainty::Confirmed => EventStatus::Confirmed,
        DateCertainty::Polling => EventStatus::Polling,
        DateCertainty::Planning => EventStatus::Draft,
    }
}

fn venue_effect(venue: VenueCertainty) -> VenueEffect {
    match venue {
        VenueCertainty::Confirmed => VenueEffect {
            status: None,
            is_virtual: false,
            venue_id: None,
        },
        VenueCertainty::Virtual => VenueEffect {
            status: None,
            is_virtual: true,
            venue_id: Some(None),
        },
        VenueCertainty::Polling => VenueEffect {
            status: Some(EventStatus::Polling),
            is_virtual: false,
            venue_id: None,
        },
        VenueCertainty::Tbd => VenueEffect {
            status: None,
            is_virtual: false,
            venue_id: Some(None),
        },
    }
}

fn participation_effect(
    participation: ParticipationType,
    taxation_override: Option<TaxationType>,
) -> ParticipationEffect {
    match participation {
        ParticipationType::Free => ParticipationEffect {
            status: None,
            is_ticketed: false,
            taxation_type: TaxationType::Ticketless,
            threshold_type: None,
        },
        ParticipationType::Ticketed => ParticipationEffect {
            status: None,
            is_ticketed: true,
            taxation_type: TaxationType::TicketedEvent,
            threshold_type: None,
        },
        ParticipationType::Contribution => ParticipationEffect {
            status: None,
            is_ticketed: false,
            taxation_type: TaxationType::ContributionCollection,
            threshold_type: None,
        },
        ParticipationType::Crowdfunding => ParticipationEffect {
            status: Some(EventStatus::Threshold),
            is_ticketed: true,
            taxation_type: TaxationType::TicketedEvent,
            threshold_type: Some(ThresholdType::Revenue),
        },
        ParticipationType::Interest => {
            // Interest gauging says nothing about money; an explicit taxation
            // selection wins, ticketless otherwise.
            let taxation_type = taxation_override.unwrap_or(TaxationType::Ticketless);
            ParticipationEffect {
                status: Some(EventStatus::Threshold),
                is_ticketed: taxation_type == TaxationType::TicketedEvent,
                taxation_type,
                threshold_type: Some(ThresholdType::AttendeeCount),
            }
        }
    }
}

/// Pick the highest-priority status among the candidates
pub fn merge_status(candidates: &[EventStatus]) -> EventStatus {
    STATUS_PRECEDENCE
        .iter()
        .copied()
        .find(|status| candidates.contains(status))
        .unwrap_or(EventStatus::Confirmed)
}

/// Resolve planning selections into event attributes
pub fn resolve(request: &EventAttributeRequest) -> ResolvedEventAttributes {
    let venue = venue_effect(request.venue_certainty);
    let participation = participation_effect(request.participation_type, request.taxation_type);

    let candidates: Vec<EventStatus> = std::iter::once(date_status(request.date_certainty))
        .chain(venue.status)
        .chain(participation.status)
        .collect();
    let status = merge_status(&candidates);

    let threshold_type = if status == EventStatus::Threshold {
        participation.threshold_type
    } else {
        None
    };
    let is_ticketed = participation.is_ticketed
        && participation.taxation_type != TaxationType::ContributionCollection;

    ResolvedEventAttributes {
        status,
        is_ticketed,
        taxation_type: participation.taxation_type,
        is_virtual: venue.is_virtual,
        venue_id: venue.venue_id,
        threshold_type,
    }
}

/// Decode form parameters and resolve them
pub fn resolve_params(params: &HashMap<String, String>) -> ResolvedEventAttributes {
    resolve(&EventAttributeRequest::from_params(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `""` stands for a form that omits the key
    const DATES: [&str; 5] = ["confirmed", "polling", "planning", "invalid", ""];
    const VENUES: [&str; 5] = ["confirmed", "virtual", "polling", "tbd", "invalid"];
    const PARTICIPATIONS: [&str; 6] = [
        "free",
        "ticketed",
        "contribution",
        "crowdfunding",
        "interest",
        "invalid",
    ];

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Every (date, venue, participation) string combination with its resolution
    fn matrix() -> Vec<((&'static str, &'static str, &'static str), ResolvedEventAttributes)> {
        let mut rows = Vec::new();
        for date in DATES {
            for venue in VENUES {
                for participation in PARTICIPATIONS {
                    let resolved = resolve_params(&params(&[
                        ("date_certainty", date),
                        ("venue_certainty", venue),
                        ("participation_type", participation),
                    ]));
                    rows.push(((date, venue, participation), resolved));
                }
            }
        }
        rows
    }

    #[test]
    fn matrix_covers_all_combinations() {
        assert_eq!(matrix().len(), 150);
    }

    #[test]
    fn missing_date_key_resolves_like_confirmed() {
        for ((date, venue, participation), resolved) in matrix() {
            if date.is_empty() {
                let confirmed = resolve_params(&params(&[
                    ("date_certainty", "confirmed"),
                    ("venue_certainty", venue),
                    ("participation_type", participation),
                ]));
                assert_eq!(resolved, confirmed, "<missing>/{venue}/{participation}");
            }
        }
    }

    #[test]
    fn threshold_participation_always_wins() {
        for ((date, venue, participation), resolved) in matrix() {
            if participation == "crowdfunding" || participation == "interest" {
                assert_eq!(
                    resolved.status,
                    EventStatus::Threshold,
                    "{date}/{venue}/{participation}"
                );
            }
        }
    }

    #[test]
    fn polling_wins_over_draft_and_confirmed() {
        for ((date, venue, participation), resolved) in matrix() {
            let threshold = participation == "crowdfunding" || participation == "interest";
            if !threshold && (date == "polling" || venue == "polling") {
                assert_eq!(
                    resolved.status,
                    EventStatus::Polling,
                    "{date}/{venue}/{participation}"
                );
            }
        }
    }

    #[test]
    fn planning_without_stronger_signal_is_draft() {
        for ((date, venue, participation), resolved) in matrix() {
            let threshold = participation == "crowdfunding" || participation == "interest";
            if !threshold && date == "planning" && venue != "polling" {
                assert_eq!(resolved.status, EventStatus::Draft);
            }
        }
    }

    #[test]
    fn virtual_venue_clears_venue() {
        for ((_, venue, _), resolved) in matrix() {
            if venue == "virtual" {
                assert!(resolved.is_virtual);
                assert_eq!(resolved.venue_id, Some(None));
            }
        }
    }

    #[test]
    fn tbd_venue_clears_venue_without_going_virtual() {
        for ((_, venue, _), resolved) in matrix() {
            if venue == "tbd" {
                assert!(!resolved.is_virtual);
                assert!(resolved.clears_venue());
            }
        }
    }

    #[test]
    fn virtual_never_keeps_a_venue() {
        for (_, resolved) in matrix() {
            if resolved.is_virtual {
                assert!(resolved.clears_venue());
            }
        }
    }

    #[test]
    fn contribution_is_never_ticketed() {
        for (_, resolved) in matrix() {
            if resolved.taxation_type == TaxationType::ContributionCollection {
                assert!(!resolved.is_ticketed);
            }
        }
    }

    #[test]
    fn threshold_type_present_iff_threshold() {
        for ((_, _, participation), resolved) in matrix() {
            assert_eq!(
                resolved.threshold_type.is_some(),
                resolved.status == EventStatus::Threshold
            );
            match participation {
                "crowdfunding" => {
                    assert_eq!(resolved.threshold_type, Some(ThresholdType::Revenue))
                }
                "interest" => {
                    assert_eq!(resolved.threshold_type, Some(ThresholdType::AttendeeCount))
                }
                _ => assert_eq!(resolved.threshold_type, None),
            }
        }
    }

    #[test]
    fn invalid_values_match_defaults() {
        for ((date, venue, participation), resolved) in matrix() {
            let normalized = |value: &'static str, default: &'static str| {
                if value == "invalid" || value.is_empty() {
                    default
                } else {
                    value
                }
            };
            let expected = resolve_params(&params(&[
                ("date_certainty", normalized(date, "confirmed")),
                ("venue_certainty", normalized(venue, "confirmed")),
                ("participation_type", normalized(participation, "free")),
            ]));
            assert_eq!(resolved, expected);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        for ((date, venue, participation), resolved) in matrix() {
            let again = resolve_params(&params(&[
                ("date_certainty", date),
                ("venue_certainty", venue),
                ("participation_type", participation),
            ]));
            assert_eq!(resolved, again);
        }
    }

    #[test]
    fn confirmed_free_event() {
        let resolved = resolve_params(&params(&[
            ("date_certainty", "confirmed"),
            ("venue_certainty", "confirmed"),
            ("participation_type", "free"),
        ]));
        assert_eq!(resolved.status, EventStatus::Confirmed);
        assert!(!resolved.is_ticketed);
        assert_eq!(resolved.taxation_type, TaxationType::Ticketless);
        assert!(!resolved.is_virtual);
        assert_eq!(resolved.venue_id, None);
        assert_eq!(resolved.threshold_type, None);
    }

    #[test]
    fn crowdfunding_overrides_confirmed_date() {
        let resolved = resolve_params(&params(&[
            ("date_certainty", "confirmed"),
            ("venue_certainty", "confirmed"),
            ("participation_type", "crowdfunding"),
        ]));
        assert_eq!(resolved.status, EventStatus::Threshold);
        assert!(resolved.is_ticketed);
        assert_eq!(resolved.taxation_type, TaxationType::TicketedEvent);
        assert_eq!(resolved.threshold_type, Some(ThresholdType::Revenue));
        assert!(!resolved.is_virtual);
    }

    #[test]
    fn double_polling_is_plain_polling() {
        let resolved = resolve_params(&params(&[
            ("date_certainty", "polling"),
            ("venue_certainty", "polling"),
            ("participation_type", "free"),
        ]));
        assert_eq!(resolved.status, EventStatus::Polling);
        assert!(!resolved.is_ticketed);
        assert_eq!(resolved.taxation_type, TaxationType::Ticketless);
    }

    #[test]
    fn planning_virtual_event_is_draft() {
        let resolved = resolve_params(&params(&[
            ("date_certainty", "planning"),
            ("venue_certainty", "virtual"),
            ("participation_type", "free"),
        ]));
        assert_eq!(resolved.status, EventStatus::Draft);
        assert!(resolved.is_virtual);
        assert_eq!(resolved.venue_id, Some(None));
        assert_eq!(resolved.taxation_type, TaxationType::Ticketless);
    }

    #[test]
    fn empty_params_resolve_to_defaults() {
        let resolved = resolve_params(&HashMap::new());
        assert_eq!(resolved.status, EventStatus::Confirmed);
        assert!(!resolved.is_ticketed);
        assert_eq!(resolved.taxation_type, TaxationType::Ticketless);
        assert!(!resolved.is_virtual);
        assert_eq!(resolved.threshold_type, None);
    }

    #[test]
    fn interest_honours_explicit_taxation() {
        let ticketed = resolve_params(&params(&[
            ("participation_type", "interest"),
            ("taxation_type", "ticketed_event"),
        ]));
        assert_eq!(ticketed.status, EventStatus::Threshold);
        assert_eq!(ticketed.taxation_type, TaxationType::TicketedEvent);
        assert!(ticketed.is_ticketed);
        assert_eq!(ticketed.threshold_type, Some(ThresholdType::AttendeeCount));

        let contribution = resolve_params(&params(&[
            ("participation_type", "interest"),
            ("taxation_type", "contribution_collection"),
        ]));
        assert_eq!(
            contribution.taxation_type,
            TaxationType::ContributionCollection
        );
        assert!(!contribution.is_ticketed);

        let unspecified = resolve_params(&params(&[("participation_type", "interest")]));
        assert_eq!(unspecified.taxation_type, TaxationType::Ticketless);
        assert!(!unspecified.is_ticketed);
    }

    #[test]
    fn explicit_taxation_ignored_outside_interest() {
        let resolved = resolve_params(&params(&[
            ("participation_type", "ticketed"),
            ("taxation_type", "contribution_collection"),
        ]));
        assert_eq!(resolved.taxation_type, TaxationType::TicketedEvent);
        assert!(resolved.is_ticketed);
    }

    #[test]
    fn merge_status_follows_precedence() {
        assert_eq!(merge_status(&[]), EventStatus::Confirmed);
        assert_eq!(
            merge_status(&[EventStatus::Confirmed, EventStatus::Draft]),
            EventStatus::Draft
        );
        assert_eq!(
            merge_status(&[EventStatus::Draft, EventStatus::Polling]),
            EventStatus::Polling
        );
        assert_eq!(
            merge_status(&[
                EventStatus::Polling,
                EventStatus::Threshold,
                EventStatus::Polling
            ]),
            EventStatus::Threshold
        );
    }

    #[test]
    fn typed_request_resolves_like_params() {
        let request = EventAttributeRequest {
            date_certainty: DateCertainty::Polling,
            venue_certainty: VenueCertainty::Tbd,
            participation_type: ParticipationType::Contribution,
            taxation_type: None,
        };
        let resolved = resolve(&request);
        assert_eq!(resolved.status, EventStatus::Polling);
        assert_eq!(
            resolved.taxation_type,
            TaxationType::ContributionCollection
        );
        assert!(!resolved.is_ticketed);
        assert!(resolved.clears_venue());
    }
}
