//! Event planning selections and the attributes resolved from them
//!
//! Organizers pick three independent "certainty" selections on the event form.
//! Each selection is a closed set: unknown strings never create new variants,
//! they fall back to the documented default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::{EventStatus, TaxationType, ThresholdType, VenueId};

/// Form keys the selections are read from
pub const DATE_CERTAINTY_PARAM: &str = "date_certainty";
pub const VENUE_CERTAINTY_PARAM: &str = "venue_certainty";
pub const PARTICIPATION_TYPE_PARAM: &str = "participation_type";
pub const TAXATION_TYPE_PARAM: &str = "taxation_type";

/// How settled the event date is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateCertainty {
    #[default]
    Confirmed,
    Polling,
    Planning,
}

impl DateCertainty {
    pub const ALL: [DateCertainty; 3] = [
        DateCertainty::Confirmed,
        DateCertainty::Polling,
        DateCertainty::Planning,
    ];

    /// Lenient parse: missing or unknown values become the default
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for DateCertainty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateCertainty::Confirmed => write!(f, "confirmed"),
            DateCertainty::Polling => write!(f, "polling"),
            DateCertainty::Planning => write!(f, "planning"),
        }
    }
}

impl std::str::FromStr for DateCertainty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(DateCertainty::Confirmed),
            "polling" => Ok(DateCertainty::Polling),
            "planning" => Ok(DateCertainty::Planning),
            _ => Err(format!("Unknown date certainty: {}", s)),
        }
    }
}

/// How settled the event location is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueCertainty {
    #[default]
    Confirmed,
    Virtual,
    Polling,
    Tbd,
}

impl VenueCertainty {
    pub const ALL: [VenueCertainty; 4] = [
        VenueCertainty::Confirmed,
        VenueCertainty::Virtual,
        VenueCertainty::Polling,
        VenueCertainty::Tbd,
    ];

    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Virtual and undecided events never carry a physical venue
    pub fn allows_venue(&self) -> bool {
        matches!(self, VenueCertainty::Confirmed | VenueCertainty::Polling)
    }
}

impl std::fmt::Display for VenueCertainty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueCertainty::Confirmed => write!(f, "confirmed"),
            VenueCertainty::Virtual => write!(f, "virtual"),
            VenueCertainty::Polling => write!(f, "polling"),
            VenueCertainty::Tbd => write!(f, "tbd"),
        }
    }
}

impl std::str::FromStr for VenueCertainty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(VenueCertainty::Confirmed),
            "virtual" => Ok(VenueCertainty::Virtual),
            "polling" => Ok(VenueCertainty::Polling),
            "tbd" => Ok(VenueCertainty::Tbd),
            _ => Err(format!("Unknown venue certainty: {}", s)),
        }
    }
}

/// How attendees take part in the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationType {
    #[default]
    Free,
    Ticketed,
    Contribution,
    Crowdfunding,
    Interest,
}

impl ParticipationType {
    pub const ALL: [ParticipationType; 5] = [
        ParticipationType::Free,
        ParticipationType::Ticketed,
        ParticipationType::Contribution,
        ParticipationType::Crowdfunding,
        ParticipationType::Interest,
    ];

    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for ParticipationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipationType::Free => write!(f, "free"),
            ParticipationType::Ticketed => write!(f, "ticketed"),
            ParticipationType::Contribution => write!(f, "contribution"),
            ParticipationType::Crowdfunding => write!(f, "crowdfunding"),
            ParticipationType::Interest => write!(f, "interest"),
        }
    }
}

impl std::str::FromStr for ParticipationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(ParticipationType::Free),
            "ticketed" => Ok(ParticipationType::Ticketed),
            "contribution" => Ok(ParticipationType::Contribution),
            "crowdfunding" => Ok(ParticipationType::Crowdfunding),
            "interest" => Ok(ParticipationType::Interest),
            _ => Err(format!("Unknown participation type: {}", s)),
        }
    }
}

/// The organizer's planning selections for one form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventAttributeRequest {
    pub date_certainty: DateCertainty,
    pub venue_certainty: VenueCertainty,
    pub participation_type: ParticipationType,
    /// Explicit taxation selection; only consulted for interest events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxation_type: Option<TaxationType>,
}

impl EventAttributeRequest {
    /// Decode the selections from form parameters. Never fails.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).map(String::as_str);
        Self {
            date_certainty: DateCertainty::from_param(get(DATE_CERTAINTY_PARAM)),
            venue_certainty: VenueCertainty::from_param(get(VENUE_CERTAINTY_PARAM)),
            participation_type: ParticipationType::from_param(get(PARTICIPATION_TYPE_PARAM)),
            taxation_type: get(TAXATION_TYPE_PARAM).and_then(|v| v.parse().ok()),
        }
    }
}

/// Attributes derived from an [`EventAttributeRequest`], ready to be merged
/// into a persistence update.
///
/// `venue_id` is three-state: `None` leaves the stored venue alone,
/// `Some(None)` clears it (serialized as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedEventAttributes {
    pub status: EventStatus,
    pub is_ticketed: bool,
    pub taxation_type: TaxationType,
    pub is_virtual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<Option<VenueId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_type: Option<ThresholdType>,
}

impl ResolvedEventAttributes {
    pub fn clears_venue(&self) -> bool {
        matches!(self.venue_id, Some(None))
    }

    /// Flat key/value form for merging into an update call
    pub fn to_params(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}
