//! Evently MCP Server implementation
//!
//! Each tool parses its string arguments into domain types, calls the
//! planner services and answers with pretty-printed JSON. Bad arguments and
//! domain failures come back as tool errors so the calling agent can read
//! and correct them.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use evently_planner::adapters::{
    InMemoryEventRepository, InMemoryPollRepository, InMemoryVoteRepository,
};
use evently_planner::app::{
    attribute_resolver, vote_tally, EventService, NewEventForm, PollService, PollSettings,
};
use evently_planner::config::Config;
use evently_planner::domain::entities::{
    DateOptionId, EventId, PollId, UserId, VenueId, VoteType, DATE_CERTAINTY_PARAM,
    PARTICIPATION_TYPE_PARAM, TAXATION_TYPE_PARAM, VENUE_CERTAINTY_PARAM,
};
use evently_planner::error::AppError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

type Events = EventService<InMemoryEventRepository>;
type Polls = PollService<InMemoryEventRepository, InMemoryPollRepository, InMemoryVoteRepository>;

/// Evently MCP Server
///
/// Event and poll services share one set of in-memory repositories.
#[derive(Clone)]
pub struct EventPlannerServer {
    events: Arc<Events>,
    polls: Arc<Polls>,
    tool_router: ToolRouter<Self>,
}

impl EventPlannerServer {
    pub fn new(config: &Config) -> Self {
        let event_repo = Arc::new(InMemoryEventRepository::new());
        let poll_repo = Arc::new(InMemoryPollRepository::new());
        let vote_repo = Arc::new(InMemoryVoteRepository::new());

        let events = EventService::new(event_repo.clone());
        let polls = PollService::new(event_repo, poll_repo, vote_repo)
            .with_settings(PollSettings::from(config));

        Self {
            events: Arc::new(events),
            polls: Arc::new(polls),
            tool_router: Self::tool_router(),
        }
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PlanningParams {
    /// "confirmed", "polling" or "planning" (default "confirmed")
    #[serde(default)]
    pub date_certainty: Option<String>,
    /// "confirmed", "virtual", "polling" or "tbd" (default "confirmed")
    #[serde(default)]
    pub venue_certainty: Option<String>,
    /// "free", "ticketed", "contribution", "crowdfunding" or "interest" (default "free")
    #[serde(default)]
    pub participation_type: Option<String>,
    /// Only used with "interest": "ticketless", "ticketed_event" or "contribution_collection"
    #[serde(default)]
    pub taxation_type: Option<String>,
}

impl PlanningParams {
    fn into_map(self) -> HashMap<String, String> {
        [
            (DATE_CERTAINTY_PARAM, self.date_certainty),
            (VENUE_CERTAINTY_PARAM, self.venue_certainty),
            (PARTICIPATION_TYPE_PARAM, self.participation_type),
            (TAXATION_TYPE_PARAM, self.taxation_type),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TallyParams {
    /// Votes on one date: each "yes", "if_need_be" or "no"
    pub votes: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateEventParams {
    /// Event title
    pub title: String,
    #[serde(flatten)]
    pub planning: PlanningParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EventParams {
    /// Event ID (UUID)
    pub event_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdatePlanningParams {
    /// Event ID (UUID)
    pub event_id: String,
    #[serde(flatten)]
    pub planning: PlanningParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AssignVenueParams {
    /// Event ID (UUID)
    pub event_id: String,
    /// Venue ID (UUID)
    pub venue_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ThresholdTargetParams {
    /// Event ID (UUID)
    pub event_id: String,
    /// Attendee count, or revenue in cents, the event needs to go ahead
    pub target: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ThresholdProgressParams {
    /// Event ID (UUID)
    pub event_id: String,
    #[serde(default)]
    pub attendee_count: u64,
    #[serde(default)]
    pub revenue_cents: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePollParams {
    /// Event ID (UUID)
    pub event_id: String,
    /// Candidate dates as YYYY-MM-DD
    pub dates: Vec<String>,
    /// RFC 3339 timestamp after which votes are refused
    #[serde(default)]
    pub voting_deadline: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddDateOptionParams {
    /// Poll ID (UUID)
    pub poll_id: String,
    /// Candidate date as YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CastVoteParams {
    /// Poll ID (UUID)
    pub poll_id: String,
    /// Date option ID (UUID)
    pub option_id: String,
    /// Voter ID (UUID)
    pub user_id: String,
    /// "yes", "if_need_be" or "no"
    pub vote: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemoveVoteParams {
    /// Date option ID (UUID)
    pub option_id: String,
    /// Voter ID (UUID)
    pub user_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PollParams {
    /// Poll ID (UUID)
    pub poll_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FinalizePollParams {
    /// Poll ID (UUID)
    pub poll_id: String,
    /// The winning date option ID (UUID)
    pub option_id: String,
}

// --- Argument parsing ---

fn parse_id<T: From<Uuid>>(field: &str, value: &str) -> Result<T, String> {
    Uuid::parse_str(value.trim())
        .map(T::from)
        .map_err(|_| format!("invalid: {} must be a UUID, got '{}'", field, value))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid: '{}' is not a YYYY-MM-DD date", value))
}

fn parse_deadline(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid: '{}' is not an RFC 3339 timestamp", value))
}

fn parse_vote(value: &str) -> Result<VoteType, String> {
    VoteType::from_str(value).map_err(|e| format!("invalid: {}", e))
}

fn describe(err: AppError) -> String {
    format!("{}: {}", err.kind(), err)
}

fn respond<T: Serialize>(outcome: Result<T, String>) -> Result<CallToolResult, McpError> {
    let rendered =
        outcome.and_then(|value| serde_json::to_string_pretty(&value).map_err(|e| e.to_string()));
    match rendered {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(message) => {
            tracing::debug!(error = %message, "Tool call failed");
            Ok(CallToolResult::error(vec![Content::text(message)]))
        }
    }
}

#[tool_router]
impl EventPlannerServer {
    // === Pure calculations ===

    #[tool(
        description = "Resolve planning selections into event attributes (status, ticketing, taxation, virtual, venue and threshold type). Unknown or missing selections use defaults."
    )]
    async fn resolve_event_attributes(
        &self,
        params: Parameters<PlanningParams>,
    ) -> Result<CallToolResult, McpError> {
        let resolved = attribute_resolver::resolve_params(&params.0.into_map());
        respond(Ok(resolved.to_params()))
    }

    #[tool(description = "Tally the votes cast on one candidate date.")]
    async fn tally_votes(&self, params: Parameters<TallyParams>) -> Result<CallToolResult, McpError> {
        let votes: Result<Vec<VoteType>, String> =
            params.0.votes.iter().map(|v| parse_vote(v)).collect();
        respond(votes.map(vote_tally::tally))
    }

    // === Events ===

    #[tool(description = "Create an event from a title and planning selections.")]
    async fn create_event(
        &self,
        params: Parameters<CreateEventParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let form = NewEventForm {
            title: p.title,
            params: p.planning.into_map(),
        };
        respond(self.events.create_event(form).await.map_err(describe))
    }

    #[tool(description = "Get an event by ID.")]
    async fn get_event(&self, params: Parameters<EventParams>) -> Result<CallToolResult, McpError> {
        let outcome = match parse_id::<EventId>("event_id", &params.0.event_id) {
            Ok(id) => self.events.get_event(&id).await.map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(
        description = "Replace an event's planning selections and re-resolve its attributes. Going virtual or TBD clears the venue."
    )]
    async fn update_event_planning(
        &self,
        params: Parameters<UpdatePlanningParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let outcome = match parse_id::<EventId>("event_id", &p.event_id) {
            Ok(id) => self
                .events
                .update_planning(&id, &p.planning.into_map())
                .await
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(description = "Attach a venue to an event whose venue is confirmed or being polled.")]
    async fn assign_venue(
        &self,
        params: Parameters<AssignVenueParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let ids = parse_id::<EventId>("event_id", &p.event_id)
            .and_then(|event| Ok((event, parse_id::<VenueId>("venue_id", &p.venue_id)?)));
        let outcome = match ids {
            Ok((event, venue)) => self.events.assign_venue(&event, venue).await.map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(description = "Set the attendee count or revenue (cents) a threshold event needs.")]
    async fn set_threshold_target(
        &self,
        params: Parameters<ThresholdTargetParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let outcome = match parse_id::<EventId>("event_id", &p.event_id) {
            Ok(id) => self
                .events
                .set_threshold_target(&id, p.target)
                .await
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(
        description = "Report a threshold event's progress toward its target. Returns null for other events or when no target is set."
    )]
    async fn threshold_progress(
        &self,
        params: Parameters<ThresholdProgressParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let outcome = match parse_id::<EventId>("event_id", &p.event_id) {
            Ok(id) => self
                .events
                .threshold_progress(&id, p.attendee_count, p.revenue_cents)
                .await
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    // === Date polls ===

    #[tool(description = "Open a date poll for an event whose date certainty is 'polling'.")]
    async fn create_date_poll(
        &self,
        params: Parameters<CreatePollParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let parsed = (|| {
            let event_id = parse_id::<EventId>("event_id", &p.event_id)?;
            let dates = p
                .dates
                .iter()
                .map(|d| parse_date(d))
                .collect::<Result<Vec<_>, _>>()?;
            let deadline = p.voting_deadline.as_deref().map(parse_deadline).transpose()?;
            Ok::<_, String>((event_id, dates, deadline))
        })();
        let outcome = match parsed {
            Ok((event_id, dates, deadline)) => self
                .polls
                .create_poll(&event_id, dates, deadline)
                .await
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(description = "Add another candidate date to an open poll.")]
    async fn add_date_option(
        &self,
        params: Parameters<AddDateOptionParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let parsed = parse_id::<PollId>("poll_id", &p.poll_id)
            .and_then(|poll| Ok((poll, parse_date(&p.date)?)));
        let outcome = match parsed {
            Ok((poll, date)) => self.polls.add_date_option(&poll, date).await.map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(
        description = "Cast or change a vote on one candidate date. One vote per user per date; voting again replaces it."
    )]
    async fn cast_vote(&self, params: Parameters<CastVoteParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let parsed = (|| {
            Ok::<_, String>((
                parse_id::<PollId>("poll_id", &p.poll_id)?,
                parse_id::<DateOptionId>("option_id", &p.option_id)?,
                parse_id::<UserId>("user_id", &p.user_id)?,
                parse_vote(&p.vote)?,
            ))
        })();
        let outcome = match parsed {
            Ok((poll, option, user, vote)) => self
                .polls
                .cast_vote(&poll, &option, &user, vote)
                .await
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(description = "Withdraw a user's vote on one candidate date.")]
    async fn remove_vote(
        &self,
        params: Parameters<RemoveVoteParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let parsed = parse_id::<DateOptionId>("option_id", &p.option_id)
            .and_then(|option| Ok((option, parse_id::<UserId>("user_id", &p.user_id)?)));
        let outcome = match parsed {
            Ok((option, user)) => self
                .polls
                .remove_vote(&option, &user)
                .await
                .map(|()| serde_json::json!({ "removed": true }))
                .map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(
        description = "Show a poll's tallies per date (chronological), the ranking (best first) and the leading date."
    )]
    async fn poll_results(&self, params: Parameters<PollParams>) -> Result<CallToolResult, McpError> {
        let outcome = match parse_id::<PollId>("poll_id", &params.0.poll_id) {
            Ok(id) => self.polls.results(&id).await.map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }

    #[tool(
        description = "Close a poll on the chosen date. Confirms the event's date and re-resolves its attributes."
    )]
    async fn finalize_poll(
        &self,
        params: Parameters<FinalizePollParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let parsed = parse_id::<PollId>("poll_id", &p.poll_id)
            .and_then(|poll| Ok((poll, parse_id::<DateOptionId>("option_id", &p.option_id)?)));
        let outcome = match parsed {
            Ok((poll, option)) => self.polls.finalize(&poll, &option).await.map_err(describe),
            Err(e) => Err(e),
        };
        respond(outcome)
    }
}

#[tool_handler]
impl ServerHandler for EventPlannerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "evently".into(),
                title: Some("Evently Planner MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Evently - event planning and date polls

PLANNING SELECTIONS:
- date_certainty: confirmed | polling | planning
- venue_certainty: confirmed | virtual | polling | tbd
- participation_type: free | ticketed | contribution | crowdfunding | interest

WORKFLOW:
1. 'resolve_event_attributes' - Preview what a set of selections means
2. 'create_event' - Create the event
3. 'create_date_poll' - If date_certainty is polling, offer candidate dates
4. 'cast_vote' - Each participant votes yes / if_need_be / no per date
5. 'poll_results' - See tallies and the leading date
6. 'finalize_poll' - Pick the date; the event becomes confirmed

THRESHOLD EVENTS:
Crowdfunding and interest events go ahead once a target is met. Use
'set_threshold_target' then 'threshold_progress'.

IDs are UUID strings; dates are YYYY-MM-DD. All state is in memory."#
                    .into(),
            ),
        }
    }
}
