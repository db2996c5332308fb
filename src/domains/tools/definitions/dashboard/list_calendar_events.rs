//! List calendar events tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{
    PAGE_SIZE, into_items, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::{EVENTS, format_list};
use crate::domains::tools::{ToolContext, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventType {
    Event,
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventExclude {
    Assignment,
    Description,
    ChildEvents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventInclude {
    WebConference,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListCalendarEventsParams {
    /// Calendar events or assignment due dates.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<CalendarEventType>,

    /// ISO 8601 date or timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// ISO 8601 date or timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Contexts such as `course_123` or `user_45`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_codes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<EventExclude>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<EventInclude>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important_dates: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackout_date: Option<bool>,
}

impl ListCalendarEventsParams {
    fn has_context_codes(&self) -> bool {
        self.context_codes.as_ref().is_some_and(|codes| !codes.is_empty())
    }

    /// Events across explicit contexts live under `/calendar_events`; without
    /// them Canvas scopes the listing to the current user.
    fn path(&self) -> &'static str {
        if self.has_context_codes() {
            "/calendar_events"
        } else {
            "/users/self/calendar_events"
        }
    }

    fn query(&self) -> Query {
        Query::new()
            .push("per_page", PAGE_SIZE)
            .push_opt("type", self.event_type)
            .push_opt("start_date", self.start_date.as_deref())
            .push_opt("end_date", self.end_date.as_deref())
            .push_list("context_codes", self.context_codes.as_deref())
            .push_list("excludes", self.excludes.as_deref())
            .push_list("includes", self.includes.as_deref())
            .push_opt("important_dates", self.important_dates)
            .push_opt("blackout_date", self.blackout_date)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct ListCalendarEventsTool;

impl ListCalendarEventsTool {
    pub const NAME: &'static str = "list_calendar_events";

    pub const DESCRIPTION: &'static str = "List calendar events and assignment due dates. \
        Narrow with start_date/end_date; pass context_codes to query specific courses.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        params: ListCalendarEventsParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let events: Vec<Value> = context
                .client()
                .get_all_pages(params.path(), params.query())
                .await?;
            Ok::<_, CanvasError>(Value::Array(events))
        };

        let events = into_items(context.cached(key, CacheTtl::Short, fetch).await?);
        info!(count = events.len(), "Listed calendar events");

        Ok(text_result(format_list(&events, &EVENTS)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<ListCalendarEventsParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::parse_arguments;
    use serde_json::json;

    #[test]
    fn test_path_depends_on_context_codes() {
        assert_eq!(
            ListCalendarEventsParams::default().path(),
            "/users/self/calendar_events"
        );

        let empty = ListCalendarEventsParams {
            context_codes: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(empty.path(), "/users/self/calendar_events");

        let scoped = ListCalendarEventsParams {
            context_codes: Some(vec!["course_101".to_string()]),
            ..Default::default()
        };
        assert_eq!(scoped.path(), "/calendar_events");
    }

    #[test]
    fn test_type_field_is_renamed() {
        let params: ListCalendarEventsParams = parse_arguments(
            &ListCalendarEventsTool::to_tool(),
            json!({"type": "assignment", "start_date": "2024-09-01"}),
        )
        .unwrap();
        assert_eq!(params.event_type, Some(CalendarEventType::Assignment));

        let query = params.query();
        assert_eq!(query.get("type"), Some("assignment"));
        assert_eq!(query.get("start_date"), Some("2024-09-01"));
    }

    #[test]
    fn test_list_params_use_bracket_keys() {
        let params = ListCalendarEventsParams {
            context_codes: Some(vec!["course_1".to_string(), "course_2".to_string()]),
            excludes: Some(vec![EventExclude::ChildEvents]),
            ..Default::default()
        };
        let query = params.query();
        assert_eq!(query.get("context_codes[]"), Some("course_1"));
        assert_eq!(query.get("excludes[]"), Some("child_events"));
    }
}
