//! Dashboard tools: course cards and the calendar.

pub mod get_dashboard_cards;
pub mod list_calendar_events;

pub use get_dashboard_cards::{GetDashboardCardsParams, GetDashboardCardsTool};
pub use list_calendar_events::{ListCalendarEventsParams, ListCalendarEventsTool};
