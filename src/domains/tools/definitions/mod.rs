//! Tool definitions module.
//!
//! One file per tool, grouped by the Canvas area it reads from.

pub mod assignments;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod files;
pub mod users;

pub use assignments::{GetAssignmentTool, ListAssignmentsTool, SubmitAssignmentTool};
pub use courses::{GetCourseModulesTool, GetCourseTool, GetSyllabusTool, ListCoursesTool};
pub use dashboard::{GetDashboardCardsTool, ListCalendarEventsTool};
pub use files::{GetFileContentTool, GetFileMetadataTool};
pub use users::{GetProfileTool, ListUsersTool};
