//! Assignment tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod get_assignment;
pub mod list_assignments;
pub mod submit_assignment;

pub use get_assignment::{GetAssignmentParams, GetAssignmentTool};
pub use list_assignments::{ListAssignmentsParams, ListAssignmentsTool};
pub use submit_assignment::{SubmitAssignmentParams, SubmitAssignmentTool};

/// Extra assignment data Canvas can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentInclude {
    Submission,
    AssignmentVisibility,
    AllDates,
    Overrides,
    ObservedUsers,
}
