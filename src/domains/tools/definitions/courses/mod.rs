//! Course tools: listing, details, syllabus and modules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod get_course;
pub mod get_course_modules;
pub mod get_syllabus;
pub mod list_courses;

pub use get_course::{GetCourseParams, GetCourseTool};
pub use get_course_modules::{GetCourseModulesParams, GetCourseModulesTool};
pub use get_syllabus::{GetSyllabusParams, GetSyllabusTool};
pub use list_courses::{ListCoursesParams, ListCoursesTool};

/// Extra course data Canvas can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseInclude {
    SyllabusBody,
    Term,
    CourseProgress,
    TotalStudents,
    Teachers,
}
