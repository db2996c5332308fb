//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route; this module only lists them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::ToolContext;
use super::definitions::{
    GetAssignmentTool, GetCourseModulesTool, GetCourseTool, GetDashboardCardsTool,
    GetFileContentTool, GetFileMetadataTool, GetProfileTool, GetSyllabusTool,
    ListAssignmentsTool, ListCalendarEventsTool, ListCoursesTool, ListUsersTool,
    SubmitAssignmentTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(context: Arc<ToolContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ListCoursesTool::create_route(context.clone()))
        .with_route(GetCourseTool::create_route(context.clone()))
        .with_route(GetSyllabusTool::create_route(context.clone()))
        .with_route(GetCourseModulesTool::create_route(context.clone()))
        .with_route(ListAssignmentsTool::create_route(context.clone()))
        .with_route(GetAssignmentTool::create_route(context.clone()))
        .with_route(SubmitAssignmentTool::create_route(context.clone()))
        .with_route(GetProfileTool::create_route(context.clone()))
        .with_route(ListUsersTool::create_route(context.clone()))
        .with_route(GetDashboardCardsTool::create_route(context.clone()))
        .with_route(ListCalendarEventsTool::create_route(context.clone()))
        .with_route(GetFileMetadataTool::create_route(context.clone()))
        .with_route(GetFileContentTool::create_route(context))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::tools::definitions::common::test_support::offline_context;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(offline_context());
        let tools = router.list_all();
        assert_eq!(tools.len(), 13);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"list_courses"));
        assert!(names.contains(&"get_syllabus"));
        assert!(names.contains(&"list_assignments"));
        assert!(names.contains(&"submit_assignment"));
        assert!(names.contains(&"list_calendar_events"));
        assert!(names.contains(&"get_file_content"));
    }

    #[test]
    fn test_every_tool_has_object_schema() {
        let router: ToolRouter<TestServer> = build_tool_router(offline_context());
        for tool in router.list_all() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "{} schema is not an object",
                tool.name
            );
            assert!(tool.description.is_some());
        }
    }

    #[test]
    fn test_registry_matches_router() {
        let context = offline_context();
        let registry = ToolRegistry::new(context.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(context);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
