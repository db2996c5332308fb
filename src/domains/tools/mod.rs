//! Tools domain module.
//!
//! Every Canvas capability the server exposes is a tool: a typed parameter
//! struct with a generated JSON schema and an async `execute`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `context.rs` - Canvas client and response cache shared by all tools
//! - `format.rs` - Response size limiting
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file under `definitions/`
//! 2. Define params, `execute()`, `to_tool()`, `create_route()` and `http_handler()`
//! 3. Export it from the group's `mod.rs`
//! 4. Add the route in `router.rs`
//! 5. Register it in `registry.rs` for HTTP support

mod context;
pub mod definitions;
mod error;
pub mod format;
mod registry;
pub mod router;

pub use context::ToolContext;
pub use error::{ArgumentIssue, ToolError};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
