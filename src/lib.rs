//! Canvas LMS MCP Server Library
//!
//! A Model Context Protocol server that exposes a student's Canvas LMS data
//! (courses, assignments, people, calendar, files) as MCP tools.
//!
//! # Architecture
//!
//! - **canvas**: HTTP client for the Canvas REST API (auth, retries,
//!   pagination, downloads)
//! - **core**: Configuration, error handling, response cache, the MCP server
//!   and its transports
//! - **domains::tools**: One MCP tool per Canvas operation
//!
//! # Example
//!
//! ```rust,no_run
//! use canvas_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod core;
pub mod domains;

pub use canvas::{CanvasClient, CanvasError, ClientConfig};
pub use core::{Config, Error, McpServer, Result};
