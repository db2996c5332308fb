//! Domains module containing the server's business logic.
//!
//! The Canvas integration is exposed purely as MCP tools.

pub mod tools;
