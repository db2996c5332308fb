//! User tools: profiles and course rosters.

pub mod get_profile;
pub mod list_users;

pub use get_profile::{GetProfileParams, GetProfileTool, UserRef};
pub use list_users::{ListUsersParams, ListUsersTool};
