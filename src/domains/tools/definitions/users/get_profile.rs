//! Get profile tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{text_result, tool_model, tool_route};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

/// The literal `"self"`, Canvas's alias for the token's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CurrentUser {
    #[serde(rename = "self")]
    Current,
}

/// A user, by numeric ID or as `"self"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum UserRef {
    Id(u64),
    Current(CurrentUser),
}

impl Default for UserRef {
    fn default() -> Self {
        Self::Current(CurrentUser::Current)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Current(_) => f.write_str("self"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetProfileParams {
    /// User ID, or "self" (the default) for the current user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserRef>,
}

pub struct GetProfileTool;

impl GetProfileTool {
    pub const NAME: &'static str = "get_profile";

    pub const DESCRIPTION: &'static str =
        "Get a user's profile. Defaults to the user that owns the API token.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        params: GetProfileParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let user = params.user_id.unwrap_or_default();
        let key = cache_key(Self::NAME, &user);
        let fetch = async {
            let path = format!("/users/{user}/profile");
            let response = context.client().get::<Value>(&path, &Query::new()).await?;
            Ok::<_, CanvasError>(response.data)
        };

        let profile = context.cached(key, CacheTtl::Long, fetch).await?;
        info!(%user, "Fetched profile");

        Ok(text_result(format_value(&profile)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetProfileParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}
