//! Shared state handed to every tool.

use std::future::Future;

use serde_json::Value;

use super::ToolError;
use crate::canvas::{CanvasClient, CanvasError, ClientBuildError};
use crate::core::cache::{CacheTtl, ResponseCache};
use crate::core::config::Config;

/// The Canvas client and response cache, shared by all tool calls.
#[derive(Debug, Clone)]
pub struct ToolContext {
    client: CanvasClient,
    cache: ResponseCache,
}

impl ToolContext {
    pub fn new(client: CanvasClient, cache: ResponseCache) -> Self {
        Self { client, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientBuildError> {
        Ok(Self::new(
            CanvasClient::new(&config.canvas)?,
            ResponseCache::new(&config.cache),
        ))
    }

    pub fn client(&self) -> &CanvasClient {
        &self.client
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Return the cached value for `key`, or await `fetch` and cache its
    /// result for `ttl`. On a hit `fetch` is dropped unpolled, so no request
    /// is sent. Failures are never cached.
    pub async fn cached<Fut>(&self, key: String, ttl: CacheTtl, fetch: Fut) -> Result<Value, ToolError>
    where
        Fut: Future<Output = Result<Value, CanvasError>>,
    {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let value = fetch.await?;
        self.cache.insert(key, value.clone(), Some(ttl.duration()));
        Ok(value)
    }
}
