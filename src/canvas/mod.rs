//! Canvas LMS REST API client.
//!
//! [`CanvasClient`] wraps `reqwest` with the behaviour every tool relies on:
//! bearer authentication, 429/5xx retry with backoff, Link-header
//! pagination, and classification of failures into [`CanvasError`].

pub mod client;
pub mod error;
pub mod links;
pub mod pager;
pub mod query;
pub mod retry;

pub use client::{
    CanvasClient, CanvasResponse, ClientConfig, DEFAULT_API_VERSION, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_MS, DOWNLOAD_TIMEOUT, MAX_DOWNLOAD_BYTES, RequestOptions,
};
pub use error::{CanvasError, ClientBuildError, NO_RESPONSE_MESSAGE, Result};
pub use links::{PageLinks, parse_link_header};
pub use query::Query;
pub use retry::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper};
