//! The request contract between resource bindings and the base client.

use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Where a request's parameters travel.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No parameters.
    None,
    /// Serialized as the JSON request body.
    Body(Value),
    /// Flattened into the URL query string.
    Query(Value),
}

impl Payload {
    /// Returns true when nothing will be sent.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A generic JSON request against the control panel.
///
/// Implementations own transport, credentials and status mapping. Callers get
/// the parsed response body, `Value::Null` for an empty body, or the error the
/// implementation produced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiRequester: Send + Sync {
    /// Issue `method` against `path` (relative to the configured base URL).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or an
    /// unparseable body.
    async fn request(&self, method: Method, path: &str, payload: Payload) -> Result<Value>;
}
