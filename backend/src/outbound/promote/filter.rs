//! Request filters applied to every promote-service call.
//!
//! A filter decorates the outgoing request before it is sent, typically to
//! attach authentication or tracing headers.

use std::fmt;

use reqwest::RequestBuilder;

/// Hook decorating outgoing promote-service requests.
#[cfg_attr(test, mockall::automock)]
pub trait RequestFilter: Send + Sync {
    /// Return `request` with any extra headers or settings applied.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Filter that leaves requests untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRequestFilter;

impl RequestFilter for NoopRequestFilter {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Filter attaching a static bearer token.
#[derive(Clone)]
pub struct BearerTokenFilter {
    token: String,
}

impl BearerTokenFilter {
    /// Build a filter sending `token` in the `Authorization` header.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenFilter")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RequestFilter for BearerTokenFilter {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}
