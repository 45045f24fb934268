//! Error reports carried across the service boundary.
//!
//! An [`ErrorReport`] holds a message template, its positional parameters,
//! an optional underlying cause and, for workflow failures, the response
//! status the boundary should use. The formatted message is computed on
//! first read and cached for the lifetime of the value.
//!
//! These reports are transport agnostic. Inbound adapters read
//! [`ErrorReport::effective_status`] and [`ErrorReport::message`] to build
//! a response; causes are kept for diagnostics and never formatted into the
//! message.

mod template;

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::TrackingKey;

/// Status reported when a workflow error has no usable explicit status, and
/// for every lifecycle error.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Shared handle to an underlying failure.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Which failure family a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Process or startup failure with no response-status semantics.
    Lifecycle,
    /// Request-handling failure carrying an intended response status.
    Workflow {
        /// Raw status as supplied; see [`ErrorReport::effective_status`].
        status: Option<i32>,
    },
}

/// One positional template parameter.
///
/// Parameters start out as arbitrary displayable values. Before a report
/// crosses a durable boundary they are flattened to [`Param::Text`], after
/// which the original values are gone.
#[derive(Clone)]
pub enum Param {
    /// Absent value; renders as `null`.
    Null,
    /// Plain text, including every flattened parameter.
    Text(String),
    /// Arbitrary in-process value rendered through [`fmt::Display`].
    Value(Arc<dyn fmt::Display + Send + Sync>),
}

impl Param {
    /// Wrap an arbitrary displayable value.
    pub fn value<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::Value(Arc::new(value))
    }

    /// Text form used for substitution; `Null` renders as `null`.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed("null"),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Value(value) => Cow::Owned(value.to_string()),
        }
    }

    /// Whether the parameter is already in its durable text form.
    pub const fn is_flattened(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    fn flatten(&mut self) {
        if !self.is_flattened() {
            *self = Self::Text(self.render().into_owned());
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(&value.to_string()).finish(),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<&TrackingKey> for Param {
    fn from(value: &TrackingKey) -> Self {
        Self::Text(value.id().to_owned())
    }
}

impl<T> From<Option<T>> for Param
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! display_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Self::value(value)
                }
            }
        )*
    };
}

display_param!(bool, i32, i64, u16, u32, u64, usize);

/// Failure value carried from lower layers to the boundary.
///
/// # Examples
/// ```
/// use tracking_backend::domain::ErrorReport;
///
/// let error = ErrorReport::workflow_with_status(404, "no record for {}").with_param("build-42");
/// assert_eq!(error.message(), "no record for build-42");
/// assert_eq!(error.effective_status(), 404);
///
/// let fallback = ErrorReport::workflow("failed: {0} after {1} attempts")
///     .with_param("timeout")
///     .with_param(3_u32);
/// assert_eq!(fallback.message(), "failed: timeout after 3 attempts");
/// assert_eq!(fallback.effective_status(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorReport {
    kind: ErrorKind,
    template: String,
    params: Vec<Param>,
    cause: Option<Cause>,
    formatted: OnceLock<String>,
}

impl ErrorReport {
    fn with_kind(kind: ErrorKind, template: impl Into<String>) -> Self {
        Self {
            kind,
            template: template.into(),
            params: Vec::new(),
            cause: None,
            formatted: OnceLock::new(),
        }
    }

    /// Start a lifecycle report.
    pub fn lifecycle(template: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Lifecycle, template)
    }

    /// Start a workflow report with no explicit status.
    pub fn workflow(template: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Workflow { status: None }, template)
    }

    /// Start a workflow report with an explicit status.
    pub fn workflow_with_status(status: i32, template: impl Into<String>) -> Self {
        Self::with_kind(
            ErrorKind::Workflow {
                status: Some(status),
            },
            template,
        )
    }

    /// Attach a response status. A lifecycle report becomes a workflow
    /// report, since only workflow failures carry status semantics.
    #[must_use]
    pub fn with_status(mut self, status: i32) -> Self {
        self.kind = ErrorKind::Workflow {
            status: Some(status),
        };
        self
    }

    /// Append one positional parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self.formatted = OnceLock::new();
        self
    }

    /// Append positional parameters in order.
    #[must_use]
    pub fn with_params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self.formatted = OnceLock::new();
        self
    }

    /// Attach the underlying failure.
    #[must_use]
    pub fn with_cause<E>(self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.with_shared_cause(Arc::new(cause))
    }

    /// Attach an already shared underlying failure.
    #[must_use]
    pub fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Failure family and raw status.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether this is a lifecycle report.
    pub const fn is_lifecycle(&self) -> bool {
        matches!(self.kind, ErrorKind::Lifecycle)
    }

    /// Whether this is a workflow report.
    pub const fn is_workflow(&self) -> bool {
        matches!(self.kind, ErrorKind::Workflow { .. })
    }

    /// Unformatted message template.
    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    /// Positional parameters in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Underlying failure, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Raw status as supplied; always `None` for lifecycle reports.
    pub const fn status(&self) -> Option<i32> {
        match self.kind {
            ErrorKind::Lifecycle => None,
            ErrorKind::Workflow { status } => status,
        }
    }

    /// Status the boundary should respond with.
    ///
    /// Workflow reports use their explicit status when it is positive and
    /// fits an HTTP status; everything else maps to
    /// [`DEFAULT_ERROR_STATUS`]. That includes positive statuses above
    /// `u16::MAX`, which no response can carry.
    pub fn effective_status(&self) -> u16 {
        self.status()
            .filter(|status| *status > 0)
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or(DEFAULT_ERROR_STATUS)
    }

    /// Formatted message, computed once and cached.
    ///
    /// Formatting never fails: when neither placeholder convention can be
    /// applied, the literal template is returned.
    pub fn message(&self) -> &str {
        self.formatted
            .get_or_init(|| template::format_message(&self.template, &self.params))
    }

    /// Display chain of the cause and its sources, joined by `": "`.
    pub fn cause_chain(&self) -> Option<String> {
        let cause = self.cause.as_deref()?;
        let mut rendered = cause.to_string();
        let mut source = cause.source();
        while let Some(inner) = source {
            rendered.push_str(": ");
            rendered.push_str(&inner.to_string());
            source = inner.source();
        }
        Some(rendered)
    }

    /// Replace every parameter by its text form. Irreversible.
    pub fn flatten_params(&mut self) {
        for param in &mut self.params {
            param.flatten();
        }
    }

    /// Consume the report and return it with flattened parameters.
    #[must_use]
    pub fn into_durable(mut self) -> Self {
        self.flatten_params();
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ErrorReport {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Cause restored from a serialised report; only its text survives.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecodedCause(String);

impl fmt::Display for DecodedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DecodedCause {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ErrorKindDto {
    Lifecycle,
    Workflow,
}

/// Durable shape. Parameters and cause are always text here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorReportDto {
    kind: ErrorKindDto,
    #[serde(default)]
    status: Option<i32>,
    template: String,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cause: Option<String>,
}

impl From<&ErrorReport> for ErrorReportDto {
    fn from(value: &ErrorReport) -> Self {
        let kind = match value.kind {
            ErrorKind::Lifecycle => ErrorKindDto::Lifecycle,
            ErrorKind::Workflow { .. } => ErrorKindDto::Workflow,
        };
        Self {
            kind,
            status: value.status(),
            template: value.template.clone(),
            params: value
                .params
                .iter()
                .map(|param| param.render().into_owned())
                .collect(),
            message: Some(value.message().to_owned()),
            cause: value.cause_chain(),
        }
    }
}

impl From<ErrorReportDto> for ErrorReport {
    fn from(value: ErrorReportDto) -> Self {
        let ErrorReportDto {
            kind: dto_kind,
            status,
            template,
            params,
            message,
            cause,
        } = value;
        let kind = match dto_kind {
            ErrorKindDto::Lifecycle => ErrorKind::Lifecycle,
            ErrorKindDto::Workflow => ErrorKind::Workflow { status },
        };
        Self {
            kind,
            template,
            params: params.into_iter().map(Param::Text).collect(),
            cause: cause.map(|text| Arc::new(DecodedCause(text)) as Cause),
            formatted: message.map_or_else(OnceLock::new, OnceLock::from),
        }
    }
}

impl Serialize for ErrorReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ErrorReportDto::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ErrorReportDto::deserialize(deserializer).map(Self::from)
    }
}
