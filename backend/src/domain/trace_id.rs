//! Per-request correlation id.
//!
//! The [`Trace`](crate::Trace) middleware assigns every request a UUID and
//! echoes it in the [`TRACE_ID_HEADER`] response header. Errors built while
//! the request is in flight pick it up from task-local storage, so a client
//! can quote the header value when reporting a failed upload or download.
//!
//! Task-locals do not follow work onto other tasks or threads. Media writes
//! run on the blocking pool; wrap such closures with [`TraceId::carry`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use tracing::Span;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// Correlation id of the request being served.
///
/// ```
/// use foodgram::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "6f1c1f0e-5d1e-4a43-9a7e-0d6bb8f2c001".parse().unwrap();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Wrap a closure bound for another thread so it runs under the caller's
    /// trace id and tracing span.
    pub fn carry<F, T>(task: F) -> impl FnOnce() -> T + Send + 'static
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let trace_id = Self::current();
        let span = Span::current();
        move || {
            span.in_scope(|| match trace_id {
                Some(id) => TRACE_ID.sync_scope(id, task),
                None => task(),
            })
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
