//! Caller-supplied deadline threaded through every outbound provider call.

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Per-call context carrying an optional absolute deadline.
///
/// The proxy core builds one context per incoming request and passes it to
/// [`Provider::validate_session`](crate::provider::Provider::validate_session) or
/// [`Provider::enrich_session`](crate::provider::Provider::enrich_session). Dropping the
/// returned future cancels the in-flight request; the deadline bounds it when the caller keeps
/// polling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
	/// Instant after which the call must not wait for a response.
	pub deadline: Option<OffsetDateTime>,
}
impl RequestContext {
	/// Context without a deadline; the transport's own timeouts apply.
	pub const fn background() -> Self {
		Self { deadline: None }
	}

	/// Context that expires at the provided instant.
	pub const fn with_deadline(deadline: OffsetDateTime) -> Self {
		Self { deadline: Some(deadline) }
	}

	/// Context that expires `timeout` from now.
	pub fn with_timeout(timeout: Duration) -> Self {
		Self::with_deadline(OffsetDateTime::now_utc() + timeout)
	}

	/// Returns the time left before the deadline, measured from `now`.
	///
	/// `Ok(None)` means no deadline applies; `Err` means it already passed.
	pub fn remaining_at(
		&self,
		now: OffsetDateTime,
	) -> Result<Option<StdDuration>, DeadlineExceeded> {
		let Some(deadline) = self.deadline else {
			return Ok(None);
		};
		let left = deadline - now;

		if !left.is_positive() {
			return Err(DeadlineExceeded);
		}

		Ok(Some(StdDuration::try_from(left).map_err(|_| DeadlineExceeded)?))
	}

	/// Same as [`remaining_at`](Self::remaining_at) using the current UTC time.
	pub fn remaining(&self) -> Result<Option<StdDuration>, DeadlineExceeded> {
		self.remaining_at(OffsetDateTime::now_utc())
	}
}

/// Marker returned when a context's deadline has already elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Request deadline exceeded.")]
pub struct DeadlineExceeded;
impl From<DeadlineExceeded> for Error {
	fn from(_: DeadlineExceeded) -> Self {
		Error::DeadlineExceeded
	}
}
