//! Optional observability helpers for provider calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every call inside an `idp_bridge.provider` span with the `provider`
//!   (display name) and `op` fields, and to emit `warn` events when a call fails.
//! - Enable `metrics` to increment the `idp_bridge_provider_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderOp {
	/// Token validation against the validate endpoint.
	ValidateSession,
	/// Identity enrichment from the profile endpoint.
	EnrichSession,
}
impl ProviderOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderOp::ValidateSession => "validate_session",
			ProviderOp::EnrichSession => "enrich_session",
		}
	}
}
impl Display for ProviderOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Token accepted or session enriched.
	Success,
	/// Token rejected, backend unreachable, or enrichment failed.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Renders a URL for logs with any `access_token` query value replaced by `<redacted>`.
pub fn redact_url(url: &Url) -> String {
	if !url.query_pairs().any(|(key, _)| key == "access_token") {
		return url.to_string();
	}

	let pairs = url
		.query_pairs()
		.map(|(key, value)| {
			let value = if key == "access_token" { "<redacted>".into() } else { value };

			(key.into_owned(), value.into_owned())
		})
		.collect::<Vec<_>>();
	let mut redacted = url.clone();

	redacted.query_pairs_mut().clear().extend_pairs(pairs);

	redacted.to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(ProviderOp::ValidateSession.to_string(), "validate_session");
		assert_eq!(ProviderOp::EnrichSession.as_str(), "enrich_session");
		assert_eq!(OpOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn redact_url_hides_access_token_values() {
		let url = Url::parse("https://api.example.com/check?access_token=abc123&aud=web")
			.expect("Test URL should parse.");
		let redacted = redact_url(&url);

		assert!(!redacted.contains("abc123"));
		assert!(redacted.contains("access_token=%3Credacted%3E"));
		assert!(redacted.contains("aud=web"));
	}

	#[test]
	fn redact_url_leaves_plain_urls_untouched() {
		let url = Url::parse("https://localhost/userinfo").expect("Test URL should parse.");

		assert_eq!(redact_url(&url), "https://localhost/userinfo");
	}
}
