//! Token validation: one GET to the validate endpoint, judged by status code alone.

// crates.io
use oauth2::http::HeaderMap;
// self
use crate::{
	_prelude::*,
	context::RequestContext,
	http::{EndpointKind, ProviderHttpClient, TransportErrorMapper},
	obs,
	protocol::ProtocolClient,
};

/// Result of a validation round trip.
///
/// Callers only ever see [`ValidationOutcome::is_valid`]; the variants exist so logs and
/// metrics can say why a token was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
	/// Validate endpoint answered with a 2xx status.
	Valid,
	/// No access token; nothing was sent.
	MissingToken,
	/// Deadline elapsed before dispatch or while waiting for the response.
	DeadlineExceeded,
	/// Endpoint answered with a non-2xx status.
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// Transport failed (DNS, connect, TLS, IO).
	Unreachable,
	/// The request could not be built (e.g., header-unsafe token bytes).
	InvalidRequest,
}
impl ValidationOutcome {
	/// Collapses the outcome to the boolean the proxy consumes.
	pub const fn is_valid(self) -> bool {
		matches!(self, ValidationOutcome::Valid)
	}

	fn from_error(error: &Error) -> Self {
		match error {
			Error::DeadlineExceeded
			| Error::Transport(crate::error::TransportError::Timeout { .. }) =>
				ValidationOutcome::DeadlineExceeded,
			Error::Transport(_) => ValidationOutcome::Unreachable,
			Error::MissingAccessToken => ValidationOutcome::MissingToken,
			Error::Config(_) | Error::Profile(_) => ValidationOutcome::InvalidRequest,
		}
	}
}
impl Display for ValidationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ValidationOutcome::Valid => f.write_str("token accepted"),
			ValidationOutcome::MissingToken => f.write_str("no access token"),
			ValidationOutcome::DeadlineExceeded => f.write_str("deadline exceeded"),
			ValidationOutcome::Rejected { status } => write!(f, "rejected with HTTP {status}"),
			ValidationOutcome::Unreachable => f.write_str("validate endpoint unreachable"),
			ValidationOutcome::InvalidRequest => f.write_str("request could not be built"),
		}
	}
}

impl<C, M> ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Checks `access_token` against `endpoint`.
	///
	/// An empty token short-circuits to [`ValidationOutcome::MissingToken`] without touching the
	/// network. When `headers` is `None` the token travels as an `access_token` query parameter
	/// instead of an `Authorization` header. The response body is ignored.
	pub async fn validate_token(
		&self,
		ctx: &RequestContext,
		endpoint: &Url,
		access_token: &str,
		headers: Option<HeaderMap>,
	) -> ValidationOutcome {
		if access_token.is_empty() {
			return ValidationOutcome::MissingToken;
		}

		let (url, headers) = match headers {
			Some(headers) if !headers.is_empty() => (endpoint.clone(), headers),
			_ => {
				let mut url = endpoint.clone();

				url.query_pairs_mut().append_pair("access_token", access_token);

				(url, HeaderMap::new())
			},
		};
		let outcome = match self.get(ctx, EndpointKind::Validate, &url, headers).await {
			Ok(response) if response.status().is_success() => ValidationOutcome::Valid,
			Ok(response) => ValidationOutcome::Rejected { status: response.status().as_u16() },
			Err(err) => ValidationOutcome::from_error(&err),
		};

		if !outcome.is_valid() {
			obs::emit_validation_failure(&outcome, &obs::redact_url(&url));
		}

		outcome
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::protocol::tests::{ScriptedHttpClient, scripted};

	fn endpoint() -> Url {
		Url::parse("https://localhost/userinfo").expect("Test URL should parse.")
	}

	fn bearer_headers() -> Option<HeaderMap> {
		let mut headers = HeaderMap::new();

		headers.insert("authorization", "Bearer abc".parse().expect("Header should parse."));

		Some(headers)
	}

	#[tokio::test]
	async fn empty_token_never_reaches_the_network() {
		let (client, transport) = scripted(ScriptedHttpClient::responding(200, ""));
		let outcome =
			client.validate_token(&RequestContext::background(), &endpoint(), "", bearer_headers()).await;

		assert_eq!(outcome, ValidationOutcome::MissingToken);
		assert!(!outcome.is_valid());
		assert_eq!(transport.calls(), 0);
	}

	#[tokio::test]
	async fn any_2xx_status_is_valid() {
		for status in [200, 201, 204, 299] {
			let (client, _) = scripted(ScriptedHttpClient::responding(status, ""));
			let outcome = client
				.validate_token(&RequestContext::background(), &endpoint(), "abc", bearer_headers())
				.await;

			assert_eq!(outcome, ValidationOutcome::Valid, "HTTP {status} should validate.");
		}
	}

	#[tokio::test]
	async fn non_2xx_statuses_are_rejections() {
		for status in [301, 401, 403, 404, 500] {
			let (client, _) = scripted(ScriptedHttpClient::responding(status, "{\"ok\":true}"));
			let outcome = client
				.validate_token(&RequestContext::background(), &endpoint(), "abc", bearer_headers())
				.await;

			assert_eq!(outcome, ValidationOutcome::Rejected { status });
			assert!(!outcome.is_valid());
		}
	}

	#[tokio::test]
	async fn transport_failures_collapse_to_unreachable() {
		let (client, _) = scripted(ScriptedHttpClient::failing());
		let outcome = client
			.validate_token(&RequestContext::background(), &endpoint(), "abc", bearer_headers())
			.await;

		assert_eq!(outcome, ValidationOutcome::Unreachable);
	}

	#[tokio::test]
	async fn expired_context_is_invalid_without_a_call() {
		let (client, transport) = scripted(ScriptedHttpClient::responding(200, ""));
		let ctx = RequestContext::with_deadline(OffsetDateTime::now_utc() - Duration::seconds(1));
		let outcome = client.validate_token(&ctx, &endpoint(), "abc", bearer_headers()).await;

		assert_eq!(outcome, ValidationOutcome::DeadlineExceeded);
		assert_eq!(transport.calls(), 0);
	}

	#[tokio::test]
	async fn missing_headers_fall_back_to_query_parameter() {
		let (client, transport) = scripted(ScriptedHttpClient::responding(200, ""));
		let endpoint = Url::parse("https://localhost/check?aud=web").expect("Test URL should parse.");
		let outcome =
			client.validate_token(&RequestContext::background(), &endpoint, "abc", None).await;

		assert!(outcome.is_valid());

		let seen = transport.seen.lock().expect("Request log lock should not be poisoned.");
		let request = seen.first().expect("One request should have been sent.");

		assert_eq!(request.uri(), "https://localhost/check?aud=web&access_token=abc");
		assert!(request.headers().get("authorization").is_none());
	}
}
