//! Provider-layer error types shared by the protocols, transports, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Only session enrichment surfaces these values; validation collapses every failure into
/// `false`.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Profile endpoint answered, but not with a usable identity document.
	#[error(transparent)]
	Profile(#[from] ProfileError),

	/// Session carries no access token, so there is nothing to present to the backend.
	#[error("Session has no access token.")]
	MissingAccessToken,
	/// Caller-supplied deadline elapsed before the request could be sent.
	#[error("Request deadline exceeded before dispatch.")]
	DeadlineExceeded,
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Header value contains bytes HTTP does not allow (e.g., control characters in a token).
	#[error("Header value is invalid.")]
	InvalidHeaderValue(#[from] oauth2::http::header::InvalidHeaderValue),
	/// A provider's built-in default endpoint does not parse.
	#[error("Built-in default {endpoint} URL is invalid.")]
	InvalidDefaultEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label (`validate`, `profile`).
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the caller's deadline.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint label (`validate`, `profile`).
		endpoint: &'static str,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling a provider endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}
}

/// Profile endpoint failures that happen after a response arrived.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// Non-2xx status.
	#[error("Profile endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated body text, when the body was valid UTF-8 and non-empty.
		body_preview: Option<String>,
	},
	/// Body is not the expected JSON object.
	#[error("Profile endpoint returned malformed JSON at `{}`.", .source.path())]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// A complete JSON value was followed by more non-whitespace data.
	#[error("Profile endpoint returned trailing data after the JSON document.")]
	TrailingData {
		/// Parser error pointing at the trailing data.
		#[source]
		source: serde_json::Error,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl ProfileError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds a status failure, keeping a bounded preview of the body.
	pub fn status(status: u16, body: &[u8]) -> Self {
		let body_preview = std::str::from_utf8(body)
			.ok()
			.map(str::trim)
			.filter(|text| !text.is_empty())
			.map(truncate_preview);

		Self::Status { status, body_preview }
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= ProfileError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProfileError::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}
