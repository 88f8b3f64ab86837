//! Transport primitives for provider round trips.
//!
//! The module exposes [`ProviderHttpClient`] so downstream crates can plug in custom HTTP
//! stacks, and [`TransportErrorMapper`] so their error types fold into the crate taxonomy.
//! Requests carry the caller's remaining deadline as a [`RequestTimeout`] extension; transports
//! must honor it as a per-request timeout.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Abstraction over HTTP transports used by the validation and enrichment protocols.
///
/// Implementations must be `Send + Sync + 'static` so one provider can serve concurrent calls,
/// and the handles they return must own whatever state is required so their request futures
/// remain `Send`. Handles should be cheap to create: the connection pool lives in `Self` and
/// is shared by every call.
///
/// Implementations must apply the [`RequestTimeout`] extension found on a request as its
/// per-request timeout. The caller's deadline reaches the transport only through that
/// extension, so a handle that ignores it runs unbounded until the caller drops the future.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle performing a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle bound to the shared connection pool.
	fn handle(&self) -> Self::Handle;
}

/// Per-request timeout attached to outbound requests as an `http` extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTimeout(pub StdDuration);

/// Endpoint labels used in transport errors and telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointKind {
	/// Token validation endpoint.
	Validate,
	/// Profile (user info) endpoint.
	Profile,
}
impl EndpointKind {
	/// Returns a stable label suitable for errors, span fields, or metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			EndpointKind::Validate => "validate",
			EndpointKind::Profile => "profile",
		}
	}
}
impl Display for EndpointKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, endpoint: EndpointKind, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: EndpointKind,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_timeout() =>
				TransportError::timeout(endpoint.as_str(), *inner).into(),
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				ConfigError::http_client_build(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::network(endpoint.as_str(), *inner).into(),
			other => map_generic_transport_error(endpoint, other),
		}
	}
}

/// Maps the transport-agnostic [`HttpClientError`] variants.
///
/// Custom mappers can delegate here after handling their own `Reqwest(_)` payloads.
pub fn map_generic_transport_error<E>(endpoint: EndpointKind, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint.as_str(), *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::network(endpoint.as_str(), OtherTransportError(message)).into(),
		other => TransportError::network(
			endpoint.as_str(),
			OtherTransportError(format!("Unhandled HTTP client error variant: {other:?}.")),
		)
		.into(),
	}
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct OtherTransportError(String);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Cloning is cheap and every clone shares the same connection pool.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`ProviderHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let timeout = request.extensions().get::<RequestTimeout>().copied();
			let mut request: reqwest::Request = request.try_into().map_err(Box::new)?;

			if let Some(RequestTimeout(timeout)) = timeout {
				*request.timeout_mut() = Some(timeout);
			}

			let response = client.execute(request).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, ThisError)]
	#[error("fake transport failure")]
	struct FakeError;

	#[test]
	fn endpoint_labels_are_stable() {
		assert_eq!(EndpointKind::Validate.to_string(), "validate");
		assert_eq!(EndpointKind::Profile.as_str(), "profile");
	}

	#[test]
	fn generic_mapper_classifies_variants() {
		let network = map_generic_transport_error(
			EndpointKind::Profile,
			HttpClientError::Reqwest(Box::new(FakeError)),
		);

		assert!(matches!(
			network,
			Error::Transport(TransportError::Network { endpoint: "profile", .. })
		));

		let io = map_generic_transport_error::<FakeError>(
			EndpointKind::Validate,
			HttpClientError::Io(std::io::Error::other("reset")),
		);

		assert!(matches!(io, Error::Transport(TransportError::Io(_))));

		let other = map_generic_transport_error::<FakeError>(
			EndpointKind::Validate,
			HttpClientError::Other("boom".into()),
		);

		assert!(matches!(
			other,
			Error::Transport(TransportError::Network { endpoint: "validate", .. })
		));
	}
}
