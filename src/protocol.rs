//! Round-trip protocols shared by every bearer-style provider.
//!
//! [`ProtocolClient`] owns the transport and error mapper and exposes the two request shapes a
//! provider needs: [`ProtocolClient::validate_token`], which reduces a validate-endpoint round
//! trip to a [`ValidationOutcome`], and [`ProtocolClient::fetch_profile`], which decodes a
//! profile document. Concrete providers only decide URLs, headers, and payload types.

pub mod profile;
pub mod validate;

pub use profile::*;
pub use validate::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::{HeaderMap, Method, Request},
};
// self
use crate::{
	_prelude::*,
	context::RequestContext,
	error::ConfigError,
	http::{EndpointKind, ProviderHttpClient, RequestTimeout, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Transport bundle shared by all calls of one provider.
pub struct ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them.
	pub transport_mapper: Arc<M>,
}
impl<C, M> ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client from a transport + mapper pair.
	pub fn new(http_client: impl Into<Arc<C>>, transport_mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), transport_mapper: transport_mapper.into() }
	}

	/// Sends one GET request and returns the raw response, whatever its status.
	///
	/// The context's remaining time travels with the request as a [`RequestTimeout`]; an
	/// already-expired context fails with [`Error::DeadlineExceeded`] before anything is sent.
	pub async fn get(
		&self,
		ctx: &RequestContext,
		endpoint: EndpointKind,
		url: &Url,
		headers: HeaderMap,
	) -> Result<HttpResponse> {
		let remaining = ctx.remaining()?;
		let mut request: HttpRequest = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.body(Vec::new())
			.map_err(ConfigError::from)?;

		request.headers_mut().extend(headers);

		if let Some(timeout) = remaining {
			request.extensions_mut().insert(RequestTimeout(timeout));
		}

		let handle = self.http_client.handle();

		handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(endpoint, err))
	}
}
#[cfg(feature = "reqwest")]
impl Default for ProtocolClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	fn default() -> Self {
		Self::new(ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Clone for ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
		}
	}
}
impl<C, M> Debug for ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ProtocolClient(..)")
	}
}
