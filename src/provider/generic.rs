//! Generic bearer provider: validates and enriches sessions against any backend that accepts
//! `Authorization: Bearer <token>` and serves a flat `{ "email", "username" }` profile.

// self
use crate::{
	_prelude::*,
	auth::{self, TokenType},
	context::RequestContext,
	error::ConfigError,
	http::{ProviderHttpClient, TransportErrorMapper},
	obs::{self, OpOutcome, OpSpan, ProviderOp},
	protocol::{self, ProtocolClient},
	provider::{Provider, ProviderConfig, ProviderData, ProviderDefaults, ProviderFuture},
	session::SessionState,
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Built-in defaults of the generic bearer provider.
pub const GENERIC_BEARER_DEFAULTS: ProviderDefaults = ProviderDefaults {
	name: "Generic",
	login_url: "https://localhost/login/oauth/authorize",
	redeem_url: "https://localhost/login/oauth/access_token",
	profile_url: "https://localhost/userinfo",
	validate_url: "https://localhost/userinfo",
	scope: "user:email",
};

/// Profile document served by generic bearer backends. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BearerProfile {
	/// Email address; empty when absent or `null`.
	#[serde(default, deserialize_with = "protocol::null_as_empty")]
	pub email: String,
	/// Username; empty when absent or `null`.
	#[serde(default, deserialize_with = "protocol::null_as_empty")]
	pub username: String,
}

#[cfg(feature = "reqwest")]
/// Generic provider specialized for the crate's default reqwest transport stack.
pub type ReqwestGenericBearerProvider =
	GenericBearerProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Backend-agnostic bearer provider.
///
/// Holds the resolved [`ProviderData`] and a shared [`ProtocolClient`]; nothing else, so
/// concurrent calls never contend.
pub struct GenericBearerProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	data: ProviderData,
	client: ProtocolClient<C, M>,
}
impl<C, M> GenericBearerProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self, ConfigError> {
		let defaults = GENERIC_BEARER_DEFAULTS.resolve()?;
		let data = super::merge_defaults(&config, defaults);

		Ok(Self { data, client: ProtocolClient::new(http_client, mapper) })
	}

	/// Shared transport bundle.
	pub fn client(&self) -> &ProtocolClient<C, M> {
		&self.client
	}

	async fn validate(&self, ctx: &RequestContext, session: &SessionState) -> bool {
		let token = session.access_token.expose();
		// Unbuildable headers must not fall through to the query-parameter form.
		let headers = match auth::authorization_headers(TokenType::Bearer, token, &BTreeMap::new())
		{
			Ok(headers) => headers,
			Err(err) => {
				obs::emit_validation_failure(&err, self.data.endpoints.validate_url.as_str());

				return false;
			},
		};

		self.client
			.validate_token(ctx, &self.data.endpoints.validate_url, token, Some(headers))
			.await
			.is_valid()
	}

	async fn enrich(&self, ctx: &RequestContext, session: &mut SessionState) -> Result<()> {
		if !session.has_access_token() {
			return Err(Error::MissingAccessToken);
		}

		let headers = auth::authorization_headers(
			TokenType::Bearer,
			session.access_token.expose(),
			&BTreeMap::new(),
		)?;
		let profile: BearerProfile =
			self.client.fetch_profile(ctx, &self.data.endpoints.profile_url, headers).await?;

		session.set_identity(profile.email, profile.username);

		Ok(())
	}
}
#[cfg(feature = "reqwest")]
impl GenericBearerProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a fresh reqwest connection pool.
	pub fn new(config: ProviderConfig) -> Result<Self, ConfigError> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Provider for GenericBearerProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn data(&self) -> &ProviderData {
		&self.data
	}

	fn validate_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a SessionState,
	) -> ProviderFuture<'a, bool> {
		const OP: ProviderOp = ProviderOp::ValidateSession;

		Box::pin(async move {
			let span = OpSpan::new(OP, &self.data.name);

			obs::record_op_outcome(OP, OpOutcome::Attempt);

			let valid = span.instrument(self.validate(ctx, session)).await;

			obs::record_op_outcome(OP, if valid { OpOutcome::Success } else { OpOutcome::Failure });

			valid
		})
	}

	fn enrich_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a mut SessionState,
	) -> ProviderFuture<'a, Result<()>> {
		const OP: ProviderOp = ProviderOp::EnrichSession;

		Box::pin(async move {
			let span = OpSpan::new(OP, &self.data.name);

			obs::record_op_outcome(OP, OpOutcome::Attempt);

			let result = span.instrument(self.enrich(ctx, session)).await;

			match &result {
				Ok(()) => obs::record_op_outcome(OP, OpOutcome::Success),
				Err(err) => {
					obs::record_op_outcome(OP, OpOutcome::Failure);
					obs::emit_enrich_failure(err, self.data.endpoints.profile_url.as_str());
				},
			}

			result
		})
	}
}
impl<C, M> Debug for GenericBearerProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GenericBearerProvider").field("data", &self.data).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::protocol::tests::{GenericMapper, ScriptedHttpClient};

	type ScriptedProvider = GenericBearerProvider<ScriptedHttpClient, GenericMapper>;

	fn provider(transport: ScriptedHttpClient) -> (ScriptedProvider, Arc<ScriptedHttpClient>) {
		let transport = Arc::new(transport);
		let provider = GenericBearerProvider::with_http_client(
			ProviderConfig::default(),
			transport.clone(),
			GenericMapper,
		)
		.expect("Generic provider should build with defaults.");

		(provider, transport)
	}

	#[test]
	fn defaults_resolve_to_documented_endpoints() {
		let (provider, _) = provider(ScriptedHttpClient::failing());
		let data = provider.data();

		assert_eq!(data.name, "Generic");
		assert_eq!(data.endpoints.login_url.as_str(), "https://localhost/login/oauth/authorize");
		assert_eq!(data.endpoints.redeem_url.as_str(), "https://localhost/login/oauth/access_token");
		assert_eq!(data.endpoints.profile_url.as_str(), "https://localhost/userinfo");
		assert_eq!(data.endpoints.validate_url.as_str(), "https://localhost/userinfo");
		assert_eq!(data.endpoints.scope, "user:email");
	}

	#[tokio::test]
	async fn validate_sends_bearer_header() {
		let (provider, transport) = provider(ScriptedHttpClient::responding(200, ""));
		let session = SessionState::new("abc");

		assert!(provider.validate_session(&RequestContext::background(), &session).await);

		let seen = transport.seen.lock().expect("Request log lock should not be poisoned.");
		let request = seen.first().expect("One request should have been sent.");

		assert_eq!(
			request.headers().get("authorization").map(|value| value.as_bytes()),
			Some(&b"Bearer abc"[..])
		);
		assert_eq!(request.uri(), "https://localhost/userinfo");
	}

	#[tokio::test]
	async fn header_unsafe_tokens_are_invalid_without_a_call() {
		let (provider, transport) = provider(ScriptedHttpClient::responding(200, ""));
		let session = SessionState::new("abc\r\ninjected");

		assert!(!provider.validate_session(&RequestContext::background(), &session).await);
		assert_eq!(transport.calls(), 0);
	}

	#[tokio::test]
	async fn enrich_without_token_fails_without_a_call() {
		let (provider, transport) = provider(ScriptedHttpClient::responding(200, "{}"));
		let mut session = SessionState::default();

		session.email = "kept@example.com".into();

		let err = provider
			.enrich_session(&RequestContext::background(), &mut session)
			.await
			.expect_err("Sessions without tokens cannot be enriched.");

		assert!(matches!(err, Error::MissingAccessToken));
		assert_eq!(session.email, "kept@example.com");
		assert_eq!(transport.calls(), 0);
	}

	#[tokio::test]
	async fn enrich_transport_failure_leaves_session_untouched() {
		let (provider, _) = provider(ScriptedHttpClient::failing());
		let mut session = SessionState::new("abc");

		session.email = "kept@example.com".into();
		session.user = "kept".into();

		let before = session.clone();
		let err = provider
			.enrich_session(&RequestContext::background(), &mut session)
			.await
			.expect_err("Transport failures must surface.");

		assert!(matches!(err, Error::Transport(_)));
		assert_eq!(session, before);
	}
}
