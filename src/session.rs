//! Caller-owned session record read and written by providers.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Session state owned by the proxy's session store.
///
/// Providers only read [`access_token`](Self::access_token) and, during enrichment, overwrite
/// [`email`](Self::email) and [`user`](Self::user). Everything else is carried for the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
	/// Bearer credential presented to the backend; empty when the session has none.
	pub access_token: TokenSecret,
	/// OpenID Connect ID token, when the login produced one.
	pub id_token: Option<TokenSecret>,
	/// Refresh token, when the login produced one.
	pub refresh_token: Option<TokenSecret>,
	/// Creation instant recorded by the store.
	pub created_at: Option<OffsetDateTime>,
	/// Instant at which the access token stops being usable.
	pub expires_on: Option<OffsetDateTime>,
	/// Email address populated by enrichment.
	pub email: String,
	/// Username populated by enrichment.
	pub user: String,
	/// Display-oriented username some backends return alongside `user`.
	pub preferred_username: String,
}
impl SessionState {
	/// Creates a session holding only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(access_token), ..Default::default() }
	}

	/// Sets the creation instant.
	pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.created_at = Some(created_at);

		self
	}

	/// Sets the expiry instant.
	pub fn with_expires_on(mut self, expires_on: OffsetDateTime) -> Self {
		self.expires_on = Some(expires_on);

		self
	}

	/// Returns true when the session carries a non-empty access token.
	pub fn has_access_token(&self) -> bool {
		!self.access_token.is_empty()
	}

	/// Returns true once `now` reaches the recorded expiry. Sessions without expiry never expire.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_on.is_some_and(|expires_on| expires_on <= now)
	}

	/// Time elapsed since creation, if the creation instant is known.
	pub fn age_at(&self, now: OffsetDateTime) -> Option<Duration> {
		self.created_at.map(|created_at| now - created_at)
	}

	/// Replaces the identity attributes. Values are overwritten, never merged.
	pub(crate) fn set_identity(&mut self, email: String, user: String) {
		self.email = email;
		self.user = user;
	}
}
