//! Authorization header construction shared by bearer-style providers.

// crates.io
use oauth2::http::{
	HeaderMap, HeaderValue,
	header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Token type prefix placed in front of the credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
	/// RFC 6750 `Bearer` prefix.
	#[default]
	Bearer,
	/// Lowercase `token` prefix used by some legacy APIs.
	Token,
}
impl TokenType {
	/// Returns the literal prefix written into the header.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenType::Bearer => "Bearer",
			TokenType::Token => "token",
		}
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Builds the `Authorization` header value: `<type> <token>` followed by ` key=value` for each
/// extra parameter, in key order.
///
/// Providers that need realm or audience hints pass them through `extra`; the generic
/// provider passes an empty map.
pub fn make_authorization_header(
	token_type: TokenType,
	token: &str,
	extra: &BTreeMap<String, String>,
) -> String {
	let mut value = format!("{token_type} {token}");

	for (key, param) in extra {
		value.push(' ');
		value.push_str(key);
		value.push('=');
		value.push_str(param);
	}

	value
}

/// Builds the header set attached to provider requests: a sensitive `Authorization` value plus
/// `Accept: application/json`.
pub fn authorization_headers(
	token_type: TokenType,
	token: &str,
	extra: &BTreeMap<String, String>,
) -> Result<HeaderMap, ConfigError> {
	let mut authorization =
		HeaderValue::from_str(&make_authorization_header(token_type, token, extra))?;

	authorization.set_sensitive(true);

	let mut headers = HeaderMap::with_capacity(2);

	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
	headers.insert(AUTHORIZATION, authorization);

	Ok(headers)
}
