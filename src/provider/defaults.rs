//! Default-merge policy: built-in provider defaults plus field-by-field operator overrides.

// self
use crate::{_prelude::*, error::ConfigError, provider::ProviderConfig};

/// Endpoint set resolved for a provider. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
	/// Login (authorization) endpoint.
	pub login_url: Url,
	/// Token redemption endpoint.
	pub redeem_url: Url,
	/// Profile (user info) endpoint.
	pub profile_url: Url,
	/// Token validation endpoint.
	pub validate_url: Url,
	/// Requested scope, forwarded verbatim.
	pub scope: String,
}

/// Fully populated provider configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderData {
	/// Informational display name.
	pub name: String,
	/// Resolved endpoints + scope.
	pub endpoints: EndpointSet,
}
impl From<&ProviderData> for ProviderConfig {
	fn from(data: &ProviderData) -> Self {
		ProviderConfig {
			name: Some(data.name.clone()),
			login_url: Some(data.endpoints.login_url.clone()),
			redeem_url: Some(data.endpoints.redeem_url.clone()),
			profile_url: Some(data.endpoints.profile_url.clone()),
			validate_url: Some(data.endpoints.validate_url.clone()),
			scope: Some(data.endpoints.scope.clone()),
		}
	}
}

/// Built-in defaults shipped by a concrete provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderDefaults {
	/// Display name used when the operator sets none.
	pub name: &'static str,
	/// Default login endpoint.
	pub login_url: &'static str,
	/// Default redeem endpoint.
	pub redeem_url: &'static str,
	/// Default profile endpoint.
	pub profile_url: &'static str,
	/// Default validate endpoint.
	pub validate_url: &'static str,
	/// Default scope.
	pub scope: &'static str,
}
impl ProviderDefaults {
	/// Parses the default constants into [`ProviderData`].
	pub fn resolve(&self) -> Result<ProviderData, ConfigError> {
		Ok(ProviderData {
			name: self.name.to_owned(),
			endpoints: EndpointSet {
				login_url: parse_default("login", self.login_url)?,
				redeem_url: parse_default("redeem", self.redeem_url)?,
				profile_url: parse_default("profile", self.profile_url)?,
				validate_url: parse_default("validate", self.validate_url)?,
				scope: self.scope.to_owned(),
			},
		})
	}
}

/// Resolves `config` against `defaults`, field by field.
///
/// A field comes from `config` iff it is set and non-empty; otherwise the default wins. The
/// function is pure and idempotent: feeding its output back in as configuration returns the
/// same value.
pub fn merge_defaults(config: &ProviderConfig, defaults: ProviderData) -> ProviderData {
	let ProviderData { name, endpoints } = defaults;

	ProviderData {
		name: non_empty(config.name.as_ref()).unwrap_or(name),
		endpoints: EndpointSet {
			login_url: config.login_url.clone().unwrap_or(endpoints.login_url),
			redeem_url: config.redeem_url.clone().unwrap_or(endpoints.redeem_url),
			profile_url: config.profile_url.clone().unwrap_or(endpoints.profile_url),
			validate_url: config.validate_url.clone().unwrap_or(endpoints.validate_url),
			scope: non_empty(config.scope.as_ref()).unwrap_or(endpoints.scope),
		},
	}
}

fn non_empty(value: Option<&String>) -> Option<String> {
	value.filter(|value| !value.is_empty()).cloned()
}

fn parse_default(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidDefaultEndpoint { endpoint, source })
}
