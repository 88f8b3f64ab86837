//! Operator-facing provider configuration.

// crates.io
use serde::{Deserializer, de::Error as _};
// self
use crate::_prelude::*;

/// Operator-supplied provider configuration; every field is optional.
///
/// Unset (or empty) fields fall back to the provider's built-in defaults. URL fields are parsed
/// while deserializing, and an empty string counts as unset. Whitespace is kept verbatim in
/// `name` and `scope`; whitespace-only URL strings count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// Informational display name.
	#[serde(deserialize_with = "empty_as_none")]
	pub name: Option<String>,
	/// Login (authorization) endpoint.
	#[serde(deserialize_with = "url_or_none")]
	pub login_url: Option<Url>,
	/// Token redemption endpoint.
	#[serde(deserialize_with = "url_or_none")]
	pub redeem_url: Option<Url>,
	/// Profile (user info) endpoint used by enrichment.
	#[serde(deserialize_with = "url_or_none")]
	pub profile_url: Option<Url>,
	/// Token validation endpoint.
	#[serde(deserialize_with = "url_or_none")]
	pub validate_url: Option<Url>,
	/// Requested scope, forwarded verbatim.
	#[serde(deserialize_with = "empty_as_none")]
	pub scope: Option<String>,
}
impl ProviderConfig {
	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the login endpoint.
	pub fn with_login_url(mut self, url: Url) -> Self {
		self.login_url = Some(url);

		self
	}

	/// Sets the redeem endpoint.
	pub fn with_redeem_url(mut self, url: Url) -> Self {
		self.redeem_url = Some(url);

		self
	}

	/// Sets the profile endpoint.
	pub fn with_profile_url(mut self, url: Url) -> Self {
		self.profile_url = Some(url);

		self
	}

	/// Sets the validate endpoint.
	pub fn with_validate_url(mut self, url: Url) -> Self {
		self.validate_url = Some(url);

		self
	}

	/// Sets the scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

fn url_or_none<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
	D: Deserializer<'de>,
{
	empty_as_none(deserializer)?
		.filter(|raw| !raw.trim().is_empty())
		.map(|raw| Url::parse(raw.trim()).map_err(|err| D::Error::custom(format!("{raw}: {err}"))))
		.transpose()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_document_is_all_unset() {
		let config: ProviderConfig =
			serde_json::from_str("{}").expect("Empty configuration should deserialize.");

		assert_eq!(config, ProviderConfig::default());
	}

	#[test]
	fn empty_strings_count_as_unset() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{"name":"","login_url":"","validate_url":"  ","scope":"","profile_url":null}"#,
		)
		.expect("Empty strings should deserialize as unset.");

		assert_eq!(config, ProviderConfig::default());
	}

	#[test]
	fn urls_are_parsed_while_deserializing() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{"validate_url":"https://api.example.com/","scope":"profile"}"#,
		)
		.expect("Valid overrides should deserialize.");

		assert_eq!(
			config.validate_url.as_ref().map(Url::as_str),
			Some("https://api.example.com/")
		);
		assert_eq!(config.scope.as_deref(), Some("profile"));
		assert!(config.login_url.is_none());

		let err = serde_json::from_str::<ProviderConfig>(r#"{"profile_url":"not a url"}"#)
			.expect_err("Relative garbage should be rejected by the parser.");

		assert!(err.to_string().contains("not a url"));
	}

	#[test]
	fn whitespace_scope_matches_the_builder() {
		let from_json: ProviderConfig = serde_json::from_str(r#"{"scope":" ","name":" "}"#)
			.expect("Whitespace strings should deserialize.");

		assert_eq!(from_json, ProviderConfig::default().with_scope(" ").with_name(" "));
	}
}
