//! Profile retrieval: one GET to the profile endpoint, decoded into a provider-specific type.

// crates.io
use oauth2::http::HeaderMap;
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{
	_prelude::*,
	context::RequestContext,
	error::ProfileError,
	http::{EndpointKind, ProviderHttpClient, TransportErrorMapper},
	protocol::ProtocolClient,
};

impl<C, M> ProtocolClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches and fully decodes the profile document at `endpoint`.
	///
	/// The query string and fragment of `endpoint` are dropped before sending. Non-2xx
	/// statuses fail with [`ProfileError::Status`]; bodies that do not decode into `T` fail
	/// with [`ProfileError::Decode`] or [`ProfileError::TrailingData`]. Nothing is returned until
	/// the whole body decoded, so callers can apply the result atomically.
	pub async fn fetch_profile<T>(
		&self,
		ctx: &RequestContext,
		endpoint: &Url,
		headers: HeaderMap,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let url = profile_url(endpoint);
		let response = self.get(ctx, EndpointKind::Profile, &url, headers).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(ProfileError::status(status.as_u16(), response.body()).into());
		}

		decode_profile(status.as_u16(), response.body())
	}
}

/// Decodes a profile body, reporting the failing JSON path on error.
///
/// The body must hold exactly one JSON document; anything but whitespace after it fails with
/// [`ProfileError::TrailingData`].
pub fn decode_profile<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ProfileError::Decode { source, status })?;

	deserializer.end().map_err(|source| ProfileError::TrailingData { source, status })?;

	Ok(value)
}

/// Deserializes an optional string field, mapping JSON `null` to an empty string.
///
/// Pair with `#[serde(default)]` so absent keys also decode as empty.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn profile_url(endpoint: &Url) -> Url {
	let mut url = endpoint.clone();

	url.set_query(None);
	url.set_fragment(None);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::protocol::tests::{ScriptedHttpClient, scripted};

	#[derive(Debug, PartialEq, Eq, Deserialize)]
	struct Identity {
		#[serde(default, deserialize_with = "null_as_empty")]
		email: String,
		#[serde(default, deserialize_with = "null_as_empty")]
		username: String,
	}

	fn endpoint() -> Url {
		Url::parse("https://localhost/userinfo?trace=1#frag").expect("Test URL should parse.")
	}

	#[tokio::test]
	async fn fetch_profile_decodes_and_strips_query() {
		let (client, transport) = scripted(ScriptedHttpClient::responding(
			200,
			"{\"email\":\"a@example.com\",\"username\":\"a\",\"extra\":[1,2]}",
		));
		let identity: Identity = client
			.fetch_profile(&RequestContext::background(), &endpoint(), HeaderMap::new())
			.await
			.expect("Profile should decode.");

		assert_eq!(identity, Identity { email: "a@example.com".into(), username: "a".into() });

		let seen = transport.seen.lock().expect("Request log lock should not be poisoned.");

		assert_eq!(
			seen.first().expect("One request should have been sent.").uri(),
			"https://localhost/userinfo"
		);
	}

	#[tokio::test]
	async fn fetch_profile_reports_status_failures() {
		let (client, _) = scripted(ScriptedHttpClient::responding(404, "not found"));
		let err = client
			.fetch_profile::<Identity>(&RequestContext::background(), &endpoint(), HeaderMap::new())
			.await
			.expect_err("404 should fail.");

		assert!(matches!(
			err,
			Error::Profile(ProfileError::Status { status: 404, body_preview: Some(ref body) })
				if body == "not found"
		));
	}

	#[test]
	fn missing_and_null_fields_decode_as_empty() {
		let identity: Identity = decode_profile(200, b"{\"email\":null}")
			.expect("Null and absent fields should be tolerated.");

		assert_eq!(identity, Identity { email: String::new(), username: String::new() });
	}

	#[test]
	fn decode_errors_carry_the_json_path() {
		let err = decode_profile::<Identity>(200, b"{\"email\":42}")
			.expect_err("Numeric email should not decode.");
		let Error::Profile(ProfileError::Decode { source, status }) = err else {
			panic!("Expected a decode failure.");
		};

		assert_eq!(status, 200);
		assert_eq!(source.path().to_string(), "email");
	}

	#[test]
	fn trailing_data_after_the_document_fails() {
		let err = decode_profile::<Identity>(200, b"{\"email\":\"x@y\",\"username\":\"x\"} <html>")
			.expect_err("Trailing markup should not decode.");

		assert!(matches!(err, Error::Profile(ProfileError::TrailingData { status: 200, .. })));

		let identity: Identity = decode_profile(200, b"{\"email\":\"x@y\"}\r\n  ")
			.expect("Trailing whitespace should be tolerated.");

		assert_eq!(identity.email, "x@y");
	}

	#[test]
	fn empty_and_non_object_bodies_fail() {
		assert!(decode_profile::<Identity>(204, b"").is_err());
		assert!(decode_profile::<Identity>(200, b"\"text\"").is_err());
		assert!(decode_profile::<Identity>(200, b"<html>").is_err());
	}
}
