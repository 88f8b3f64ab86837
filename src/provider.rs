//! Provider contract (behavior) and provider configuration (data).
//!
//! `config` holds the operator-facing [`ProviderConfig`]; `defaults` turns it into a fully
//! populated [`ProviderData`] by filling every unset field from a provider's built-in
//! [`ProviderDefaults`]. `generic` is the backend-agnostic bearer implementation of the
//! [`Provider`] trait.

pub mod config;
pub mod defaults;
pub mod generic;

pub use config::*;
pub use defaults::*;
pub use generic::*;

// self
use crate::{_prelude::*, context::RequestContext, session::SessionState};

/// Boxed future returned by [`Provider`] methods so the trait stays object safe.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Contract every identity backend implements for the proxy core.
///
/// Implementors are `Send + Sync` and never mutate themselves after construction, so a single
/// instance behind `Arc<dyn Provider>` may serve any number of concurrent calls. Calls that
/// mutate the same [`SessionState`] must be serialized by the caller.
pub trait Provider: Send + Sync {
	/// Resolved configuration (display name + endpoint set).
	fn data(&self) -> &ProviderData;

	/// Returns true when the backend still accepts the session's access token.
	///
	/// Every failure (empty token, rejection, unreachable backend, elapsed deadline) yields
	/// `false`; no error is surfaced.
	fn validate_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a SessionState,
	) -> ProviderFuture<'a, bool>;

	/// Populates identity attributes on `session` from the backend's profile endpoint.
	///
	/// On error the session is left exactly as it was.
	fn enrich_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a mut SessionState,
	) -> ProviderFuture<'a, Result<()>>;
}
