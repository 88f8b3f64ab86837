// self
use crate::{_prelude::*, obs::ProviderOp};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span wrapping one provider operation.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the operation and the provider's display name.
	pub fn new(op: ProviderOp, provider: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("idp_bridge.provider", op = op.as_str(), provider);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, provider);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `warn` event for a token that did not validate.
pub fn emit_validation_failure(reason: &dyn Display, endpoint: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%reason, endpoint, "token validation failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (reason, endpoint);
	}
}

/// Emits a `warn` event for a failed enrichment.
pub fn emit_enrich_failure(error: &Error, endpoint: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, endpoint, "session enrichment failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (error, endpoint);
	}
}
