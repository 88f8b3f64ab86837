// self
use crate::obs::{OpOutcome, ProviderOp};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(op: ProviderOp, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"idp_bridge_provider_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}
