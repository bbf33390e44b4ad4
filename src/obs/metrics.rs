// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `weibo_oauth2_flow_total` when the `metrics` feature is enabled.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"weibo_oauth2_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `weibo_oauth2_absorbed_total` when the `metrics` feature is enabled.
pub fn record_absorbed(kind: FlowKind, stage: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("weibo_oauth2_absorbed_total", "flow" => kind.as_str(), "stage" => stage)
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, stage);
	}
}
