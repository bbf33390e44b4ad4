// self
use crate::{_prelude::*, obs::FlowKind};

/// Awaits `fut` inside a `weibo_oauth2.flow` span; a plain `.await` without `tracing`.
pub async fn in_flow_span<Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Fut::Output
where
	Fut: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		fut.instrument(tracing::info_span!("weibo_oauth2.flow", flow = kind.as_str(), stage)).await
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage);

		fut.await
	}
}

/// Emits the warning event for an absorbed failure.
pub fn log_absorbed(kind: FlowKind, stage: &'static str, url: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			flow = kind.as_str(),
			stage,
			url,
			error = %error,
			"Provider call failed; resolving to absence."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage, url, error);
	}
}
