//! Observability for provider stages.
//!
//! # Feature Flags
//!
//! - `tracing` (default): every stage runs inside a `weibo_oauth2.flow` span carrying `flow` and
//!   `stage` fields, and every absorbed failure emits a warning event with the request URL.
//! - `metrics`: `weibo_oauth2_flow_total{flow,outcome}` counts attempts, successes, and failures;
//!   `weibo_oauth2_absorbed_total{flow,stage}` counts failures converted into absent results.
//!
//! With both features disabled every helper compiles down to a passthrough.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization-code exchange on its own.
	TokenExchange,
	/// Full identity chain (exchange, account lookup, profile fetch).
	Identity,
	/// Generic signed API call.
	Api,
}
impl FlowKind {
	/// Label used in span fields and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::TokenExchange => "token_exchange",
			FlowKind::Identity => "identity",
			FlowKind::Api => "api",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded per flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Flow entered.
	Attempt,
	/// Flow produced a value.
	Success,
	/// Flow resolved to absence or failed fatally.
	Failure,
}
impl FlowOutcome {
	/// Label used in metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Absence counts as a failure; only a produced value is a success.
	pub fn of<T>(result: &Result<Option<T>>) -> Self {
		match result {
			Ok(Some(_)) => FlowOutcome::Success,
			_ => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs one stage of `kind` inside its span, recording the attempt and the outcome.
pub async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, stage_fut: Fut) -> Result<Option<T>>
where
	Fut: Future<Output = Result<Option<T>>>,
{
	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = in_flow_span(kind, stage, stage_fut).await;

	record_flow_outcome(kind, FlowOutcome::of(&result));

	result
}

/// Reports a non-fatal failure that is about to be turned into an absent result.
pub fn absorb(kind: FlowKind, stage: &'static str, url: &str, error: &Error) {
	log_absorbed(kind, stage, url, error);
	record_absorbed(kind, stage);
}

/// In-memory `tracing` capture for tests asserting on absorbed-failure warnings.
#[cfg(all(test, feature = "tracing"))]
pub(crate) mod capture {
	// std
	use std::{
		io::{Result as IoResult, Write},
		sync::Mutex,
	};
	// crates.io
	use tracing::subscriber::DefaultGuard;
	use tracing_subscriber::util::SubscriberInitExt;
	// self
	use crate::_prelude::*;

	#[derive(Clone, Default)]
	pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);
	impl CapturedLogs {
		pub(crate) fn contents(&self) -> String {
			String::from_utf8_lossy(&self.0.lock().expect("Log buffer should not be poisoned."))
				.into_owned()
		}
	}
	impl Write for CapturedLogs {
		fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
			self.0.lock().expect("Log buffer should not be poisoned.").extend_from_slice(buf);

			Ok(buf.len())
		}

		fn flush(&mut self) -> IoResult<()> {
			Ok(())
		}
	}

	/// Routes this thread's events into a buffer until the guard drops.
	pub(crate) fn capture_logs() -> (CapturedLogs, DefaultGuard) {
		let logs = CapturedLogs::default();
		let writer = logs.clone();
		let guard = tracing_subscriber::fmt()
			.with_writer(move || writer.clone())
			.with_ansi(false)
			.without_time()
			.finish()
			.set_default();

		(logs, guard)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ProtocolError, TransportError};

	#[test]
	fn outcome_of_treats_absence_as_failure() {
		assert_eq!(FlowOutcome::of(&Ok(Some(1))), FlowOutcome::Success);
		assert_eq!(FlowOutcome::of::<u8>(&Ok(None)), FlowOutcome::Failure);
		assert_eq!(
			FlowOutcome::of::<u8>(&Err(TransportError::Status { status: 500 }.into())),
			FlowOutcome::Failure
		);
	}

	#[tokio::test]
	async fn observe_passes_stage_results_through() {
		let value = observe(FlowKind::Api, "call", async { Ok(Some(42)) }).await;

		assert_eq!(value.expect("Stage should succeed."), Some(42));

		let absent = observe::<u8, _>(FlowKind::Identity, "profile_fetch", async { Ok(None) }).await;

		assert!(matches!(absent, Ok(None)));
	}

	#[test]
	fn absorb_accepts_any_error() {
		absorb(
			FlowKind::Identity,
			"account_lookup",
			"https://api.weibo.com/2/account/get_uid.json",
			&ProtocolError::MissingField { field: "uid".into() }.into(),
		);
	}
}
