//! Weibo OAuth 2.0 sign-in for async Rust: consent redirects, authorization-code exchange,
//! chained identity resolution, signed API calls, and multipart uploads behind one broker.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod error;
pub mod flows;
pub mod host;
pub mod http;
pub mod multipart;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::Broker, http::ReqwestHttpClient, provider::ProviderDescriptor};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = Broker<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose endpoints all live under `base` (typically a mock server URL).
	///
	/// The layout mirrors the public provider: `/oauth2/authorize`, `/oauth2/access_token`, and
	/// the `/2` API base.
	pub fn descriptor_for(base: &str) -> ProviderDescriptor {
		let parse = |suffix: &str| {
			Url::parse(&format!("{base}{suffix}")).expect("Mock endpoint URL should parse.")
		};

		ProviderDescriptor::builder()
			.authorization_endpoint(parse("/oauth2/authorize"))
			.token_endpoint(parse("/oauth2/access_token"))
			.api_base(parse("/2"))
			.build()
			.expect("Mock provider descriptor should validate.")
	}

	/// Constructs a [`Broker`] backed by the reqwest transport used across integration tests.
	pub fn build_reqwest_test_broker(
		descriptor: ProviderDescriptor,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestBroker {
		Broker::with_http_client(descriptor, client_id, test_reqwest_http_client())
			.with_client_secret(client_secret)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use httpmock as _;
#[cfg(test)] use {tokio as _, tracing_subscriber as _};
