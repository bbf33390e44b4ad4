//! Error taxonomy shared by the redirect builder, token exchange, resolver, and API client.
//!
//! Only [`ConfigError`] and [`ValidationError`] ever escape a public call as `Err`. Transport
//! and protocol failures are logged where they occur and surface to callers as `Ok(None)`.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or invalid local configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller supplied an incomplete request.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Network, TLS, or non-2xx HTTP failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a body the crate could not interpret.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
}
impl Error {
	/// Returns `true` for failures that interrupt control flow instead of resolving to absence.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Config(_) | Self::Validation(_))
	}
}

/// Configuration failures raised before any network call is attempted.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required host setting is absent or empty.
	#[error("The `{key}` setting is required for {feature}.")]
	MissingSetting {
		/// Setting key that was looked up.
		key: String,
		/// Feature that needed the setting.
		feature: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Trust root bundle could not be loaded.
	#[error("Certificate bundle could not be loaded.")]
	CaBundle {
		/// Underlying read or parse failure.
		#[source]
		source: BoxError,
	},
	/// Trust root bundle contained no certificates.
	#[error("Certificate bundle contains no certificates.")]
	EmptyCaBundle,
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor is invalid.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
}
impl ConfigError {
	/// Builds a [`ConfigError::MissingSetting`] for `key`.
	pub fn missing_setting(key: impl Into<String>, feature: &'static str) -> Self {
		Self::MissingSetting { key: key.into(), feature }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a certificate bundle failure inside [`ConfigError`].
	pub fn ca_bundle(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::CaBundle { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Caller programming mistakes detected before a request is dispatched.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// The upload endpoint was called without a `pic` attachment.
	#[error("Requests to `{path}` require a `pic` attachment.")]
	MissingUploadPayload {
		/// Upload path that was requested.
		path: String,
	},
	/// The API path does not form a valid URL when joined with the API base.
	#[error("API path `{path}` does not form a valid URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, TLS, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider answered with a non-2xx status.
	#[error("Provider responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response bodies that do not match what the flow expects.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Token endpoint responded with JSON that does not describe a session.
	#[error("Token endpoint returned a malformed session.")]
	TokenResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// API endpoint responded with a body that is not JSON.
	#[error("API endpoint returned malformed JSON.")]
	Json(#[from] serde_json::Error),
	/// Decoded value has the wrong shape.
	#[error("Expected {expected} in the provider response.")]
	UnexpectedShape {
		/// Human-readable description of the expected shape.
		expected: &'static str,
	},
	/// Decoded object lacks a required key.
	#[error("Provider response is missing the `{field}` field.")]
	MissingField {
		/// Missing key.
		field: String,
	},
}
