//! Transport primitives for provider calls.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Requests and responses use
//! the `http` types re-exported by `oauth2`, so any client able to execute an
//! [`HttpRequest`] can back the broker. Implementations report network and TLS failures as
//! [`TransportError`]; non-2xx statuses are returned as ordinary responses and classified by the
//! caller.

// crates.io
pub use oauth2::{HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::{Certificate, redirect::Policy};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`HttpTransport::fetch`].
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Asynchronous HTTP fetch capability supplied by the host.
///
/// Implementations are shared across concurrent resolutions behind an `Arc`, so any
/// connection pooling stays internal to the transport.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and resolves to the provider's response, whatever its status.
	fn fetch(&self, request: HttpRequest) -> FetchFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built by this type never follow redirects. A custom trust root bundle can be
/// installed once with [`with_ca_bundle`](Self::with_ca_bundle) and is reused for every request.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that validates provider certificates against `pem_bundle` only.
	pub fn with_ca_bundle(pem_bundle: &[u8]) -> Result<Self> {
		let certificates = Certificate::from_pem_bundle(pem_bundle).map_err(ConfigError::ca_bundle)?;

		if certificates.is_empty() {
			return Err(ConfigError::EmptyCaBundle.into());
		}

		let mut builder =
			ReqwestClient::builder().redirect(Policy::none()).tls_built_in_root_certs(false);

		for certificate in certificates {
			builder = builder.add_root_certificate(certificate);
		}

		Ok(Self(builder.build().map_err(ConfigError::from)?))
	}

	/// Reads a PEM bundle from `path` and delegates to [`with_ca_bundle`](Self::with_ca_bundle).
	pub fn from_ca_bundle_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
		let pem = std::fs::read(path).map_err(ConfigError::ca_bundle)?;

		Self::with_ca_bundle(&pem)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn fetch(&self, request: HttpRequest) -> FetchFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(TransportError::from)?)
				.await
				.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(TransportError::from)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejects_garbage_certificate_bundles() {
		let err = ReqwestHttpClient::with_ca_bundle(b"-----BEGIN CERTIFICATE-----\nnot base64\n")
			.expect_err("Malformed bundles should be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::CaBundle { .. } | ConfigError::EmptyCaBundle)
		));
	}

	#[test]
	fn missing_bundle_file_is_a_configuration_error() {
		let err = ReqwestHttpClient::from_ca_bundle_file("/nonexistent/weibo-ca-certificates.crt")
			.expect_err("Missing bundle files should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::CaBundle { .. })));
	}
}
