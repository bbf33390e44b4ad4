//! High-level flow orchestrators for Weibo sign-in.
//!
//! [`Broker`] holds the transport, provider descriptor, and client credentials. The consent
//! redirect, the authorization-code exchange, and the chained identity resolution are
//! implemented as methods in the submodules; [`Broker::api`] hands out an [`ApiClient`] sharing
//! the same transport for arbitrary signed calls.

pub mod authorize;
pub mod identity;
pub mod token_exchange;

pub use authorize::*;

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{
	_prelude::*,
	api::ApiClient,
	error::ConfigError,
	host::{self, SettingsSource},
	http::HttpTransport,
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates sign-in flows against a single provider descriptor.
///
/// Brokers keep no per-user state, so one instance can serve any number of concurrent
/// resolutions; every resolution performs its own full chain.
pub struct Broker<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Provider descriptor that defines endpoints and API paths.
	pub descriptor: ProviderDescriptor,
	/// Application key sent as `client_id`.
	pub client_id: ClientId,
	/// Application secret sent as `client_secret` during the code exchange.
	pub client_secret: Option<ClientSecret>,
}
impl<C> Broker<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			client_id: ClientId::new(client_id.into()),
			client_secret: None,
		}
	}

	/// Creates a broker whose credentials come from the host's settings.
	///
	/// The application key is required right away; the secret is only required once a code
	/// exchange runs.
	pub fn from_settings<S>(
		settings: &S,
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self>
	where
		S: ?Sized + SettingsSource,
	{
		let client_id = settings.require_setting(host::APP_KEY_SETTING, host::FEATURE)?;
		let broker = Self::with_http_client(descriptor, client_id, http_client);

		Ok(match settings.setting(host::APP_SECRET_SETTING) {
			Some(secret) if !secret.is_empty() => broker.with_client_secret(secret),
			_ => broker,
		})
	}

	/// Sets or replaces the client secret used by the code exchange.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(ClientSecret::new(secret.into()));

		self
	}

	/// Returns an API client sharing this broker's transport and descriptor.
	pub fn api(&self) -> ApiClient<C> {
		ApiClient::new(self.http_client.clone(), self.descriptor.clone())
	}

	pub(crate) fn require_client_id(&self) -> Result<&str> {
		let client_id = self.client_id.as_str();

		if client_id.is_empty() {
			Err(ConfigError::missing_setting(host::APP_KEY_SETTING, host::FEATURE).into())
		} else {
			Ok(client_id)
		}
	}

	pub(crate) fn require_client_secret(&self) -> Result<&str> {
		match &self.client_secret {
			Some(secret) if !secret.secret().is_empty() => Ok(secret.secret().as_str()),
			_ => Err(ConfigError::missing_setting(host::APP_SECRET_SETTING, host::FEATURE).into()),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a new broker that provisions its own reqwest-backed transport.
	///
	/// Use [`ReqwestHttpClient::with_ca_bundle`] with [`Broker::with_http_client`] instead when
	/// the provider's certificate chain must be validated against a bundled trust root.
	pub fn new(descriptor: ProviderDescriptor, client_id: impl Into<String>) -> Self {
		Self::with_http_client(descriptor, client_id, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Broker<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			client_id: self.client_id.clone(),
			client_secret: self.client_secret.clone(),
		}
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id.as_str())
			.field("client_secret_set", &self.client_secret.is_some())
			.finish()
	}
}
