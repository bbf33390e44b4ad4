//! Authorization-code exchange against the provider's token endpoint.
//!
//! Credentials are validated and the request is built before anything is dispatched, so a
//! missing secret surfaces as a [`ConfigError`](crate::error::ConfigError). Once the request is
//! on the wire, every failure (transport, non-2xx status, malformed body) is logged and the
//! exchange resolves to `Ok(None)`.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::OAuthSession,
	error::{ConfigError, TransportError},
	flows::Broker,
	http::{HttpRequest, HttpTransport},
	obs::{self, FlowKind},
};

const GRANT_TYPE: &str = "authorization_code";

impl<C> Broker<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges a one-time authorization `code` for an [`OAuthSession`].
	///
	/// Returns `Err` only for missing credentials; provider failures resolve to `Ok(None)`.
	pub async fn exchange_code(&self, redirect_uri: &Url, code: &str) -> Result<Option<OAuthSession>> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let request = self.token_request(redirect_uri, code)?;

		obs::observe(KIND, "exchange_code", self.fetch_session(KIND, request)).await
	}

	/// Builds the URL-encoded token request after validating the client credentials.
	pub(crate) fn token_request(&self, redirect_uri: &Url, code: &str) -> Result<HttpRequest> {
		let client_id = self.require_client_id()?;
		let client_secret = self.require_client_secret()?;
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", GRANT_TYPE)
			.append_pair("code", code)
			.append_pair("redirect_uri", redirect_uri.as_str())
			.append_pair("client_id", client_id)
			.append_pair("client_secret", client_secret)
			.finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.descriptor.endpoints.token.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	/// Dispatches a prepared token request, absorbing every provider-side failure.
	pub(crate) async fn fetch_session(
		&self,
		kind: FlowKind,
		request: HttpRequest,
	) -> Result<Option<OAuthSession>> {
		let url = self.descriptor.endpoints.token.as_str();

		match self.try_fetch_session(request).await {
			Ok(session) => Ok(Some(session)),
			Err(e) if e.is_fatal() => Err(e),
			Err(e) => {
				obs::absorb(kind, "token_exchange", url, &e);

				Ok(None)
			},
		}
	}

	async fn try_fetch_session(&self, request: HttpRequest) -> Result<OAuthSession> {
		let response = self.http_client.fetch(request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(TransportError::Status { status: status.as_u16() }.into());
		}

		Ok(OAuthSession::from_slice(response.body())?)
	}
}
