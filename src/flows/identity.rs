//! Chained identity resolution: token exchange, account lookup, profile fetch, projection.
//!
//! Each stage depends on the previous stage's output, so the calls run strictly in order and
//! the first absent result ends the chain with `Ok(None)`. Partial identities are never
//! returned.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiRequest},
	auth::{AccountId, FieldSet, IdentityResult, OAuthSession},
	error::ProtocolError,
	flows::Broker,
	http::{HttpRequest, HttpTransport},
	obs::{self, FlowKind},
};

const KIND: FlowKind = FlowKind::Identity;

impl<C> Broker<C>
where
	C: ?Sized + HttpTransport,
{
	/// Resolves the identity behind an authorization `code`.
	///
	/// The default profile fields (`id`, `name`, `profile_image_url`, `location`, `url`) are
	/// united with `extra_fields`. Missing credentials fail with `Err` before any request is
	/// made; a failure at any provider stage yields `Ok(None)` and is only visible in the logs.
	pub async fn get_authenticated_user<I, S>(
		&self,
		redirect_uri: &Url,
		code: &str,
		extra_fields: I,
	) -> Result<Option<IdentityResult>>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let fields = FieldSet::with_extra(extra_fields);
		let token_request = self.token_request(redirect_uri, code)?;

		obs::observe(KIND, "get_authenticated_user", self.resolve_identity(&fields, token_request))
			.await
	}

	async fn resolve_identity(
		&self,
		fields: &FieldSet,
		token_request: HttpRequest,
	) -> Result<Option<IdentityResult>> {
		let Some(session) = self.fetch_session(KIND, token_request).await? else {
			return Ok(None);
		};
		let api = self.api();
		let Some(account) = lookup_account(&api, &session).await? else {
			return Ok(None);
		};
		let Some(profile) = fetch_profile(&api, &session, &account).await? else {
			return Ok(None);
		};

		Ok(Some(IdentityResult::project(fields, &profile, &session)))
	}
}

async fn lookup_account<C>(api: &ApiClient<C>, session: &OAuthSession) -> Result<Option<AccountId>>
where
	C: ?Sized + HttpTransport,
{
	const STAGE: &str = "account_lookup";

	let paths = &api.descriptor().paths;
	let request = ApiRequest::new(paths.account_id.as_str()).access_token(session.access_token.clone());
	let Some((body, url)) = api.call_as(KIND, STAGE, request).await? else {
		return Ok(None);
	};
	let account = match &body {
		Value::Object(map) => map
			.get(&paths.account_id_field)
			.and_then(AccountId::from_value)
			.ok_or_else(|| ProtocolError::MissingField { field: paths.account_id_field.clone() }),
		_ => Err(ProtocolError::UnexpectedShape { expected: "an object" }),
	};

	match account {
		Ok(account) => Ok(Some(account)),
		Err(e) => {
			obs::absorb(KIND, STAGE, &url, &e.into());

			Ok(None)
		},
	}
}

async fn fetch_profile<C>(
	api: &ApiClient<C>,
	session: &OAuthSession,
	account: &AccountId,
) -> Result<Option<Map<String, Value>>>
where
	C: ?Sized + HttpTransport,
{
	const STAGE: &str = "profile_fetch";

	let paths = &api.descriptor().paths;
	let request = ApiRequest::new(paths.profile.as_str())
		.access_token(session.access_token.clone())
		.param(paths.profile_id_param.as_str(), account.as_param());
	let Some((body, url)) = api.call_as(KIND, STAGE, request).await? else {
		return Ok(None);
	};

	match body {
		Value::Object(profile) if !profile.is_empty() => Ok(Some(profile)),
		_ => {
			obs::absorb(
				KIND,
				STAGE,
				&url,
				&ProtocolError::UnexpectedShape { expected: "a non-empty profile object" }.into(),
			);

			Ok(None)
		},
	}
}
