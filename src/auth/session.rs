//! Token endpoint session model and the redacted secret wrapper it carries.

// self
use crate::{_prelude::*, auth::AccountId, error::ProtocolError};

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the provider handed back an empty token.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Session decoded from a successful authorization-code exchange.
///
/// Sessions are consumed by the identity chain right away and never persisted by the crate.
#[derive(Clone, Debug, Deserialize)]
pub struct OAuthSession {
	/// Credential authenticating subsequent API calls.
	pub access_token: TokenSecret,
	/// Lifetime of the token in seconds, when the provider reports one.
	#[serde(default)]
	pub expires_in: Option<u64>,
	/// Account identifier some providers echo in the token response.
	#[serde(default)]
	pub uid: Option<AccountId>,
	/// Instant the session was decoded.
	#[serde(skip_deserializing, default = "OffsetDateTime::now_utc")]
	pub issued_at: OffsetDateTime,
}
impl OAuthSession {
	/// Decodes a token endpoint body.
	pub fn from_slice(body: &[u8]) -> Result<Self, ProtocolError> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let session: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProtocolError::TokenResponse { source })?;

		if session.access_token.is_empty() {
			return Err(ProtocolError::MissingField { field: "access_token".into() });
		}

		Ok(session)
	}

	/// Instant the access token stops being valid, when the lifetime is known.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let secs = i64::try_from(self.expires_in?).ok()?;

		self.issued_at.checked_add(Duration::seconds(secs))
	}
}
