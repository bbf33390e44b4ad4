//! Field projection from provider profiles into normalized identity records.

// crates.io
use serde::ser::{SerializeMap, Serializer};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{OAuthSession, TokenSecret},
};

/// Profile fields every identity record carries.
pub const DEFAULT_FIELDS: [&str; 5] = ["id", "name", "profile_image_url", "location", "url"];
/// Reserved key holding the access token in serialized records.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Reserved key holding the token lifetime in serialized records.
pub const SESSION_EXPIRES_KEY: &str = "session_expires";

/// Set of profile fields to project, always including [`DEFAULT_FIELDS`].
///
/// Duplicates collapse and iteration order is lexicographic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<String>);
impl FieldSet {
	/// Creates the default field set.
	pub fn new() -> Self {
		Self(DEFAULT_FIELDS.iter().map(|field| (*field).to_owned()).collect())
	}

	/// Creates the default field set united with `extra`.
	pub fn with_extra<I, S>(extra: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut fields = Self::new();

		fields.extend(extra);

		fields
	}

	/// Adds more fields to the set.
	pub fn extend<I, S>(&mut self, extra: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.0.extend(extra.into_iter().map(Into::into));
	}

	/// Returns true when `field` is part of the set.
	pub fn contains(&self, field: &str) -> bool {
		self.0.contains(field)
	}

	/// Iterates over the fields in a stable order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Number of fields in the set.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always false; the default fields are never removed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Default for FieldSet {
	fn default() -> Self {
		Self::new()
	}
}

/// Identity handed back to the caller once the whole chain succeeded.
///
/// Every requested field is present; fields the provider did not supply map to `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityResult {
	fields: BTreeMap<String, Option<Value>>,
	access_token: TokenSecret,
	session_expires: Option<u64>,
}
impl IdentityResult {
	/// Projects `fields` out of `profile` and attaches the session credentials.
	///
	/// Requested names equal to [`ACCESS_TOKEN_KEY`] or [`SESSION_EXPIRES_KEY`] are ignored so
	/// the session values always win.
	pub fn project(fields: &FieldSet, profile: &Map<String, Value>, session: &OAuthSession) -> Self {
		let fields = fields
			.iter()
			.filter(|field| !is_reserved(field))
			.map(|field| (field.to_owned(), profile.get(field).cloned()))
			.collect();

		Self {
			fields,
			access_token: session.access_token.clone(),
			session_expires: session.expires_in,
		}
	}

	/// Value of a projected field; `None` when it was absent or not requested.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field).and_then(Option::as_ref)
	}

	/// Returns true when `field` was requested, whether or not the provider supplied it.
	pub fn contains_field(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Iterates over every requested field in a stable order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
		self.fields.iter().map(|(field, value)| (field.as_str(), value.as_ref()))
	}

	/// Access token obtained by the exchange.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Token lifetime in seconds as reported by the provider.
	pub fn session_expires(&self) -> Option<u64> {
		self.session_expires
	}

	/// Flattens the record into a JSON object, rendering absent values as `null`.
	pub fn to_json(&self) -> Value {
		let mut object: Map<String, Value> = self
			.fields
			.iter()
			.map(|(field, value)| (field.clone(), value.clone().unwrap_or(Value::Null)))
			.collect();

		object.insert(ACCESS_TOKEN_KEY.into(), Value::String(self.access_token.expose().into()));
		object.insert(
			SESSION_EXPIRES_KEY.into(),
			self.session_expires.map_or(Value::Null, Value::from),
		);

		Value::Object(object)
	}
}
impl Serialize for IdentityResult {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;

		for (field, value) in &self.fields {
			map.serialize_entry(field, value)?;
		}

		map.serialize_entry(ACCESS_TOKEN_KEY, self.access_token.expose())?;
		map.serialize_entry(SESSION_EXPIRES_KEY, &self.session_expires)?;
		map.end()
	}
}

fn is_reserved(field: &str) -> bool {
	field == ACCESS_TOKEN_KEY || field == SESSION_EXPIRES_KEY
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn session() -> OAuthSession {
		OAuthSession::from_slice(br#"{"access_token":"T1","expires_in":3600}"#)
			.expect("Session fixture should decode.")
	}

	fn profile(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			other => panic!("Profile fixture must be an object, got {other}."),
		}
	}

	#[test]
	fn field_set_unions_extras_with_defaults() {
		let fields = FieldSet::with_extra(["gender", "name", "gender"]);

		assert_eq!(fields.len(), DEFAULT_FIELDS.len() + 1);
		assert!(fields.contains("gender"));
		assert_eq!(
			fields.iter().collect::<Vec<_>>(),
			["gender", "id", "location", "name", "profile_image_url", "url"]
		);
	}

	#[test]
	fn projection_marks_missing_fields_absent() {
		let identity = IdentityResult::project(
			&FieldSet::new(),
			&profile(json!({"id": 42, "name": "Alice", "location": "X", "followers_count": 7})),
			&session(),
		);

		assert_eq!(identity.get("id"), Some(&json!(42)));
		assert_eq!(identity.get("name"), Some(&json!("Alice")));
		assert_eq!(identity.get("location"), Some(&json!("X")));
		assert!(identity.contains_field("profile_image_url"));
		assert_eq!(identity.get("profile_image_url"), None);
		assert_eq!(identity.get("url"), None);
		assert!(!identity.contains_field("followers_count"));
		assert_eq!(identity.access_token().expose(), "T1");
		assert_eq!(identity.session_expires(), Some(3600));
		assert_eq!(
			identity.to_json(),
			json!({
				"id": 42,
				"name": "Alice",
				"location": "X",
				"profile_image_url": null,
				"url": null,
				"access_token": "T1",
				"session_expires": 3600,
			})
		);
	}

	#[test]
	fn reserved_names_never_shadow_session_values() {
		let identity = IdentityResult::project(
			&FieldSet::with_extra([ACCESS_TOKEN_KEY, SESSION_EXPIRES_KEY]),
			&profile(json!({"access_token": "leaked", "session_expires": 1})),
			&session(),
		);

		assert!(!identity.contains_field(ACCESS_TOKEN_KEY));

		let encoded = serde_json::to_value(&identity).expect("Identity should serialize.");

		assert_eq!(encoded["access_token"], json!("T1"));
		assert_eq!(encoded["session_expires"], json!(3600));
		assert_eq!(encoded, identity.to_json());
	}
}
