//! Opaque account identifiers resolved during the identity chain.

// self
use crate::_prelude::*;

/// Account identifier returned by the provider, numeric or textual.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
	/// Integer identifier.
	Numeric(i64),
	/// String identifier.
	Text(String),
}
impl AccountId {
	/// Extracts an identifier from a decoded JSON value.
	///
	/// Returns `None` for empty strings and any non-integer, non-string value.
	pub fn from_value(value: &serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::Number(number) => number.as_i64().map(Self::Numeric),
			serde_json::Value::String(text) if !text.is_empty() => Some(Self::Text(text.clone())),
			_ => None,
		}
	}

	/// Renders the identifier as a query parameter value.
	pub fn as_param(&self) -> String {
		self.to_string()
	}
}
impl Display for AccountId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Numeric(id) => write!(f, "{id}"),
			Self::Text(id) => f.write_str(id),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn accepts_numbers_and_non_empty_strings() {
		assert_eq!(AccountId::from_value(&json!(1_904_178_193)), Some(AccountId::Numeric(1_904_178_193)));
		assert_eq!(AccountId::from_value(&json!("42")), Some(AccountId::Text("42".into())));
		assert_eq!(AccountId::from_value(&json!("")), None);
		assert_eq!(AccountId::from_value(&json!(4.2)), None);
		assert_eq!(AccountId::from_value(&json!({"uid": 1})), None);
	}

	#[test]
	fn renders_query_parameter_values() {
		assert_eq!(AccountId::Numeric(42).as_param(), "42");
		assert_eq!(AccountId::Text("abc".into()).as_param(), "abc");
	}
}
