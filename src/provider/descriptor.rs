//! Provider descriptor data structures shared by all flows.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Consent page the end user is redirected to.
	pub authorization: Url,
	/// Token endpoint used for the authorization-code exchange.
	pub token: Url,
	/// Base URL that API paths are appended to (e.g. `https://api.weibo.com/2`).
	pub api_base: Url,
}

/// Logical API paths used by the identity chain and the upload branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiPaths {
	/// Path resolving the numeric account identifier of the token owner.
	pub account_id: String,
	/// Key carrying the identifier in the account lookup response.
	pub account_id_field: String,
	/// Path returning the public profile.
	pub profile: String,
	/// Query parameter naming the account on the profile path.
	pub profile_id_param: String,
	/// Path that is always dispatched as a multipart upload.
	pub upload: String,
}
impl Default for ApiPaths {
	fn default() -> Self {
		Self {
			account_id: "/account/get_uid".into(),
			account_id_field: "uid".into(),
			profile: "/users/show".into(),
			profile_id_param: "uid".into(),
			upload: "/statuses/upload".into(),
		}
	}
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// API paths used by the broker.
	pub paths: ApiPaths,
}
impl ProviderDescriptor {
	/// Authorization endpoint of the Weibo preset.
	pub const WEIBO_AUTHORIZE_URL: &str = "https://api.weibo.com/oauth2/authorize";
	/// Token endpoint of the Weibo preset.
	pub const WEIBO_TOKEN_URL: &str = "https://api.weibo.com/oauth2/access_token";
	/// API base of the Weibo preset.
	pub const WEIBO_API_BASE: &str = "https://api.weibo.com/2";

	/// Creates a new builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Descriptor pointing at the public Weibo endpoints.
	pub fn weibo() -> Result<Self, ProviderDescriptorError> {
		let parse =
			|raw: &str| Url::parse(raw).map_err(|source| ProviderDescriptorError::InvalidUrl { source });

		Self::builder()
			.authorization_endpoint(parse(Self::WEIBO_AUTHORIZE_URL)?)
			.token_endpoint(parse(Self::WEIBO_TOKEN_URL)?)
			.api_base(parse(Self::WEIBO_API_BASE)?)
			.build()
	}

	/// Builds the absolute URL for an API `path` (`<api_base><path>.json`).
	pub fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
		let base = self.endpoints.api_base.as_str().trim_end_matches('/');

		Url::parse(&format!("{base}{path}.json"))
	}

	/// Returns true when `path` must be dispatched as a multipart upload.
	pub fn is_upload_path(&self, path: &str) -> bool {
		path == self.paths.upload
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn weibo_preset_matches_public_endpoints() {
		let descriptor = ProviderDescriptor::weibo().expect("Weibo preset should validate.");

		assert_eq!(
			descriptor.endpoints.authorization.as_str(),
			ProviderDescriptor::WEIBO_AUTHORIZE_URL
		);
		assert_eq!(descriptor.endpoints.token.as_str(), ProviderDescriptor::WEIBO_TOKEN_URL);
		assert_eq!(descriptor.paths, ApiPaths::default());
	}

	#[test]
	fn api_url_appends_json_suffix() {
		let descriptor = ProviderDescriptor::weibo().expect("Weibo preset should validate.");
		let url = descriptor.api_url("/users/show").expect("Profile path should form a URL.");

		assert_eq!(url.as_str(), "https://api.weibo.com/2/users/show.json");
		assert!(descriptor.is_upload_path("/statuses/upload"));
		assert!(!descriptor.is_upload_path("/statuses/update"));
	}
}
