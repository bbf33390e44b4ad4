// self
use crate::{
	_prelude::*,
	provider::{ApiPaths, ProviderDescriptor, ProviderEndpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required for the consent redirect.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is required for the code exchange.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// API base is required for every API call.
	#[error("Missing API base URL.")]
	MissingApiBase,
	/// A preset or caller-supplied URL failed to parse.
	#[error("Descriptor contains an invalid URL.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// API paths must be rooted.
	#[error("The {name} path must start with `/`: {path}.")]
	InvalidPath {
		/// Which path failed validation.
		name: &'static str,
		/// Offending path.
		path: String,
	},
	/// Response and parameter keys must not be empty.
	#[error("The {name} key must not be empty.")]
	EmptyKey {
		/// Which key failed validation.
		name: &'static str,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// Consent page endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for the code exchange.
	pub token_endpoint: Option<Url>,
	/// Base URL for API paths.
	pub api_base: Option<Url>,
	/// API paths used by the broker.
	pub paths: ApiPaths,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder with default API paths.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the API paths.
	pub fn paths(mut self, paths: ApiPaths) -> Self {
		self.paths = paths;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let api_base = self.api_base.ok_or(ProviderDescriptorError::MissingApiBase)?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints { authorization, token, api_base },
			paths: self.paths,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("api_base", &self.endpoints.api_base)?;
		validate_path("account_id", &self.paths.account_id)?;
		validate_path("profile", &self.paths.profile)?;
		validate_path("upload", &self.paths.upload)?;
		validate_key("account_id_field", &self.paths.account_id_field)?;
		validate_key("profile_id_param", &self.paths.profile_id_param)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_path(name: &'static str, path: &str) -> Result<(), ProviderDescriptorError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InvalidPath { name, path: path.to_owned() })
	}
}

fn validate_key(name: &'static str, key: &str) -> Result<(), ProviderDescriptorError> {
	if key.is_empty() { Err(ProviderDescriptorError::EmptyKey { name }) } else { Ok(()) }
}
