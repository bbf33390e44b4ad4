//! Capabilities the hosting web application supplies to the broker.
//!
//! The broker never reads configuration, issues redirects, or persists sessions on its own.
//! Hosts implement [`SettingsSource`] for their configuration store and [`Redirector`] for their
//! response type; the third capability, fetching, lives in [`crate::http::HttpTransport`].

// self
use crate::{_prelude::*, error::ConfigError};

/// Setting holding the provider-issued application key (`client_id`).
pub const APP_KEY_SETTING: &str = "weibo_app_key";
/// Setting holding the provider-issued application secret (`client_secret`).
pub const APP_SECRET_SETTING: &str = "weibo_app_secret";
/// Feature label reported by configuration errors.
pub const FEATURE: &str = "Weibo OAuth2";

/// Read-only view over the host's configuration.
pub trait SettingsSource {
	/// Returns the raw value stored under `key`, if any.
	fn setting(&self, key: &str) -> Option<String>;

	/// Returns the value stored under `key`, failing when it is absent or empty.
	fn require_setting(&self, key: &str, feature: &'static str) -> Result<String> {
		match self.setting(key) {
			Some(value) if !value.is_empty() => Ok(value),
			_ => Err(ConfigError::missing_setting(key, feature).into()),
		}
	}
}
impl SettingsSource for HashMap<String, String> {
	fn setting(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}
impl SettingsSource for BTreeMap<String, String> {
	fn setting(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}

/// Adapts a lookup closure (environment reader, config crate accessor) into a [`SettingsSource`].
#[derive(Clone, Copy, Debug)]
pub struct SettingsFn<F>(pub F);
impl<F> SettingsSource for SettingsFn<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn setting(&self, key: &str) -> Option<String> {
		(self.0)(key)
	}
}

/// Host primitive that sends the end user's browser to another URL.
pub trait Redirector {
	/// Issues the redirect.
	fn redirect(&self, url: Url);
}
