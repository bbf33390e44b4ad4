//! Consent-page redirect construction.

// self
use crate::{_prelude::*, flows::Broker, host::Redirector, http::HttpTransport};

/// Appends `redirect_uri`, `client_id`, and `extra_params` to `authorize_endpoint`.
///
/// A key in `extra_params` that collides with `redirect_uri`, `client_id`, or an earlier extra
/// key replaces that value in place; parameters keep their first-seen order.
pub fn build_authorize_url<I, K, V>(
	authorize_endpoint: &Url,
	client_id: &str,
	redirect_uri: &str,
	extra_params: I,
) -> Url
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	let mut params =
		vec![("redirect_uri".to_owned(), redirect_uri.to_owned()), ("client_id".to_owned(), client_id.to_owned())];

	for (key, value) in extra_params {
		let (key, value) = (key.into(), value.into());

		match params.iter_mut().find(|(existing, _)| *existing == key) {
			Some(slot) => slot.1 = value,
			None => params.push((key, value)),
		}
	}

	let mut url = authorize_endpoint.clone();

	url.query_pairs_mut().extend_pairs(&params);

	url
}

impl<C> Broker<C>
where
	C: ?Sized + HttpTransport,
{
	/// Builds the consent-page URL the end user should be sent to.
	///
	/// Fails only when the broker has no client id.
	pub fn authorize_url<I, K, V>(&self, redirect_uri: &Url, extra_params: I) -> Result<Url>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let client_id = self.require_client_id()?;

		Ok(build_authorize_url(
			&self.descriptor.endpoints.authorization,
			client_id,
			redirect_uri.as_str(),
			extra_params,
		))
	}

	/// Builds the consent-page URL and hands it to the host's redirect primitive.
	pub fn authorize_redirect<R, I, K, V>(
		&self,
		redirector: &R,
		redirect_uri: &Url,
		extra_params: I,
	) -> Result<()>
	where
		R: ?Sized + Redirector,
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		redirector.redirect(self.authorize_url(redirect_uri, extra_params)?);

		Ok(())
	}
}
