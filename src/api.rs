//! Signed API calls against `<api_base><path>.json`.
//!
//! [`ApiClient::prepare`] validates and builds the request synchronously, so caller mistakes
//! such as an upload without a `pic` attachment fail before anything touches the network.
//! [`ApiClient::call`] then dispatches and absorbs transport and protocol failures into
//! `Ok(None)` after logging them; [`ApiClient::try_call`] surfaces them instead.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use serde_json::Value;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, ProtocolError, TransportError, ValidationError},
	http::{HttpRequest, HttpTransport},
	multipart::MultipartForm,
	obs::{self, FlowKind},
	provider::ProviderDescriptor,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const UPLOAD_FIELD: &str = "pic";
const ACCESS_TOKEN_PARAM: &str = "access_token";
const REDACTED: &str = "<redacted>";

/// HTTP shape chosen for an [`ApiRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMethod {
	/// Query-string-only request.
	Get,
	/// URL-encoded body request.
	Post,
	/// `multipart/form-data` upload.
	MultipartPost,
}
impl ApiMethod {
	/// Returns the HTTP method used on the wire.
	pub fn http_method(self) -> Method {
		match self {
			ApiMethod::Get => Method::GET,
			ApiMethod::Post | ApiMethod::MultipartPost => Method::POST,
		}
	}
}

/// File attached to an upload request under the `pic` field.
#[derive(Clone)]
pub struct UploadFile {
	/// Filename reported to the provider.
	pub filename: String,
	/// Raw file bytes.
	pub content: Vec<u8>,
	/// Content type; inferred from `filename` when `None`.
	pub mime_type: Option<String>,
}
impl UploadFile {
	/// Creates an attachment whose content type is inferred from `filename`.
	pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
		Self { filename: filename.into(), content: content.into(), mime_type: None }
	}

	/// Declares the content type explicitly.
	pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
		self.mime_type = Some(mime_type.into());

		self
	}
}
impl Debug for UploadFile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UploadFile")
			.field("filename", &self.filename)
			.field("mime_type", &self.mime_type)
			.field("content_len", &self.content.len())
			.finish()
	}
}

/// One API call, built and discarded per request.
#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
	/// Logical path without host or `.json` suffix (e.g. `/users/show`).
	pub path: String,
	/// Token authenticating the call; without it no query parameters are sent.
	pub access_token: Option<TokenSecret>,
	/// Extra parameters in insertion order.
	pub params: Vec<(String, String)>,
	/// Form body; switches the call to POST when present.
	pub post_args: Option<Vec<(String, String)>>,
	/// Attachment required by the upload path.
	pub pic: Option<UploadFile>,
}
impl ApiRequest {
	/// Creates a request for `path`.
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into(), ..Default::default() }
	}

	/// Authenticates the request.
	pub fn access_token(mut self, token: TokenSecret) -> Self {
		self.access_token = Some(token);

		self
	}

	/// Appends an extra parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Sets the form body, turning the call into a POST.
	pub fn post_args<I, K, V>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.post_args = Some(args.into_iter().map(|(k, v)| (k.into(), v.into())).collect());

		self
	}

	/// Attaches the upload payload.
	pub fn pic(mut self, file: UploadFile) -> Self {
		self.pic = Some(file);

		self
	}
}

/// Fully built request, ready for the transport.
#[derive(Debug)]
pub struct PreparedRequest {
	/// HTTP shape chosen for the call.
	pub method: ApiMethod,
	/// Target URL including the query string.
	pub url: Url,
	request: HttpRequest,
}
impl PreparedRequest {
	/// Raw HTTP request handed to the transport.
	pub fn http_request(&self) -> &HttpRequest {
		&self.request
	}
}

/// Client issuing signed calls against the provider's API.
pub struct ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	descriptor: ProviderDescriptor,
}
impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client sharing `http_client` with other components.
	pub fn new(http_client: impl Into<Arc<C>>, descriptor: ProviderDescriptor) -> Self {
		Self { http_client: http_client.into(), descriptor }
	}

	/// Descriptor the client builds URLs from.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Validates `request` and builds the HTTP request without dispatching it.
	pub fn prepare(&self, request: ApiRequest) -> Result<PreparedRequest> {
		let ApiRequest { path, access_token, params, post_args, pic } = request;
		let mut url = self
			.descriptor
			.api_url(&path)
			.map_err(|source| ValidationError::InvalidPath { path: path.clone(), source })?;

		if self.descriptor.is_upload_path(&path) {
			let pic = pic.ok_or(ValidationError::MissingUploadPayload { path })?;

			if let Some(token) = &access_token {
				url.query_pairs_mut().append_pair(ACCESS_TOKEN_PARAM, token.expose());
			}

			let mut form = MultipartForm::new();

			for (key, value) in params.into_iter().chain(post_args.into_iter().flatten()) {
				form.add_field(key, value);
			}

			form.add_file(UPLOAD_FIELD, pic.filename, pic.content, pic.mime_type);

			let encoded = form.encode();

			return build(ApiMethod::MultipartPost, url, Some((encoded.content_type(), encoded.body)));
		}

		if let Some(token) = &access_token {
			url.query_pairs_mut()
				.append_pair(ACCESS_TOKEN_PARAM, token.expose())
				.extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		match post_args {
			Some(args) => {
				let body = form_urlencoded::Serializer::new(String::new())
					.extend_pairs(args.iter().map(|(k, v)| (k.as_str(), v.as_str())))
					.finish();

				build(ApiMethod::Post, url, Some((FORM_CONTENT_TYPE.to_owned(), body.into_bytes())))
			},
			None => build(ApiMethod::Get, url, None),
		}
	}

	/// Issues `request`, logging and absorbing transport and protocol failures.
	///
	/// Only validation and configuration errors are returned as `Err`; they are raised before
	/// any network call.
	pub async fn call(&self, request: ApiRequest) -> Result<Option<Value>> {
		Ok(self.call_as(FlowKind::Api, "call", request).await?.map(|(value, _)| value))
	}

	/// Issues `request` and returns the decoded body or the typed failure.
	pub async fn try_call(&self, request: ApiRequest) -> Result<Value> {
		let prepared = self.prepare(request)?;

		self.send(prepared).await
	}

	/// Absorbing call that also hands back the redacted request URL for follow-up logging.
	pub(crate) async fn call_as(
		&self,
		kind: FlowKind,
		stage: &'static str,
		request: ApiRequest,
	) -> Result<Option<(Value, String)>> {
		let prepared = self.prepare(request)?;
		let url = redacted_url(&prepared.url);

		obs::observe(kind, stage, async {
			match self.send(prepared).await {
				Ok(value) => Ok(Some((value, url))),
				Err(e) if e.is_fatal() => Err(e),
				Err(e) => {
					obs::absorb(kind, stage, &url, &e);

					Ok(None)
				},
			}
		})
		.await
	}

	/// Dispatches a prepared request and decodes its JSON body verbatim.
	pub async fn send(&self, prepared: PreparedRequest) -> Result<Value> {
		let response = self.http_client.fetch(prepared.request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(TransportError::Status { status: status.as_u16() }.into());
		}

		serde_json::from_slice(response.body()).map_err(|e| ProtocolError::from(e).into())
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), descriptor: self.descriptor.clone() }
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient").field("descriptor", &self.descriptor).finish()
	}
}

/// Renders `url` for logs with the `access_token` value masked.
pub(crate) fn redacted_url(url: &Url) -> String {
	if !url.query_pairs().any(|(key, _)| key == ACCESS_TOKEN_PARAM) {
		return url.to_string();
	}

	let pairs: Vec<(String, String)> = url
		.query_pairs()
		.map(|(key, value)| {
			let value = if key == ACCESS_TOKEN_PARAM { REDACTED.to_owned() } else { value.into_owned() };

			(key.into_owned(), value)
		})
		.collect();
	let mut redacted = url.clone();

	redacted.query_pairs_mut().clear().extend_pairs(&pairs);

	redacted.to_string()
}

fn build(
	method: ApiMethod,
	url: Url,
	body: Option<(String, Vec<u8>)>,
) -> Result<PreparedRequest> {
	let mut builder = Request::builder()
		.method(method.http_method())
		.uri(url.as_str())
		.header(ACCEPT, JSON_CONTENT_TYPE);
	let payload = match body {
		Some((content_type, bytes)) => {
			builder = builder.header(CONTENT_TYPE, content_type);

			bytes
		},
		None => Vec::new(),
	};
	let request = builder.body(payload).map_err(ConfigError::from)?;

	Ok(PreparedRequest { method, url, request })
}
