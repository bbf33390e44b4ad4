//! Binary-safe `multipart/form-data` encoder used by upload-style API calls.
//!
//! Parts are emitted in insertion order with every scalar field ahead of every file. Each
//! [`MultipartForm::encode`] call draws a fresh boundary, so the form itself stays reusable.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const BOUNDARY_LEN: usize = 48;
const CRLF: &[u8] = b"\r\n";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Ordered collection of scalar fields and file attachments.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
	fields: Vec<(String, String)>,
	files: Vec<FilePart>,
}
impl MultipartForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a scalar field.
	pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.fields.push((name.into(), value.into()));

		self
	}

	/// Appends a file attachment.
	///
	/// When `mime_type` is `None` the type is inferred from the filename extension, falling back
	/// to `application/octet-stream`.
	pub fn add_file(
		&mut self,
		field_name: impl Into<String>,
		filename: impl Into<String>,
		content: impl Into<Vec<u8>>,
		mime_type: Option<String>,
	) -> &mut Self {
		let filename = filename.into();
		let mime_type = mime_type.unwrap_or_else(|| guess_mime(&filename));

		self.files.push(FilePart {
			field_name: field_name.into(),
			filename,
			mime_type,
			content: content.into(),
		});

		self
	}

	/// Scalar fields in insertion order.
	pub fn fields(&self) -> &[(String, String)] {
		&self.fields
	}

	/// File attachments in insertion order.
	pub fn files(&self) -> &[FilePart] {
		&self.files
	}

	/// Serializes the form under a freshly generated boundary.
	pub fn encode(&self) -> EncodedForm {
		self.encode_with_boundary(random_boundary())
	}

	pub(crate) fn encode_with_boundary(&self, boundary: String) -> EncodedForm {
		let mut body = Vec::with_capacity(self.size_hint(boundary.len()));

		for (name, value) in &self.fields {
			push_line(&mut body, format!("--{boundary}").as_bytes());
			push_line(
				&mut body,
				format!("Content-Disposition: form-data; name=\"{name}\"").as_bytes(),
			);
			push_line(&mut body, b"");
			push_line(&mut body, value.as_bytes());
		}
		for file in &self.files {
			push_line(&mut body, format!("--{boundary}").as_bytes());
			push_line(
				&mut body,
				format!(
					"Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
					file.field_name, file.filename
				)
				.as_bytes(),
			);
			push_line(&mut body, format!("Content-Type: {}", file.mime_type).as_bytes());
			push_line(&mut body, b"");
			push_line(&mut body, &file.content);
		}

		push_line(&mut body, format!("--{boundary}--").as_bytes());

		EncodedForm { boundary, body }
	}

	fn size_hint(&self, boundary_len: usize) -> usize {
		let fields: usize =
			self.fields.iter().map(|(name, value)| name.len() + value.len() + 64).sum();
		let files: usize = self
			.files
			.iter()
			.map(|file| {
				file.field_name.len() + file.filename.len() + file.mime_type.len() + file.content.len()
					+ 96
			})
			.sum();

		fields + files + (self.fields.len() + self.files.len() + 1) * (boundary_len + 8)
	}
}

/// File attachment stored inside a [`MultipartForm`].
#[derive(Clone)]
pub struct FilePart {
	/// Form field name carrying the file.
	pub field_name: String,
	/// Filename reported in the `Content-Disposition` header.
	pub filename: String,
	/// Declared or inferred content type.
	pub mime_type: String,
	/// Raw file bytes.
	pub content: Vec<u8>,
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("field_name", &self.field_name)
			.field("filename", &self.filename)
			.field("mime_type", &self.mime_type)
			.field("content_len", &self.content.len())
			.finish()
	}
}

/// Output of one [`MultipartForm::encode`] call.
#[derive(Clone, Debug)]
pub struct EncodedForm {
	/// Boundary token delimiting the parts of [`body`](Self::body).
	pub boundary: String,
	/// Complete request body.
	pub body: Vec<u8>,
}
impl EncodedForm {
	/// `Content-Type` header value that must accompany [`body`](Self::body).
	pub fn content_type(&self) -> String {
		format!("multipart/form-data; boundary={}", self.boundary)
	}
}

/// Infers a content type from `filename`, falling back to `application/octet-stream`.
pub fn guess_mime(filename: &str) -> String {
	mime_guess::from_path(filename)
		.first_raw()
		.map(ToOwned::to_owned)
		.unwrap_or_else(|| FALLBACK_MIME.to_owned())
}

fn push_line(body: &mut Vec<u8>, line: &[u8]) {
	body.extend_from_slice(line);
	body.extend_from_slice(CRLF);
}

fn random_boundary() -> String {
	rand::rng().sample_iter(Alphanumeric).take(BOUNDARY_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn status_and_picture() -> MultipartForm {
		let mut form = MultipartForm::new();

		form.add_field("status", "hello").add_file(
			"pic",
			"a.png",
			vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x00, 0xFF],
			Some("image/png".into()),
		);

		form
	}

	#[test]
	fn encodes_fields_before_files_with_crlf_framing() {
		let encoded = status_and_picture().encode_with_boundary("XyZ".into());
		let mut expected = Vec::new();

		expected.extend_from_slice(
			b"--XyZ\r\nContent-Disposition: form-data; name=\"status\"\r\n\r\nhello\r\n",
		);
		expected.extend_from_slice(
			b"--XyZ\r\nContent-Disposition: form-data; name=\"pic\"; filename=\"a.png\"\r\n",
		);
		expected.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
		expected.extend_from_slice(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x00, 0xFF]);
		expected.extend_from_slice(b"\r\n--XyZ--\r\n");

		assert_eq!(encoded.body, expected);
		assert_eq!(encoded.content_type(), "multipart/form-data; boundary=XyZ");
	}

	#[test]
	fn fields_precede_files_regardless_of_call_order() {
		let mut form = MultipartForm::new();

		form.add_file("pic", "a.bin", b"raw".to_vec(), None).add_field("status", "late");

		let encoded = form.encode_with_boundary("B".into());
		let body = String::from_utf8_lossy(&encoded.body);
		let status_at = body.find("name=\"status\"").expect("Status field should be encoded.");
		let pic_at = body.find("name=\"pic\"").expect("Picture part should be encoded.");

		assert!(status_at < pic_at);
	}

	#[test]
	fn boundaries_are_random_alphanumeric_and_distinct() {
		let form = status_and_picture();
		let first = form.encode();
		let second = form.encode();

		assert_eq!(first.boundary.len(), BOUNDARY_LEN);
		assert!(first.boundary.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first.boundary, second.boundary);

		let normalized = |encoded: &EncodedForm| {
			String::from_utf8_lossy(&encoded.body).replace(&encoded.boundary, "BOUNDARY")
		};

		assert_eq!(normalized(&first), normalized(&second));
	}

	#[test]
	fn mime_type_is_inferred_from_extension() {
		let mut form = MultipartForm::new();

		form.add_file("pic", "photo.jpg", Vec::new(), None).add_file(
			"blob",
			"payload.unknownext",
			Vec::new(),
			None,
		);

		assert_eq!(form.files()[0].mime_type, "image/jpeg");
		assert_eq!(form.files()[1].mime_type, FALLBACK_MIME);
	}

	#[test]
	fn empty_form_only_emits_terminal_boundary() {
		let encoded = MultipartForm::new().encode_with_boundary("end".into());

		assert_eq!(encoded.body, b"--end--\r\n");
	}
}
