//! Envelopes: payloads paired with ordered metadata headers.

use std::fmt;

use indexmap::IndexMap;

use crate::Payload;

/// Header carrying the payload's content type.
pub const CONTENT_TYPE: &str = "contentType";

/// Ordered header map of an [`Envelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Inserts a header, keeping its original position if it already exists.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Parses the content-type header.
	///
	/// Accepts both `contentType` and the HTTP spelling `content-type`, in any case.
	pub fn content_type(&self) -> Option<MimeType> {
		self.0
			.iter()
			.find(|(k, _)| k.as_str() == CONTENT_TYPE || k.eq_ignore_ascii_case("content-type"))
			.and_then(|(_, v)| MimeType::parse(v))
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// A `type/subtype` media type with parameters stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
	kind: String,
	subtype: String,
}

impl MimeType {
	pub fn new(kind: impl Into<String>, subtype: impl Into<String>) -> Self {
		Self {
			kind: kind.into().to_ascii_lowercase(),
			subtype: subtype.into().to_ascii_lowercase(),
		}
	}

	/// Parses `type/subtype[;params]`. Returns `None` for anything else.
	pub fn parse(text: &str) -> Option<Self> {
		let essence = text.split(';').next()?.trim();
		let (kind, subtype) = essence.split_once('/')?;
		let (kind, subtype) = (kind.trim(), subtype.trim());
		if kind.is_empty() || subtype.is_empty() {
			return None;
		}
		Some(Self::new(kind, subtype))
	}

	pub fn json() -> Self {
		Self::new("application", "json")
	}

	pub fn text_plain() -> Self {
		Self::new("text", "plain")
	}

	pub fn octet_stream() -> Self {
		Self::new("application", "octet-stream")
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn subtype(&self) -> &str {
		&self.subtype
	}

	/// Returns true if `other` falls within this type, honouring `*` wildcards
	/// and structured-syntax suffixes (`application/*+json` includes
	/// `application/cloudevents+json`).
	pub fn includes(&self, other: &MimeType) -> bool {
		if self.kind != "*" && self.kind != other.kind {
			return false;
		}
		if self.subtype == "*" || self.subtype == other.subtype {
			return true;
		}
		match self.subtype.strip_prefix("*+") {
			Some(suffix) => other.subtype.ends_with(&format!("+{suffix}")),
			None => false,
		}
	}
}

impl fmt::Display for MimeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.kind, self.subtype)
	}
}

/// A payload paired with headers.
///
/// Typed registrations receive `Message<T>`; the erased form flowing between
/// stages is [`Envelope`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T = Payload> {
	pub payload: T,
	pub headers: Headers,
}

/// Type-erased message as carried between stages.
pub type Envelope = Message<Payload>;

impl<T> Message<T> {
	pub fn new(payload: T) -> Self {
		Self {
			payload,
			headers: Headers::new(),
		}
	}

	pub fn with_headers(payload: T, headers: Headers) -> Self {
		Self { payload, headers }
	}

	/// Builder-style header insertion.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Replaces the payload, keeping the headers.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Message<U> {
		Message {
			payload: f(self.payload),
			headers: self.headers,
		}
	}

	pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Message<U>, E> {
		Ok(Message {
			payload: f(self.payload)?,
			headers: self.headers,
		})
	}
}
