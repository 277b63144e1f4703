//! Invocation-time data shapes.

use std::fmt;

use futures::stream::{self, BoxStream, StreamExt};

use crate::{Envelope, FunctionError, Headers, Payload};

/// A lazily driven sequence of items.
///
/// Errors travel in-band so a failing element never disappears silently.
pub type ItemStream = BoxStream<'static, Result<Item, FunctionError>>;

/// Typed sequence handed to and returned from stream registrations.
pub type Sequence<T> = BoxStream<'static, Result<T, FunctionError>>;

/// A single value: raw payload or envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	Raw(Payload),
	Envelope(Envelope),
}

impl Item {
	pub fn payload(&self) -> &Payload {
		match self {
			Self::Raw(payload) => payload,
			Self::Envelope(envelope) => &envelope.payload,
		}
	}

	pub fn into_payload(self) -> Payload {
		match self {
			Self::Raw(payload) => payload,
			Self::Envelope(envelope) => envelope.payload,
		}
	}

	pub fn headers(&self) -> Option<&Headers> {
		match self {
			Self::Raw(_) => None,
			Self::Envelope(envelope) => Some(&envelope.headers),
		}
	}

	pub fn is_envelope(&self) -> bool {
		matches!(self, Self::Envelope(_))
	}

	pub fn into_envelope(self) -> Option<Envelope> {
		match self {
			Self::Envelope(envelope) => Some(envelope),
			Self::Raw(_) => None,
		}
	}
}

impl From<Payload> for Item {
	fn from(value: Payload) -> Self {
		Self::Raw(value)
	}
}

impl From<Envelope> for Item {
	fn from(value: Envelope) -> Self {
		Self::Envelope(value)
	}
}

impl From<&str> for Item {
	fn from(value: &str) -> Self {
		Self::Raw(value.into())
	}
}

/// What a caller hands to, or receives from, an invocation.
pub enum Data {
	/// No value: producer input or consumer output.
	Empty,
	One(Item),
	Many(ItemStream),
}

impl Data {
	pub fn one(item: impl Into<Item>) -> Self {
		Self::One(item.into())
	}

	/// Wraps an iterator of items into a sequence.
	pub fn many<I>(items: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Item>,
		I::IntoIter: Send + 'static,
	{
		Self::Many(stream::iter(items.into_iter().map(|item| Ok(item.into()))).boxed())
	}

	/// Wraps an existing stream of items.
	pub fn stream(items: ItemStream) -> Self {
		Self::Many(items)
	}

	pub fn shape(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::One(_) => "single",
			Self::Many(_) => "sequence",
		}
	}

	/// Takes the single item out, failing for any other shape.
	pub fn into_item(self) -> Result<Item, FunctionError> {
		match self {
			Self::One(item) => Ok(item),
			other => Err(FunctionError::ShapeMismatch {
				expected: "single",
				actual: other.shape(),
			}),
		}
	}

	/// Views any shape as a sequence: empty yields nothing, a single item yields one element.
	pub fn into_stream(self) -> ItemStream {
		match self {
			Self::Empty => stream::empty().boxed(),
			Self::One(item) => stream::iter([Ok(item)]).boxed(),
			Self::Many(items) => items,
		}
	}

	/// Drains the data into a vector, stopping at the first error.
	pub async fn collect(self) -> Result<Vec<Item>, FunctionError> {
		let mut out = Vec::new();
		let mut items = self.into_stream();
		while let Some(item) = items.next().await {
			out.push(item?);
		}
		Ok(out)
	}
}

impl fmt::Debug for Data {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => write!(f, "Empty"),
			Self::One(item) => f.debug_tuple("One").field(item).finish(),
			Self::Many(_) => write!(f, "Many(..)"),
		}
	}
}

impl From<Item> for Data {
	fn from(value: Item) -> Self {
		Self::One(value)
	}
}

impl From<Payload> for Data {
	fn from(value: Payload) -> Self {
		Self::One(Item::Raw(value))
	}
}

impl From<Envelope> for Data {
	fn from(value: Envelope) -> Self {
		Self::One(Item::Envelope(value))
	}
}
