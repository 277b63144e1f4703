//! Declared element types and the Rust types that map onto them.

use std::borrow::Cow;
use std::fmt;

use crate::{ConversionError, Payload, Record};

/// Declared type of a single value on one side of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
	/// Accepts every payload; never triggers conversion.
	Any,
	Unit,
	Bool,
	Int,
	Float,
	Text,
	Bytes,
	List(Box<ElementType>),
	Record,
	/// A third-party streaming abstraction the catalog cannot adapt.
	Foreign(Cow<'static, str>),
}

impl ElementType {
	pub fn list(inner: ElementType) -> Self {
		Self::List(Box::new(inner))
	}

	pub fn foreign(name: impl Into<Cow<'static, str>>) -> Self {
		Self::Foreign(name.into())
	}

	/// Returns true if this type, or any type nested in it, is foreign.
	pub fn is_foreign(&self) -> bool {
		match self {
			Self::Foreign(_) => true,
			Self::List(inner) => inner.is_foreign(),
			_ => false,
		}
	}

	/// Returns true if `payload` already satisfies this declared type.
	pub fn accepts(&self, payload: &Payload) -> bool {
		match (self, payload) {
			(Self::Any, _) => true,
			(Self::Unit, Payload::Null) => true,
			(Self::Bool, Payload::Bool(_)) => true,
			(Self::Int, Payload::Int(_)) => true,
			(Self::Float, Payload::Float(_)) => true,
			(Self::Text, Payload::Text(_)) => true,
			(Self::Bytes, Payload::Bytes(_)) => true,
			(Self::Record, Payload::Record(_)) => true,
			(Self::List(inner), Payload::List(items)) => items.iter().all(|item| inner.accepts(item)),
			_ => false,
		}
	}

	/// Returns true if a value declared as `source` can be handed to a side
	/// declared as `self` without conversion.
	///
	/// `any` on either side defers the decision to run time.
	pub fn is_assignable_from(&self, source: &ElementType) -> bool {
		match (self, source) {
			(Self::Foreign(_), _) | (_, Self::Foreign(_)) => false,
			(Self::Any, _) | (_, Self::Any) => true,
			(Self::List(target), Self::List(source)) => target.is_assignable_from(source),
			(target, source) => target == source,
		}
	}
}

impl fmt::Display for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Any => write!(f, "any"),
			Self::Unit => write!(f, "unit"),
			Self::Bool => write!(f, "bool"),
			Self::Int => write!(f, "int"),
			Self::Float => write!(f, "float"),
			Self::Text => write!(f, "text"),
			Self::Bytes => write!(f, "bytes"),
			Self::List(inner) => write!(f, "list<{inner}>"),
			Self::Record => write!(f, "record"),
			Self::Foreign(name) => write!(f, "foreign({name})"),
		}
	}
}

/// A Rust type that can stand on either side of a typed registration.
///
/// The declared [`ElementType`] of a registration is derived from these impls
/// once, when the registration is built.
pub trait Element: Sized + Send + 'static {
	fn element_type() -> ElementType;

	/// Extracts `Self` from a payload that has already been adapted to
	/// [`Element::element_type`].
	fn from_payload(payload: Payload) -> Result<Self, ConversionError>;

	fn into_payload(self) -> Payload;
}

fn mismatch(payload: &Payload, target: ElementType) -> ConversionError {
	ConversionError::Unsupported {
		from: payload.element_type(),
		to: target,
		content_type: None,
	}
}

macro_rules! scalar_element {
	($ty:ty, $element:ident, $variant:ident) => {
		impl Element for $ty {
			fn element_type() -> ElementType {
				ElementType::$element
			}

			fn from_payload(payload: Payload) -> Result<Self, ConversionError> {
				match payload {
					Payload::$variant(value) => Ok(value),
					other => Err(mismatch(&other, ElementType::$element)),
				}
			}

			fn into_payload(self) -> Payload {
				Payload::$variant(self)
			}
		}
	};
}

scalar_element!(bool, Bool, Bool);
scalar_element!(i64, Int, Int);
scalar_element!(f64, Float, Float);
scalar_element!(String, Text, Text);
scalar_element!(Record, Record, Record);

impl Element for Payload {
	fn element_type() -> ElementType {
		ElementType::Any
	}

	fn from_payload(payload: Payload) -> Result<Self, ConversionError> {
		Ok(payload)
	}

	fn into_payload(self) -> Payload {
		self
	}
}

impl Element for () {
	fn element_type() -> ElementType {
		ElementType::Unit
	}

	fn from_payload(payload: Payload) -> Result<Self, ConversionError> {
		match payload {
			Payload::Null => Ok(()),
			other => Err(mismatch(&other, ElementType::Unit)),
		}
	}

	fn into_payload(self) -> Payload {
		Payload::Null
	}
}

impl<T: Element> Element for Vec<T> {
	fn element_type() -> ElementType {
		ElementType::list(T::element_type())
	}

	fn from_payload(payload: Payload) -> Result<Self, ConversionError> {
		match payload {
			Payload::List(items) => items.into_iter().map(T::from_payload).collect(),
			other => Err(mismatch(&other, Self::element_type())),
		}
	}

	fn into_payload(self) -> Payload {
		Payload::List(self.into_iter().map(Element::into_payload).collect())
	}
}
