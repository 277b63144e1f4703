//! Dynamically typed payload values.

use indexmap::IndexMap;

use crate::ElementType;

/// Ordered field map carried by [`Payload::Record`].
pub type Record = IndexMap<String, Payload>;

/// A value flowing through a function, with its runtime type attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	Bytes(Vec<u8>),
	List(Vec<Payload>),
	Record(Record),
}

impl Payload {
	/// Returns the runtime element type of this value.
	///
	/// Lists report `list<T>` only when every element shares the same type;
	/// heterogeneous or empty lists report `list<any>`.
	pub fn element_type(&self) -> ElementType {
		match self {
			Self::Null => ElementType::Unit,
			Self::Bool(_) => ElementType::Bool,
			Self::Int(_) => ElementType::Int,
			Self::Float(_) => ElementType::Float,
			Self::Text(_) => ElementType::Text,
			Self::Bytes(_) => ElementType::Bytes,
			Self::Record(_) => ElementType::Record,
			Self::List(items) => {
				let mut types = items.iter().map(Payload::element_type);
				let inner = match types.next() {
					Some(first) if types.all(|t| t == first) => first,
					_ => ElementType::Any,
				};
				ElementType::list(inner)
			}
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Self::Record(r) => Some(r),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl From<&str> for Payload {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for Payload {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for Payload {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Payload {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for Payload {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Vec<u8>> for Payload {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}

impl From<Vec<Payload>> for Payload {
	fn from(value: Vec<Payload>) -> Self {
		Self::List(value)
	}
}

impl From<Record> for Payload {
	fn from(value: Record) -> Self {
		Self::Record(value)
	}
}
