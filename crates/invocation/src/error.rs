use std::fmt;

use crate::{ElementType, MimeType};

/// Failure reported by a conversion collaborator.
///
/// The catalog never retries or substitutes a default; these propagate unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
	/// No converter or conversion service can produce the target type.
	#[error("no conversion from {from} to {to} (content type: {content_type:?})")]
	Unsupported {
		from: ElementType,
		to: ElementType,
		content_type: Option<MimeType>,
	},
	/// The payload claimed a content type it does not satisfy.
	#[error("malformed {content_type} payload: {reason}")]
	Malformed { content_type: MimeType, reason: String },
	/// A converter accepted the payload but failed to convert it.
	#[error("cannot convert {from} to {to}: {reason}")]
	Failed {
		from: ElementType,
		to: ElementType,
		reason: String,
	},
}

/// Failure raised while invoking a resolved function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
	#[error(transparent)]
	Conversion(#[from] ConversionError),
	/// A stage that consumes input was invoked without any.
	#[error("function '{function}' requires an input value")]
	MissingInput { function: String },
	/// A callable received or returned a shape that contradicts its declared type.
	#[error("expected {expected} data, got {actual}")]
	ShapeMismatch {
		expected: &'static str,
		actual: &'static str,
	},
	/// The user callable itself failed.
	#[error("function failed: {message}")]
	Callable { message: String },
}

impl FunctionError {
	pub fn callable(err: impl fmt::Display) -> Self {
		Self::Callable {
			message: err.to_string(),
		}
	}
}
