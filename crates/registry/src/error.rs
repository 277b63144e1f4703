/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
	#[error("invalid function name {name:?}: {reason}")]
	InvalidName { name: String, reason: &'static str },
	/// Raised under [`crate::DuplicatePolicy::Reject`] when another function owns the alias.
	#[error("alias '{alias}' is already bound to function '{owner}'")]
	AliasTaken { alias: String, owner: String },
}

/// Resolution failures. Always raised by the lookup itself, never deferred to invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// No registration answers to the name and no fallback applies.
	#[error("function definition '{0}' does not exist")]
	DoesNotExist(String),
	/// The function declares a type the catalog cannot adapt.
	#[error("function '{function}' is not supported: {reason}")]
	Unsupported { function: String, reason: String },
	/// Two adjacent stages cannot be chained.
	#[error("cannot compose '{upstream}' with '{downstream}': {reason}")]
	Incompatible {
		upstream: String,
		downstream: String,
		reason: String,
	},
	#[error("malformed function definition '{definition}': {reason}")]
	Malformed {
		definition: String,
		reason: &'static str,
	},
}
