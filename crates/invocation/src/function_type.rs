//! Type descriptors of registered functions.
//!
//! A [`FunctionType`] is computed once, when a registration is built, and is
//! immutable afterwards. Adaptation at call time reads it; nothing re-inspects
//! the callable.

use std::fmt;

use crate::ElementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
	/// Takes no input.
	Producer,
	/// Produces no output.
	Consumer,
	Transformer,
}

impl fmt::Display for FunctionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Producer => write!(f, "producer"),
			Self::Consumer => write!(f, "consumer"),
			Self::Transformer => write!(f, "transformer"),
		}
	}
}

/// Declared shape of one side of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Port {
	pub element: ElementType,
	/// Values on this side are envelopes rather than raw payloads.
	pub envelope: bool,
	/// This side is a sequence rather than a single value.
	pub sequence: bool,
}

impl Port {
	pub fn raw(element: ElementType) -> Self {
		Self {
			element,
			envelope: false,
			sequence: false,
		}
	}

	pub fn envelope(element: ElementType) -> Self {
		Self {
			element,
			envelope: true,
			sequence: false,
		}
	}

	/// Lifts this port to a sequence of the same element shape.
	pub fn in_sequence(mut self) -> Self {
		self.sequence = true;
		self
	}
}

impl fmt::Display for Port {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (self.sequence, self.envelope) {
			(false, false) => write!(f, "{}", self.element),
			(false, true) => write!(f, "message<{}>", self.element),
			(true, false) => write!(f, "stream<{}>", self.element),
			(true, true) => write!(f, "stream<message<{}>>", self.element),
		}
	}
}

/// Immutable descriptor of a registered or composed function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
	kind: FunctionKind,
	input: Option<Port>,
	output: Option<Port>,
}

impl FunctionType {
	pub fn producer(output: Port) -> Self {
		Self {
			kind: FunctionKind::Producer,
			input: None,
			output: Some(output),
		}
	}

	pub fn consumer(input: Port) -> Self {
		Self {
			kind: FunctionKind::Consumer,
			input: Some(input),
			output: None,
		}
	}

	pub fn transformer(input: Port, output: Port) -> Self {
		Self {
			kind: FunctionKind::Transformer,
			input: Some(input),
			output: Some(output),
		}
	}

	/// Descriptor of a pipeline: input of its first stage, output of its last.
	///
	/// A pipeline without input is a producer even if its last stage is a consumer.
	pub fn chain(first: &FunctionType, last: &FunctionType) -> Self {
		let input = first.input.clone();
		let output = last.output.clone();
		let kind = match (&input, &output) {
			(None, _) => FunctionKind::Producer,
			(Some(_), None) => FunctionKind::Consumer,
			(Some(_), Some(_)) => FunctionKind::Transformer,
		};
		Self { kind, input, output }
	}

	pub fn kind(&self) -> FunctionKind {
		self.kind
	}

	pub fn input(&self) -> Option<&Port> {
		self.input.as_ref()
	}

	pub fn output(&self) -> Option<&Port> {
		self.output.as_ref()
	}

	pub fn is_producer(&self) -> bool {
		self.kind == FunctionKind::Producer
	}

	pub fn is_consumer(&self) -> bool {
		self.kind == FunctionKind::Consumer
	}

	/// Returns the first port whose element type cannot be adapted, if any.
	pub fn foreign_port(&self) -> Option<&Port> {
		self.input
			.iter()
			.chain(self.output.iter())
			.find(|port| port.element.is_foreign())
	}
}

impl fmt::Display for FunctionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.input, &self.output) {
			(None, Some(out)) => write!(f, "() -> {out}"),
			(Some(input), None) => write!(f, "{input} -> ()"),
			(Some(input), Some(out)) => write!(f, "{input} -> {out}"),
			(None, None) => write!(f, "() -> ()"),
		}
	}
}
