//! Registrations: a callable, its names and its declared type.
//!
//! Typed constructors derive the [`FunctionType`] from the closure signature
//! through [`Element`]; [`FunctionRegistration::erased`] accepts an explicit
//! type for shapes the typed constructors do not cover.

use std::fmt;
use std::sync::Arc;

use fncat_invocation::{
	Data, Element, FunctionError, FunctionType, Item, ItemStream, Message, Port, Sequence,
};
use futures::future::{self, BoxFuture};
use futures::stream::{self, StreamExt};

use crate::RegisterError;
use crate::resolver::DELIMITER;

/// Type-erased callable held by the catalog.
///
/// The catalog only ever passes data shaped as the registration's
/// [`FunctionType`] declares: [`Data::Empty`] for producers, [`Data::One`] for
/// single-value inputs, [`Data::Many`] for sequence inputs. Implementations
/// must answer in the declared output shape.
pub trait Invocable: Send + Sync {
	fn invoke(&self, input: Data) -> Result<Data, FunctionError>;
}

impl<F> Invocable for F
where
	F: Fn(Data) -> Result<Data, FunctionError> + Send + Sync,
{
	fn invoke(&self, input: Data) -> Result<Data, FunctionError> {
		self(input)
	}
}

/// A callable plus every name it answers to.
pub struct FunctionRegistration {
	name: String,
	aliases: Vec<String>,
	function_type: FunctionType,
	target: Arc<dyn Invocable>,
}

impl FunctionRegistration {
	/// Registers an erased callable under an explicit type.
	pub fn erased(name: impl Into<String>, function_type: FunctionType, target: impl Invocable + 'static) -> Self {
		let name = name.into().trim().to_owned();
		Self {
			aliases: vec![name.clone()],
			name,
			function_type,
			target: Arc::new(target),
		}
	}

	/// `() -> B`
	pub fn supplier<B, F>(name: impl Into<String>, f: F) -> Self
	where
		B: Element,
		F: Fn() -> B + Send + Sync + 'static,
	{
		let function_type = FunctionType::producer(Port::raw(B::element_type()));
		Self::erased(name, function_type, move |_: Data| -> Result<Data, FunctionError> {
			Ok(Data::One(Item::Raw(f().into_payload())))
		})
	}

	/// `A -> B`
	pub fn function<A, B, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		B: Element,
		F: Fn(A) -> B + Send + Sync + 'static,
	{
		Self::try_function(name, move |a: A| Ok::<_, FunctionError>(f(a)))
	}

	/// `A -> Result<B, E>`; errors surface as [`FunctionError::Callable`].
	pub fn try_function<A, B, E, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		B: Element,
		E: fmt::Display,
		F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
	{
		let function_type = FunctionType::transformer(Port::raw(A::element_type()), Port::raw(B::element_type()));
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			let a = A::from_payload(input.into_item()?.into_payload())?;
			let b = f(a).map_err(FunctionError::callable)?;
			Ok(Data::One(Item::Raw(b.into_payload())))
		})
	}

	/// `A -> ()`
	pub fn consumer<A, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		F: Fn(A) + Send + Sync + 'static,
	{
		let function_type = FunctionType::consumer(Port::raw(A::element_type()));
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			f(A::from_payload(input.into_item()?.into_payload())?);
			Ok(Data::Empty)
		})
	}

	/// `Message<A> -> Message<B>`
	pub fn message_function<A, B, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		B: Element,
		F: Fn(Message<A>) -> Message<B> + Send + Sync + 'static,
	{
		let function_type = FunctionType::transformer(Port::envelope(A::element_type()), Port::envelope(B::element_type()));
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			let message = typed_message(input.into_item()?)?;
			Ok(Data::One(Item::Envelope(f(message).map(Element::into_payload))))
		})
	}

	/// `() -> stream<B>`
	pub fn stream_supplier<B, F>(name: impl Into<String>, f: F) -> Self
	where
		B: Element,
		F: Fn() -> Sequence<B> + Send + Sync + 'static,
	{
		let function_type = FunctionType::producer(Port::raw(B::element_type()).in_sequence());
		Self::erased(name, function_type, move |_: Data| -> Result<Data, FunctionError> {
			Ok(Data::Many(erase(f())))
		})
	}

	/// `stream<A> -> stream<B>`
	pub fn stream_function<A, B, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		B: Element,
		F: Fn(Sequence<A>) -> Sequence<B> + Send + Sync + 'static,
	{
		let function_type = FunctionType::transformer(
			Port::raw(A::element_type()).in_sequence(),
			Port::raw(B::element_type()).in_sequence(),
		);
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			Ok(Data::Many(erase(f(typed(input)))))
		})
	}

	/// `stream<message<A>> -> stream<B>`
	///
	/// Each element arrives with its own headers; raw elements get an
	/// envelope synthesized from the headers carried alongside them.
	pub fn message_stream_function<A, B, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		B: Element,
		F: Fn(Sequence<Message<A>>) -> Sequence<B> + Send + Sync + 'static,
	{
		let function_type = FunctionType::transformer(
			Port::envelope(A::element_type()).in_sequence(),
			Port::raw(B::element_type()).in_sequence(),
		);
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			let messages = input
				.into_stream()
				.map(|item| item.and_then(typed_message::<A>))
				.boxed();
			Ok(Data::Many(erase(f(messages))))
		})
	}

	/// `stream<A> -> ()`
	///
	/// The returned data is a sequence that completes empty once the consumer's
	/// future resolves, or yields its error.
	pub fn stream_consumer<A, F>(name: impl Into<String>, f: F) -> Self
	where
		A: Element,
		F: Fn(Sequence<A>) -> BoxFuture<'static, Result<(), FunctionError>> + Send + Sync + 'static,
	{
		let function_type = FunctionType::consumer(Port::raw(A::element_type()).in_sequence());
		Self::erased(name, function_type, move |input: Data| -> Result<Data, FunctionError> {
			let done = stream::once(f(typed(input)))
				.filter_map(|result: Result<(), FunctionError>| future::ready(result.err().map(Err::<Item, _>)));
			Ok(Data::Many(done.boxed()))
		})
	}

	/// Adds another name this registration answers to.
	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		let alias = alias.into().trim().to_owned();
		if !self.aliases.contains(&alias) {
			self.aliases.push(alias);
		}
		self
	}

	/// Overrides the derived type.
	pub fn with_type(mut self, function_type: FunctionType) -> Self {
		self.function_type = function_type;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Every name, primary name first.
	pub fn aliases(&self) -> &[String] {
		&self.aliases
	}

	pub fn function_type(&self) -> &FunctionType {
		&self.function_type
	}

	pub fn target(&self) -> &Arc<dyn Invocable> {
		&self.target
	}

	pub(crate) fn validate(&self) -> Result<(), RegisterError> {
		for alias in &self.aliases {
			let reason = if alias.is_empty() {
				"name must not be empty"
			} else if alias.contains(DELIMITER) {
				"name must not contain the composition delimiter"
			} else {
				continue;
			};
			return Err(RegisterError::InvalidName {
				name: alias.clone(),
				reason,
			});
		}
		Ok(())
	}
}

impl fmt::Debug for FunctionRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionRegistration")
			.field("name", &self.name)
			.field("aliases", &self.aliases)
			.field("function_type", &self.function_type)
			.finish_non_exhaustive()
	}
}

fn typed<A: Element>(input: Data) -> Sequence<A> {
	input
		.into_stream()
		.map(|item| item.and_then(|item| A::from_payload(item.into_payload()).map_err(FunctionError::from)))
		.boxed()
}

fn typed_message<A: Element>(item: Item) -> Result<Message<A>, FunctionError> {
	let envelope = item.into_envelope().ok_or(FunctionError::ShapeMismatch {
		expected: "envelope",
		actual: "raw",
	})?;
	Ok(envelope.try_map(A::from_payload)?)
}

fn erase<B: Element>(output: Sequence<B>) -> ItemStream {
	output.map(|value| value.map(|b| Item::Raw(b.into_payload()))).boxed()
}
