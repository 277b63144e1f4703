//! Per-stage adaptation.
//!
//! Between stages values travel as [`Carried`]: the item itself plus the
//! headers of the most recent envelope seen upstream, so a raw stage never
//! loses the caller's metadata.

use std::sync::Arc;

use fncat_invocation::{
	ConversionFacade, Data, FunctionError, FunctionType, Headers, Item, Message, Payload, Port,
};
use futures::stream::{self, BoxStream, StreamExt};

use super::OutputContract;
use crate::{FunctionRegistration, Invocable};

/// One resolved function inside a wrapper.
#[derive(Clone)]
pub(crate) struct Stage {
	pub(crate) name: String,
	pub(crate) function_type: FunctionType,
	target: Arc<dyn Invocable>,
}

impl Stage {
	pub(crate) fn new(name: String, registration: &FunctionRegistration) -> Self {
		Self {
			name,
			function_type: registration.function_type().clone(),
			target: registration.target().clone(),
		}
	}

	/// Feeds `flow` into this stage, lifting or unwrapping it to the declared input port.
	pub(crate) fn run(&self, flow: Flow, conversion: &Arc<ConversionFacade>) -> Result<Flow, FunctionError> {
		let Some(port) = self.function_type.input() else {
			return Ok(Flow::fresh(self.target.invoke(Data::Empty)?));
		};

		if port.sequence {
			// A lone input owns every output; a sequence cannot be matched element-wise.
			let (headers, rewrap) = match &flow {
				Flow::One(carried) => (carried.headers.clone(), carried.rewrap),
				Flow::Empty | Flow::Many(_) => (None, false),
			};
			let port = port.clone();
			let conversion = conversion.clone();
			let items = flow
				.into_stream()
				.map(move |carried| carried.and_then(|c| adapt(c.item, c.headers.as_ref(), &port, &conversion)))
				.boxed();
			return Ok(Flow::carry(self.target.invoke(Data::Many(items))?, headers, rewrap));
		}

		match flow {
			Flow::Empty => Err(FunctionError::MissingInput {
				function: self.name.clone(),
			}),
			Flow::One(carried) => self.call(port, carried, conversion),
			Flow::Many(items) => {
				let stage = self.clone();
				let port = port.clone();
				let conversion = conversion.clone();
				let lifted = items
					.map(move |carried| match carried.and_then(|c| stage.call(&port, c, &conversion)) {
						Ok(Flow::Empty) => stream::iter([Ok(Carried::ack())]).boxed(),
						Ok(Flow::One(out)) => stream::iter([Ok(out)]).boxed(),
						Ok(Flow::Many(out)) => out,
						Err(err) => stream::iter([Err(err)]).boxed(),
					})
					.flatten()
					.boxed();
				Ok(Flow::Many(lifted))
			}
		}
	}

	fn call(&self, port: &Port, carried: Carried, conversion: &ConversionFacade) -> Result<Flow, FunctionError> {
		let Carried { item, headers, rewrap } = carried;
		let item = adapt(item, headers.as_ref(), port, conversion)?;
		let out = self.target.invoke(Data::One(item))?;
		Ok(Flow::carry(out, headers, rewrap))
	}
}

/// Adapts one item to `port`: converts the payload and wraps or unwraps the envelope.
///
/// Envelopes convert with their own content type. Raw payloads convert
/// without one; the carried headers only seed a synthesized envelope.
fn adapt(item: Item, headers: Option<&Headers>, port: &Port, conversion: &ConversionFacade) -> Result<Item, FunctionError> {
	match item {
		Item::Envelope(mut envelope) => {
			let content_type = envelope.headers.content_type();
			envelope.payload = conversion.convert(envelope.payload, content_type.as_ref(), &port.element)?;
			if port.envelope {
				Ok(Item::Envelope(envelope))
			} else {
				Ok(Item::Raw(envelope.payload))
			}
		}
		Item::Raw(payload) => {
			let payload = conversion.convert(payload, None, &port.element)?;
			if port.envelope {
				Ok(Item::Envelope(Message::with_headers(payload, headers.cloned().unwrap_or_default())))
			} else {
				Ok(Item::Raw(payload))
			}
		}
	}
}

/// An item in flight plus the metadata it inherited.
pub(crate) struct Carried {
	item: Item,
	/// Headers of the most recent envelope seen upstream.
	headers: Option<Headers>,
	/// The caller sent an envelope that was unwrapped for a raw first stage.
	rewrap: bool,
}

impl Carried {
	fn new(item: Item, headers: Option<Headers>, rewrap: bool) -> Self {
		let headers = item.headers().cloned().or(headers);
		Self { item, headers, rewrap }
	}

	/// Per-element completion of a consumer lifted over a sequence.
	fn ack() -> Self {
		Self {
			item: Item::Raw(Payload::Null),
			headers: None,
			rewrap: false,
		}
	}

	fn finish(self, contract: OutputContract) -> Item {
		let Self { item, headers, rewrap } = self;
		match (item, contract) {
			(Item::Raw(payload), OutputContract::Envelope) => {
				Item::Envelope(Message::with_headers(payload, headers.unwrap_or_default()))
			}
			(Item::Raw(payload), OutputContract::Auto) if rewrap => {
				Item::Envelope(Message::with_headers(payload, headers.unwrap_or_default()))
			}
			(Item::Envelope(envelope), OutputContract::Raw) => Item::Raw(envelope.payload),
			(item, _) => item,
		}
	}
}

/// Data between stages.
pub(crate) enum Flow {
	Empty,
	One(Carried),
	Many(BoxStream<'static, Result<Carried, FunctionError>>),
}

impl Flow {
	/// Wraps the caller's input; `raw_entry` tells whether the first stage takes raw payloads.
	pub(crate) fn ingress(data: Data, raw_entry: bool) -> Self {
		let entry = move |item: Item| {
			let rewrap = raw_entry && item.is_envelope();
			Carried::new(item, None, rewrap)
		};
		match data {
			Data::Empty => Self::Empty,
			Data::One(item) => Self::One(entry(item)),
			Data::Many(items) => Self::Many(items.map(move |item| item.map(entry)).boxed()),
		}
	}

	/// Wraps a stage's output, inheriting `headers` where the output is raw.
	fn carry(data: Data, headers: Option<Headers>, rewrap: bool) -> Self {
		match data {
			Data::Empty => Self::Empty,
			Data::One(item) => Self::One(Carried::new(item, headers, rewrap)),
			Data::Many(items) => Self::Many(
				items
					.map(move |item| item.map(|item| Carried::new(item, headers.clone(), rewrap)))
					.boxed(),
			),
		}
	}

	/// Output with no inherited metadata.
	fn fresh(data: Data) -> Self {
		Self::carry(data, None, false)
	}

	fn into_stream(self) -> BoxStream<'static, Result<Carried, FunctionError>> {
		match self {
			Self::Empty => stream::empty().boxed(),
			Self::One(carried) => stream::iter([Ok(carried)]).boxed(),
			Self::Many(items) => items,
		}
	}

	/// Applies the output contract and hands the result back to the caller.
	pub(crate) fn finish(self, contract: OutputContract) -> Data {
		match self {
			Self::Empty => Data::Empty,
			Self::One(carried) => Data::One(carried.finish(contract)),
			Self::Many(items) => Data::Many(items.map(move |item| item.map(|c| c.finish(contract))).boxed()),
		}
	}
}
