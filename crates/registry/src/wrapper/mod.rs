//! Resolved, invokable functions.
//!
//! An [`InvocationWrapper`] is built fresh for every lookup and never mutated
//! afterwards; clones share their stages.

mod stage;

use std::fmt;
use std::sync::Arc;

use fncat_invocation::{ConversionFacade, Data, FunctionError, FunctionType};
use serde::Deserialize;

pub(crate) use stage::Stage;
use stage::Flow;

/// Shape of the values an [`InvocationWrapper`] hands back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputContract {
	/// Mirror the caller: an envelope input unwrapped for a raw first stage is
	/// wrapped again, with the propagated headers, on the way out.
	#[default]
	Auto,
	/// Envelope outputs are reduced to their payload.
	Raw,
	/// Raw outputs are wrapped, carrying the most recent upstream headers.
	Envelope,
}

/// A single function or a composed pipeline, ready to be applied.
#[derive(Clone)]
pub struct InvocationWrapper {
	definition: String,
	stages: Arc<[Stage]>,
	function_type: FunctionType,
	conversion: Arc<ConversionFacade>,
	contract: OutputContract,
}

impl InvocationWrapper {
	pub(crate) fn new(
		definition: String,
		stages: Vec<Stage>,
		function_type: FunctionType,
		conversion: Arc<ConversionFacade>,
		contract: OutputContract,
	) -> Self {
		Self {
			definition,
			stages: Arc::from(stages),
			function_type,
			conversion,
			contract,
		}
	}

	/// Canonical definition this wrapper was resolved from.
	pub fn definition(&self) -> &str {
		&self.definition
	}

	/// Composite descriptor: input of the first stage, output of the last.
	pub fn function_type(&self) -> &FunctionType {
		&self.function_type
	}

	pub fn stage_names(&self) -> Vec<&str> {
		self.stages.iter().map(|s| s.name.as_str()).collect()
	}

	pub fn is_composite(&self) -> bool {
		self.stages.len() > 1
	}

	pub fn output_contract(&self) -> OutputContract {
		self.contract
	}

	pub fn with_output_contract(mut self, contract: OutputContract) -> Self {
		self.contract = contract;
		self
	}

	/// Runs the pipeline on `input`.
	///
	/// Single values, envelopes and sequences of either are accepted whatever
	/// the stages declare. Sequence outputs are lazy: conversion and callable
	/// errors surface as `Err` items when the returned stream is driven.
	pub fn apply(&self, input: impl Into<Data>) -> Result<Data, FunctionError> {
		let raw_entry = self
			.stages
			.first()
			.and_then(|s| s.function_type.input())
			.is_some_and(|port| !port.envelope);

		let mut flow = Flow::ingress(input.into(), raw_entry);
		for stage in self.stages.iter() {
			flow = stage.run(flow, &self.conversion)?;
		}
		Ok(flow.finish(self.contract))
	}

	/// Invokes a producer pipeline.
	pub fn get(&self) -> Result<Data, FunctionError> {
		self.apply(Data::Empty)
	}
}

impl fmt::Debug for InvocationWrapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InvocationWrapper")
			.field("definition", &self.definition)
			.field("stages", &self.stage_names())
			.field("function_type", &self.function_type)
			.field("contract", &self.contract)
			.finish_non_exhaustive()
	}
}
