//! Turns a textual definition into an [`InvocationWrapper`].
//!
//! Resolution is the only place where definitions can fail to make sense:
//! unknown names, unsupported declared types and incompatible junctions are
//! all rejected here, before any function runs.

mod definition;

use std::sync::Arc;

use fncat_invocation::{ConversionFacade, FunctionType};

pub use definition::{CompositionSpec, DELIMITER};

use crate::registry::Snapshot;
use crate::wrapper::Stage;
use crate::{FunctionRegistration, InvocationWrapper, OutputContract, ResolveError};

/// How unknown names are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
	/// A lone name falls back to the only registration; unknown names yield `None`.
	Relaxed,
	/// Every name must match an alias exactly.
	Strict,
}

/// One resolution pass over a fixed snapshot.
pub(crate) struct Resolver {
	pub(crate) snap: Arc<Snapshot>,
	pub(crate) conversion: Arc<ConversionFacade>,
	pub(crate) contract: OutputContract,
	pub(crate) default_definition: Option<String>,
}

impl Resolver {
	pub(crate) fn resolve(&self, definition: &str, mode: LookupMode) -> Result<Option<InvocationWrapper>, ResolveError> {
		let definition = match definition.trim() {
			"" => self.default_definition.as_deref().unwrap_or_default(),
			trimmed => trimmed,
		};
		let parsed = CompositionSpec::parse(definition)?;

		let resolved = if parsed.is_composite() {
			self.segments(&parsed)
		} else {
			self.single(definition, mode)
		};
		let stages = match resolved {
			Ok(stages) => stages,
			Err(ResolveError::DoesNotExist(name)) if mode == LookupMode::Relaxed => {
				tracing::debug!(definition, missing = %name, "relaxed lookup found no match");
				return Ok(None);
			}
			Err(err) => return Err(err),
		};

		for (name, registration) in &stages {
			if let Some(port) = registration.function_type().foreign_port() {
				return Err(ResolveError::Unsupported {
					function: name.clone(),
					reason: format!("declared type {port} cannot be adapted"),
				});
			}
		}
		for pair in stages.windows(2) {
			let [(up_name, up), (down_name, down)] = pair else {
				continue;
			};
			self.check_link(up_name, up.function_type(), down_name, down.function_type())?;
		}

		let (Some((_, first)), Some((last_name, last))) = (stages.first(), stages.last()) else {
			return Err(ResolveError::DoesNotExist(definition.to_owned()));
		};
		let function_type = FunctionType::chain(first.function_type(), last.function_type());
		if parsed.is_open_ended() && !function_type.is_producer() {
			return Err(ResolveError::Incompatible {
				upstream: last_name.clone(),
				downstream: String::new(),
				reason: "an open-ended composition must start with a producer".to_owned(),
			});
		}

		let stages: Vec<Stage> = stages.iter().map(|(name, r)| Stage::new(name.clone(), r)).collect();
		tracing::debug!(
			definition,
			%function_type,
			stages = stages.len(),
			"resolved function definition"
		);
		Ok(Some(InvocationWrapper::new(
			parsed.definition(),
			stages,
			function_type,
			self.conversion.clone(),
			self.contract,
		)))
	}

	/// Resolves a lone name, falling back to the only registration in relaxed mode.
	fn single(&self, name: &str, mode: LookupMode) -> Result<Vec<(String, Arc<FunctionRegistration>)>, ResolveError> {
		if let Some(registration) = self.snap.get(name) {
			return Ok(vec![(name.to_owned(), registration.clone())]);
		}
		match (mode, self.snap.sole()) {
			(LookupMode::Relaxed, Some(only)) => {
				tracing::debug!(requested = name, function = only.name(), "falling back to the only registration");
				Ok(vec![(only.name().to_owned(), only.clone())])
			}
			_ => Err(ResolveError::DoesNotExist(name.to_owned())),
		}
	}

	/// Resolves every segment of a composition by exact alias.
	fn segments(&self, parsed: &CompositionSpec) -> Result<Vec<(String, Arc<FunctionRegistration>)>, ResolveError> {
		parsed.segments()
			.iter()
			.map(|name| match self.snap.get(name) {
				Some(registration) => Ok((name.clone(), registration.clone())),
				None => Err(ResolveError::DoesNotExist(name.clone())),
			})
			.collect()
	}

	fn check_link(&self, up_name: &str, up: &FunctionType, down_name: &str, down: &FunctionType) -> Result<(), ResolveError> {
		let incompatible = |reason: String| ResolveError::Incompatible {
			upstream: up_name.to_owned(),
			downstream: down_name.to_owned(),
			reason,
		};
		let Some(output) = up.output() else {
			return Err(incompatible("a consumer cannot feed another stage".to_owned()));
		};
		let Some(input) = down.input() else {
			return Err(incompatible("a producer must be the first stage".to_owned()));
		};
		if !self.conversion.can_convert(&output.element, &input.element) {
			return Err(incompatible(format!("no conversion from {} to {}", output.element, input.element)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
