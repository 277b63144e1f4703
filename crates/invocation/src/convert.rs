//! Conversion boundary.
//!
//! Two collaborators are injected: content-negotiating [`MessageConverter`]s,
//! consulted first when the payload arrived with a content type, and a
//! scalar [`ConversionService`] used otherwise. [`ConversionFacade`] only
//! decides which one to ask; it implements no conversion itself.

use std::fmt;
use std::sync::Arc;

use crate::{ConversionError, ElementType, MimeType, Payload};

/// Content-type aware payload converter.
pub trait MessageConverter: Send + Sync {
	/// Media types this converter negotiates for.
	fn supported_types(&self) -> &[MimeType];

	/// Whether this converter can turn `payload` into `target`.
	fn can_convert_from(&self, payload: &Payload, target: &ElementType) -> bool;

	fn convert_from(
		&self,
		payload: Payload,
		content_type: &MimeType,
		target: &ElementType,
	) -> Result<Payload, ConversionError>;

	/// Whether this converter may ever produce `target`.
	///
	/// Consulted at resolution time, before any content type is known.
	fn can_convert_to(&self, _target: &ElementType) -> bool {
		true
	}

	fn supports(&self, content_type: &MimeType) -> bool {
		self.supported_types().iter().any(|t| t.includes(content_type))
	}
}

/// Generic scalar conversion service.
pub trait ConversionService: Send + Sync {
	fn can_convert(&self, source: &ElementType, target: &ElementType) -> bool;

	fn convert(&self, payload: Payload, target: &ElementType) -> Result<Payload, ConversionError>;
}

/// Single entry point the catalog calls whenever a declared type and an observed
/// runtime type disagree.
#[derive(Clone, Default)]
pub struct ConversionFacade {
	converters: Vec<Arc<dyn MessageConverter>>,
	service: Option<Arc<dyn ConversionService>>,
}

impl ConversionFacade {
	/// Creates a facade with no collaborators: only payloads that already match pass.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a message converter. Converters are consulted in insertion order.
	pub fn with_converter(mut self, converter: impl MessageConverter + 'static) -> Self {
		self.converters.push(Arc::new(converter));
		self
	}

	pub fn with_service(mut self, service: impl ConversionService + 'static) -> Self {
		self.service = Some(Arc::new(service));
		self
	}

	/// Adapts `payload` to `target`.
	///
	/// Payloads that already satisfy `target` are returned untouched. Otherwise
	/// the first converter negotiating `content_type` that accepts the payload
	/// wins; failing that, the conversion service is asked.
	pub fn convert(
		&self,
		payload: Payload,
		content_type: Option<&MimeType>,
		target: &ElementType,
	) -> Result<Payload, ConversionError> {
		if target.accepts(&payload) {
			return Ok(payload);
		}

		if let Some(content_type) = content_type
			&& let Some(converter) = self
				.converters
				.iter()
				.find(|c| c.supports(content_type) && c.can_convert_from(&payload, target))
		{
			tracing::trace!(%content_type, %target, "negotiated payload conversion");
			return converter.convert_from(payload, content_type, target);
		}

		let source = payload.element_type();
		match &self.service {
			Some(service) if service.can_convert(&source, target) => {
				tracing::trace!(%source, %target, "scalar payload conversion");
				service.convert(payload, target)
			}
			_ => Err(ConversionError::Unsupported {
				from: source,
				to: target.clone(),
				content_type: content_type.cloned(),
			}),
		}
	}

	/// Static check used while resolving compositions.
	///
	/// Optimistic where the answer depends on a content type only known at call time.
	pub fn can_convert(&self, source: &ElementType, target: &ElementType) -> bool {
		if source.is_foreign() || target.is_foreign() {
			return false;
		}
		target.is_assignable_from(source)
			|| self.converters.iter().any(|c| c.can_convert_to(target))
			|| self.service.as_ref().is_some_and(|s| s.can_convert(source, target))
	}
}

impl fmt::Debug for ConversionFacade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConversionFacade")
			.field("converters", &self.converters.len())
			.field("service", &self.service.is_some())
			.finish()
	}
}
