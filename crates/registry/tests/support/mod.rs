//! Conversion collaborators standing in for the host framework's converters.

use fncat_invocation::{
	ConversionError, ConversionFacade, ConversionService, ElementType, MessageConverter, MimeType, Payload, Record,
};

/// Installs a fmt subscriber once per test binary.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Converters and conversion service wired the way a host application would.
pub fn conversion() -> ConversionFacade {
	ConversionFacade::new()
		.with_converter(JsonConverter::new())
		.with_converter(PersonConverter::new())
		.with_converter(TextConverter::new())
		.with_service(ScalarService)
}

/// Parses JSON text or bytes into payloads.
pub struct JsonConverter {
	types: Vec<MimeType>,
}

impl JsonConverter {
	pub fn new() -> Self {
		Self {
			types: vec![MimeType::json(), MimeType::new("application", "*+json")],
		}
	}
}

impl MessageConverter for JsonConverter {
	fn supported_types(&self) -> &[MimeType] {
		&self.types
	}

	fn can_convert_from(&self, payload: &Payload, _: &ElementType) -> bool {
		matches!(payload, Payload::Text(_) | Payload::Bytes(_))
	}

	fn convert_from(
		&self,
		payload: Payload,
		content_type: &MimeType,
		target: &ElementType,
	) -> Result<Payload, ConversionError> {
		let parsed: Result<serde_json::Value, _> = match &payload {
			Payload::Text(text) => serde_json::from_str(text),
			Payload::Bytes(bytes) => serde_json::from_slice(bytes),
			other => {
				return Err(ConversionError::Unsupported {
					from: other.element_type(),
					to: target.clone(),
					content_type: Some(content_type.clone()),
				});
			}
		};
		let value = parsed.map_err(|err| ConversionError::Malformed {
			content_type: content_type.clone(),
			reason: err.to_string(),
		})?;

		let converted = from_json(value);
		if target.accepts(&converted) {
			Ok(converted)
		} else {
			Err(ConversionError::Failed {
				from: converted.element_type(),
				to: target.clone(),
				reason: "JSON document does not match the declared type".to_owned(),
			})
		}
	}

	fn can_convert_to(&self, target: &ElementType) -> bool {
		!matches!(target, ElementType::Unit)
	}
}

fn from_json(value: serde_json::Value) -> Payload {
	use serde_json::Value;

	match value {
		Value::Null => Payload::Null,
		Value::Bool(b) => Payload::Bool(b),
		Value::Number(n) => match n.as_i64() {
			Some(i) => Payload::Int(i),
			None => Payload::Float(n.as_f64().unwrap_or(f64::NAN)),
		},
		Value::String(s) => Payload::Text(s),
		Value::Array(items) => Payload::List(items.into_iter().map(from_json).collect()),
		Value::Object(fields) => Payload::Record(fields.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
	}
}

/// `text/person`: wraps text into a `{ name }` record.
pub struct PersonConverter {
	types: Vec<MimeType>,
}

impl PersonConverter {
	pub fn new() -> Self {
		Self {
			types: vec![MimeType::new("text", "person")],
		}
	}
}

impl MessageConverter for PersonConverter {
	fn supported_types(&self) -> &[MimeType] {
		&self.types
	}

	fn can_convert_from(&self, payload: &Payload, target: &ElementType) -> bool {
		*target == ElementType::Record && payload.as_text().is_some()
	}

	fn convert_from(&self, payload: Payload, _: &MimeType, _: &ElementType) -> Result<Payload, ConversionError> {
		let mut person = Record::new();
		person.insert("name".to_owned(), payload);
		Ok(Payload::Record(person))
	}

	fn can_convert_to(&self, target: &ElementType) -> bool {
		*target == ElementType::Record
	}
}

/// `text/plain`: decodes UTF-8 bytes.
pub struct TextConverter {
	types: Vec<MimeType>,
}

impl TextConverter {
	pub fn new() -> Self {
		Self {
			types: vec![MimeType::new("text", "*")],
		}
	}
}

impl MessageConverter for TextConverter {
	fn supported_types(&self) -> &[MimeType] {
		&self.types
	}

	fn can_convert_from(&self, payload: &Payload, target: &ElementType) -> bool {
		*target == ElementType::Text && matches!(payload, Payload::Bytes(_))
	}

	fn convert_from(
		&self,
		payload: Payload,
		content_type: &MimeType,
		_: &ElementType,
	) -> Result<Payload, ConversionError> {
		match payload {
			Payload::Bytes(bytes) => String::from_utf8(bytes)
				.map(Payload::Text)
				.map_err(|err| ConversionError::Malformed {
					content_type: content_type.clone(),
					reason: err.to_string(),
				}),
			other => Ok(other),
		}
	}

	fn can_convert_to(&self, target: &ElementType) -> bool {
		*target == ElementType::Text
	}
}

/// Scalar coercions between numbers, booleans and text.
pub struct ScalarService;

impl ConversionService for ScalarService {
	fn can_convert(&self, source: &ElementType, target: &ElementType) -> bool {
		use ElementType::{Bool, Float, Int, Text};

		matches!(
			(source, target),
			(Int | Float | Bool, Text) | (Text, Int | Float | Bool) | (Int, Float)
		)
	}

	fn convert(&self, payload: Payload, target: &ElementType) -> Result<Payload, ConversionError> {
		let failed = |payload: &Payload, reason: String| ConversionError::Failed {
			from: payload.element_type(),
			to: target.clone(),
			reason,
		};
		match (payload, target) {
			(Payload::Int(i), ElementType::Text) => Ok(Payload::Text(i.to_string())),
			(Payload::Float(f), ElementType::Text) => Ok(Payload::Text(f.to_string())),
			(Payload::Bool(b), ElementType::Text) => Ok(Payload::Text(b.to_string())),
			(Payload::Int(i), ElementType::Float) => Ok(Payload::Float(i as f64)),
			(Payload::Text(s), ElementType::Int) => s
				.trim()
				.parse()
				.map(Payload::Int)
				.map_err(|err: std::num::ParseIntError| failed(&Payload::Text(s.clone()), err.to_string())),
			(Payload::Text(s), ElementType::Float) => s
				.trim()
				.parse()
				.map(Payload::Float)
				.map_err(|err: std::num::ParseFloatError| failed(&Payload::Text(s.clone()), err.to_string())),
			(Payload::Text(s), ElementType::Bool) => s
				.trim()
				.parse()
				.map(Payload::Bool)
				.map_err(|err: std::str::ParseBoolError| failed(&Payload::Text(s.clone()), err.to_string())),
			(other, _) => Err(failed(&other, "unsupported scalar conversion".to_owned())),
		}
	}
}
