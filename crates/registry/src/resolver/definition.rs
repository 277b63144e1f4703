use crate::ResolveError;

/// Segment delimiter of composition expressions.
pub const DELIMITER: char = '|';

/// Parsed composition expression: ordered, trimmed, non-empty segment names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionSpec {
	segments: Vec<String>,
	open_ended: bool,
}

impl CompositionSpec {
	/// Splits `definition` on [`DELIMITER`].
	///
	/// A single empty trailing segment (`"words|"`) marks the composition as
	/// open-ended and is dropped. Any other empty segment is malformed. An
	/// expression without delimiter is a single segment, even when blank.
	pub fn parse(definition: &str) -> Result<Self, ResolveError> {
		let mut segments: Vec<String> = definition.split(DELIMITER).map(|s| s.trim().to_owned()).collect();
		if segments.len() == 1 {
			return Ok(Self {
				segments,
				open_ended: false,
			});
		}

		let open_ended = segments.last().is_some_and(String::is_empty);
		if open_ended {
			segments.pop();
		}
		if segments.iter().any(String::is_empty) {
			return Err(ResolveError::Malformed {
				definition: definition.to_owned(),
				reason: "only the last segment may be empty",
			});
		}
		Ok(Self { segments, open_ended })
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// True if the expression ended with an empty segment.
	pub fn is_open_ended(&self) -> bool {
		self.open_ended
	}

	/// True if the expression used the delimiter at all.
	pub fn is_composite(&self) -> bool {
		self.segments.len() > 1 || self.open_ended
	}

	/// Canonical textual form: segments joined without padding.
	pub fn definition(&self) -> String {
		let mut out = self.segments.join("|");
		if self.open_ended {
			out.push(DELIMITER);
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("upper", &["upper"], false)]
	#[case(" upper | rev ", &["upper", "rev"], false)]
	#[case("words|", &["words"], true)]
	#[case("a|b|c|", &["a", "b", "c"], true)]
	#[case("", &[""], false)]
	fn parses_segments(#[case] definition: &str, #[case] segments: &[&str], #[case] open_ended: bool) {
		let parsed = CompositionSpec::parse(definition).unwrap();
		assert_eq!(parsed.segments(), segments);
		assert_eq!(parsed.is_open_ended(), open_ended);
	}

	#[rstest]
	#[case("|")]
	#[case("a||b")]
	#[case("|a")]
	#[case("a| |b")]
	#[case("a||")]
	fn rejects_inner_empty_segments(#[case] definition: &str) {
		assert!(matches!(CompositionSpec::parse(definition), Err(ResolveError::Malformed { .. })));
	}

	#[test]
	fn canonical_definition_drops_padding() {
		assert_eq!(CompositionSpec::parse(" a | b |").unwrap().definition(), "a|b|");
		assert!(!CompositionSpec::parse("a").unwrap().is_composite());
		assert!(CompositionSpec::parse("a|").unwrap().is_composite());
	}
}
