//! Catalog configuration.

use serde::Deserialize;

use crate::{DuplicatePolicy, OutputContract};

/// Catalog-wide settings, usually loaded from a `[catalog]`-style TOML document.
///
/// ```toml
/// duplicate-policy = "reject"
/// output-contract = "auto"
/// definition = "uppercase|reverse"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CatalogConfig {
	/// How alias clashes between distinct registrations are settled.
	pub duplicate_policy: DuplicatePolicy,
	/// Output shape applied to every resolved wrapper.
	pub output_contract: OutputContract,
	/// Definition resolved when a lookup is given an empty identifier.
	pub definition: Option<String>,
}

impl CatalogConfig {
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Returns the configured default definition, ignoring blank values.
	pub(crate) fn default_definition(&self) -> Option<&str> {
		self.definition.as_deref().map(str::trim).filter(|d| !d.is_empty())
	}
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
