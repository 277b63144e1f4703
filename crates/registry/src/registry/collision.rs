//! Alias collision vocabulary.

use serde::Deserialize;

/// How an alias already bound to a different registration is settled.
///
/// An alias held by a previous registration with the same primary name is
/// always rebound, whatever the policy. That registration keeps its other
/// aliases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Fail the whole registration; nothing is published.
	Reject,
	/// Keep the existing binding; the incoming alias is dropped.
	FirstWins,
	/// Move the alias to the incoming registration.
	#[default]
	LastWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Existing binding kept; incoming dropped.
	KeptExisting,
	/// Existing binding replaced by incoming.
	ReplacedExisting,
}

/// Record of one alias clash, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	pub alias: String,
	/// Primary name of the registration that held the alias.
	pub existing: String,
	/// Primary name of the registration that asked for it.
	pub incoming: String,
	pub resolution: Resolution,
}
