//! Immutable alias snapshot.
//!
//! # Invariants
//!
//! - Every table entry is reachable by at least one alias; unreachable
//!   registrations are compacted away when a snapshot is extended.
//! - Every alias maps to exactly one table index.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::collision::{Collision, DuplicatePolicy, Resolution};
use crate::{FunctionRegistration, RegisterError};

pub(crate) struct Snapshot {
	pub(crate) table: Arc<[Arc<FunctionRegistration>]>,
	pub(crate) by_alias: Arc<FxHashMap<String, u32>>,
	pub(crate) collisions: Arc<[Collision]>,
}

impl Snapshot {
	pub(crate) fn empty() -> Self {
		Self {
			table: Arc::from(Vec::new()),
			by_alias: Arc::new(FxHashMap::default()),
			collisions: Arc::from(Vec::new()),
		}
	}

	#[inline]
	pub(crate) fn get(&self, alias: &str) -> Option<&Arc<FunctionRegistration>> {
		let idx = *self.by_alias.get(alias)?;
		self.table.get(idx as usize)
	}

	/// Returns the registration if it is the only one.
	pub(crate) fn sole(&self) -> Option<&Arc<FunctionRegistration>> {
		match &*self.table {
			[only] => Some(only),
			_ => None,
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.table.len()
	}

	/// Builds the successor snapshot with `incoming` published under its aliases.
	pub(crate) fn extend(&self, incoming: Arc<FunctionRegistration>, policy: DuplicatePolicy) -> Result<Self, RegisterError> {
		let mut by_alias: FxHashMap<String, u32> = (*self.by_alias).clone();
		let mut collisions = self.collisions.to_vec();

		let incoming_idx = u32_index(self.table.len(), "incoming");
		let mut claimed = false;
		for alias in incoming.aliases() {
			let Some(&existing_idx) = by_alias.get(alias) else {
				by_alias.insert(alias.clone(), incoming_idx);
				claimed = true;
				continue;
			};
			let existing = &self.table[existing_idx as usize];
			// Same primary name: only the shared alias moves; the old entry keeps the rest.
			if existing.name() == incoming.name() {
				tracing::debug!(alias = %alias, function = incoming.name(), "rebinding alias to re-registered function");
				by_alias.insert(alias.clone(), incoming_idx);
				claimed = true;
				continue;
			}
			let resolution = match policy {
				DuplicatePolicy::Reject => {
					return Err(RegisterError::AliasTaken {
						alias: alias.clone(),
						owner: existing.name().to_owned(),
					});
				}
				DuplicatePolicy::FirstWins => Resolution::KeptExisting,
				DuplicatePolicy::LastWins => Resolution::ReplacedExisting,
			};
			tracing::warn!(
				alias = %alias,
				existing = existing.name(),
				incoming = incoming.name(),
				?resolution,
				"function alias collision"
			);
			if resolution == Resolution::ReplacedExisting {
				by_alias.insert(alias.clone(), incoming_idx);
				claimed = true;
			}
			collisions.push(Collision {
				alias: alias.clone(),
				existing: existing.name().to_owned(),
				incoming: incoming.name().to_owned(),
				resolution,
			});
		}

		let mut table = self.table.to_vec();
		if claimed {
			table.push(incoming);
		} else {
			tracing::warn!(function = incoming.name(), "every alias is taken; registration is unreachable");
		}
		let table = compact(table, &mut by_alias);

		Ok(Self {
			table: Arc::from(table),
			by_alias: Arc::new(by_alias),
			collisions: Arc::from(collisions),
		})
	}
}

/// Drops registrations no alias points to and renumbers the survivors.
fn compact(table: Vec<Arc<FunctionRegistration>>, by_alias: &mut FxHashMap<String, u32>) -> Vec<Arc<FunctionRegistration>> {
	let mut live = vec![false; table.len()];
	for &idx in by_alias.values() {
		live[idx as usize] = true;
	}

	let mut remap = vec![u32::MAX; table.len()];
	let mut kept = Vec::with_capacity(table.len());
	for (idx, registration) in table.into_iter().enumerate() {
		if live[idx] {
			remap[idx] = u32_index(kept.len(), "compact");
			kept.push(registration);
		} else {
			tracing::debug!(function = registration.name(), "dropping unreachable registration");
		}
	}

	for idx in by_alias.values_mut() {
		*idx = remap[*idx as usize];
	}
	kept
}

/// Safely converts a `usize` index to `u32` for registry storage.
///
/// # Panics
///
/// Panics if `idx` exceeds `u32::MAX`.
fn u32_index(idx: usize, what: &'static str) -> u32 {
	u32::try_from(idx).unwrap_or_else(|_| panic!("{} index overflow: {}", what, idx))
}
