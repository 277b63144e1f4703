//! Alias registry with atomic publication.
//!
//! # Concurrency
//!
//! - **Reads:** wait-free (atomic load of the current [`Snapshot`]).
//! - **Writes:** lock-free and linearizable: [`FunctionRegistry::register`]
//!   extends the loaded snapshot and publishes it with compare-and-swap,
//!   retrying when another writer won the race.
//!
//! Wrappers resolved from an older snapshot keep their targets alive through
//! `Arc`, so registering while invocations are in flight is safe.

mod collision;
mod snapshot;

use std::sync::Arc;

use arc_swap::ArcSwap;
use fncat_invocation::ConversionFacade;

pub use collision::{Collision, DuplicatePolicy, Resolution};
pub(crate) use snapshot::Snapshot;

use crate::resolver::{LookupMode, Resolver};
use crate::{CatalogConfig, FunctionRegistration, InvocationWrapper, RegisterError, ResolveError};

/// Catalog of registered functions.
pub struct FunctionRegistry {
	snap: ArcSwap<Snapshot>,
	conversion: Arc<ConversionFacade>,
	config: CatalogConfig,
}

impl FunctionRegistry {
	/// Creates an empty registry with default configuration.
	pub fn new(conversion: ConversionFacade) -> Self {
		Self::with_config(conversion, CatalogConfig::default())
	}

	pub fn with_config(conversion: ConversionFacade, config: CatalogConfig) -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::empty()),
			conversion: Arc::new(conversion),
			config,
		}
	}

	pub fn config(&self) -> &CatalogConfig {
		&self.config
	}

	/// Publishes `registration` under every one of its aliases.
	///
	/// Clashes with other registrations are settled by the configured
	/// [`DuplicatePolicy`] and recorded in [`FunctionRegistry::collisions`].
	pub fn register(&self, registration: FunctionRegistration) -> Result<(), RegisterError> {
		registration.validate()?;
		let incoming = Arc::new(registration);

		loop {
			let old = self.snap.load_full();
			let new_arc = Arc::new(old.extend(incoming.clone(), self.config.duplicate_policy)?);

			let prev = self.snap.compare_and_swap(&old, new_arc.clone());
			if Arc::ptr_eq(&prev, &old) {
				tracing::debug!(
					function = incoming.name(),
					aliases = ?incoming.aliases(),
					function_type = %incoming.function_type(),
					registrations = new_arc.len(),
					"registered function"
				);
				return Ok(());
			}
			// CAS failed, retry with updated snapshot
		}
	}

	/// Relaxed lookup.
	///
	/// Falls back to the only registration when the catalog holds exactly one
	/// and nothing matches; returns `Ok(None)` when a name cannot be resolved.
	/// Unsupported, incompatible and malformed definitions are still errors.
	pub fn lookup(&self, definition: &str) -> Result<Option<InvocationWrapper>, ResolveError> {
		self.resolver().resolve(definition, LookupMode::Relaxed)
	}

	/// Strict lookup: every name must match an alias exactly.
	pub fn lookup_strict(&self, definition: &str) -> Result<InvocationWrapper, ResolveError> {
		self.resolver()
			.resolve(definition, LookupMode::Strict)?
			.ok_or_else(|| ResolveError::DoesNotExist(definition.to_owned()))
	}

	/// Returns the raw registration bound to `alias`.
	pub fn registration(&self, alias: &str) -> Option<Arc<FunctionRegistration>> {
		self.snap.load().get(alias).cloned()
	}

	/// All aliases, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.snap.load().by_alias.keys().cloned().collect();
		names.sort_unstable();
		names
	}

	/// Number of reachable registrations.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Alias collisions recorded so far, oldest first.
	pub fn collisions(&self) -> Vec<Collision> {
		self.snap.load().collisions.to_vec()
	}

	fn resolver(&self) -> Resolver {
		Resolver {
			snap: self.snap.load_full(),
			conversion: self.conversion.clone(),
			contract: self.config.output_contract,
			default_definition: self.config.default_definition().map(str::to_owned),
		}
	}
}
