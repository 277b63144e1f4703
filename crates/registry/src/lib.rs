//! Runtime function catalog.
//!
//! Functions are registered under one or more aliases and resolved, at call
//! time, from a textual definition such as `"uppercase|reverse"` into a single
//! [`InvocationWrapper`].
//!
//! # Mental Model
//!
//! 1. **Registration:** [`FunctionRegistration`] captures a callable and its
//!    [`FunctionType`](fncat_invocation::FunctionType), derived once from the
//!    Rust signature or supplied explicitly.
//! 2. **Publication:** [`FunctionRegistry::register`] builds a new alias
//!    snapshot and swaps it in atomically; readers never block.
//! 3. **Resolution:** [`FunctionRegistry::lookup`] (relaxed) and
//!    [`FunctionRegistry::lookup_strict`] parse the definition, resolve each
//!    segment and validate every junction before any function runs.
//! 4. **Invocation:** [`InvocationWrapper::apply`] adapts sequences, envelopes
//!    and element types around each stage, delegating conversion to the
//!    injected [`ConversionFacade`](fncat_invocation::ConversionFacade).
//!
//! # Concurrency
//!
//! - **Reads and resolution:** wait-free snapshot loads; each lookup builds a fresh wrapper.
//! - **Writes:** linearizable compare-and-swap loop.
//! - **Invocation:** wrappers are immutable and may be applied concurrently.

pub mod config;
pub mod error;
pub mod registration;
pub mod registry;
pub mod resolver;
pub mod wrapper;

pub use config::{CatalogConfig, ConfigError};
pub use error::{RegisterError, ResolveError};
pub use registration::{FunctionRegistration, Invocable};
pub use registry::{Collision, DuplicatePolicy, FunctionRegistry, Resolution};
pub use resolver::{CompositionSpec, LookupMode};
pub use wrapper::{InvocationWrapper, OutputContract};

// Only the integration tests under `tests/` use these.
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tracing_subscriber as _;
