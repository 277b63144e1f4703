//! Canonical value and shape types shared by every catalog stage.
//!
//! A registered function sees its input and produces its output as one of four
//! shapes: a raw [`Payload`], an [`Envelope`] (payload plus ordered
//! [`Headers`]), or a sequence of either. [`FunctionType`] records which shape
//! each side declares so the catalog can adapt callers to callees without
//! re-inspecting anything per call.
//!
//! Conversion between element types is not implemented here. The
//! [`ConversionFacade`] only decides *when* to delegate to the injected
//! [`MessageConverter`]s and [`ConversionService`].

pub mod convert;
pub mod data;
pub mod element;
pub mod error;
pub mod function_type;
pub mod message;
pub mod payload;

pub use convert::{ConversionFacade, ConversionService, MessageConverter};
pub use data::{Data, Item, ItemStream, Sequence};
pub use element::{Element, ElementType};
pub use error::{ConversionError, FunctionError};
pub use function_type::{FunctionKind, FunctionType, Port};
pub use message::{CONTENT_TYPE, Envelope, Headers, Message, MimeType};
pub use payload::{Payload, Record};
