//! Intermediate representation produced by lowering.
//!
//! Two layers:
//! 1. Types: the target type system (`IrType`) and its rendering via `Emit`
//! 2. API: the lowered operation (`RestCallDescriptor`, `MethodVariant`)
//!
//! Nothing here knows how the IR is computed; see the crate root for the
//! pipeline.

pub mod api;
pub mod emit;
pub mod types;

pub use api::{
    LoweredOperation, MethodParameter, MethodVariant, OperationCategory, RestCallDescriptor,
    RestParameter, ReturnValue, TranscodeTag, VariantKind,
};
pub use emit::Emit;
pub use types::{ClassRef, IrType, Known, Primitive, Wrapper};
