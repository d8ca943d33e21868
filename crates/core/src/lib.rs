//! Lowering of normalized REST operations.
//!
//! Given one operation from the description model, the pipeline produces a
//! canonical wire-level [`RestCallDescriptor`] and the full set of
//! caller-visible [`MethodVariant`]s:
//!
//! 1. `classify`: infer a well-known role from URL shape and resolve the name
//! 2. `resolve`: wire, client, page and exception types
//! 3. `params`: synthesize, override, order and derive wire parameters
//! 4. `descriptor`: assemble the call descriptor
//! 5. `variants`: expand the descriptor into method signatures
//! 6. `validate`: presence-check targets per overload
//!
//! [`GroupLowering`] drives the pipeline for a whole method group and memoizes
//! each stage per operation.
//!
//! ```ignore
//! let ctx = LoweringContext::new(Settings::default());
//! let lowering = GroupLowering::new(&ctx, &group)?;
//! for lowered in lowering.lower_all()? {
//!     println!("{}: {} variants", lowered.rest_call.name, lowered.variants.len());
//! }
//! ```

pub mod classify;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod group;
pub mod ir;
pub mod operation;
pub mod params;
pub mod resolve;
pub mod validate;
pub mod variants;

// Re-export the main entry points
pub use context::LoweringContext;
pub use error::LoweringError;
pub use group::GroupLowering;
pub use ir::{
    Emit, IrType, LoweredOperation, MethodParameter, MethodVariant, OperationCategory,
    RestCallDescriptor, RestParameter, ReturnValue, TranscodeTag, VariantKind,
};
pub use operation::OperationLowering;
