//! Shared description model and collaborator seams for opgen.
//!
//! This crate holds everything the lowering core consumes but does not own:
//! the normalized operation model, the generator settings, and the naming
//! services (casing and group-scoped uniqueness). Both the `opgen-core`
//! pipeline and the `opgen` CLI depend on it.

pub mod error;
pub mod model;
pub mod naming;
pub mod settings;

// Re-export commonly used types
pub use error::{ModelError, SettingsError};
pub use model::{
    ClientProperty, CompositeType, ConventionFlags, DescriptionModel, HttpMethod, KnownPrimitive,
    MethodGroup, ModelType, OperationDescription, Parameter, ParameterLocation, Response,
    SequenceType, ServiceDescription, StandardModel,
};
pub use naming::{DefaultNamer, NameScope, Namer, UniqueNames};
pub use settings::{Conventions, Settings};
