//! Target type system for lowered operations.
//!
//! - `Primitive`: unboxed scalar values
//! - `Known`: runtime and standard-library classes the generated client uses
//! - `Wrapper`: generic containers (`Observable<T>`, `Page<T>`, ...)
//! - `IrType`: the full type tree, with structural equality
//!
//! Types serialize as their rendered text (see [`Emit`]).

use serde::{Serialize, Serializer};

use super::emit::Emit;

/// Unboxed scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `void`
    Void,
    /// `boolean`
    Boolean,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `double`
    Double,
    /// `long` holding seconds since the epoch.
    UnixTimeLong,
}

impl Primitive {
    /// The boxed counterpart used where `null` is allowed.
    pub fn boxed(self) -> Known {
        match self {
            Primitive::Void => Known::Void,
            Primitive::Boolean => Known::Boolean,
            Primitive::Int => Known::Integer,
            Primitive::Long => Known::Long,
            Primitive::Double => Known::Double,
            Primitive::UnixTimeLong => Known::UnixTimeLong,
        }
    }
}

/// Well-known classes referenced by generated signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Known {
    /// `Object`
    Object,
    /// `String`
    String,
    /// `Void`
    Void,
    /// `Boolean`
    Boolean,
    /// `Integer`
    Integer,
    /// `Long`
    Long,
    /// `Double`
    Double,
    /// `BigDecimal`
    BigDecimal,
    /// `OffsetDateTime`
    DateTime,
    /// `LocalDate`
    LocalDate,
    /// `DateTimeRfc1123`
    DateTimeRfc1123,
    /// `Duration`
    Duration,
    /// `UUID`
    Uuid,
    /// `Base64Url`
    Base64Url,
    /// `UnixTime`
    UnixTime,
    /// Boxed `Long` holding seconds since the epoch.
    UnixTimeLong,
    /// `OffsetDateTime` carried as unix time on the wire.
    UnixTimeDateTime,
    /// `ByteBuffer`
    ByteBuffer,
    /// `ServiceClientCredentials`
    ServiceClientCredentials,
    /// `AzureTokenCredentials`
    AzureTokenCredentials,
    /// `StreamResponse`
    StreamResponse,
    /// `VoidResponse`
    VoidResponse,
    /// `CloudException`
    CloudException,
    /// `RestException`
    RestException,
    /// `OperationDescription`
    OperationDescription,
    /// `Completable`
    Completable,
}

impl Known {
    /// Simple class name.
    pub fn name(self) -> &'static str {
        match self {
            Known::Object => "Object",
            Known::String => "String",
            Known::Void => "Void",
            Known::Boolean => "Boolean",
            Known::Integer => "Integer",
            Known::Long | Known::UnixTimeLong => "Long",
            Known::Double => "Double",
            Known::BigDecimal => "BigDecimal",
            Known::DateTime | Known::UnixTimeDateTime => "OffsetDateTime",
            Known::LocalDate => "LocalDate",
            Known::DateTimeRfc1123 => "DateTimeRfc1123",
            Known::Duration => "Duration",
            Known::Uuid => "UUID",
            Known::Base64Url => "Base64Url",
            Known::UnixTime => "UnixTime",
            Known::ByteBuffer => "ByteBuffer",
            Known::ServiceClientCredentials => "ServiceClientCredentials",
            Known::AzureTokenCredentials => "AzureTokenCredentials",
            Known::StreamResponse => "StreamResponse",
            Known::VoidResponse => "VoidResponse",
            Known::CloudException => "CloudException",
            Known::RestException => "RestException",
            Known::OperationDescription => "OperationDescription",
            Known::Completable => "Completable",
        }
    }
}

/// A generated class: package plus simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    /// Fully qualified package.
    pub package: String,
    /// Simple class name.
    pub name: String,
}

impl ClassRef {
    /// Create a class reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

/// Generic containers from the client runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    /// Reactive stream of values.
    Observable,
    /// Reactive single value.
    Single,
    /// Reactive optional value.
    Maybe,
    /// Back-pressured reactive stream.
    Flowable,
    /// Status update of a long-running operation.
    OperationStatus,
    /// One page of a paged result.
    Page,
    /// Lazily fetched list across all pages.
    PagedList,
    /// Response envelope carrying a deserialized body.
    BodyResponse,
    /// Cancellable future.
    ServiceFuture,
    /// Completion callback.
    ServiceCallback,
}

impl Wrapper {
    /// Simple class name.
    pub fn name(self) -> &'static str {
        match self {
            Wrapper::Observable => "Observable",
            Wrapper::Single => "Single",
            Wrapper::Maybe => "Maybe",
            Wrapper::Flowable => "Flowable",
            Wrapper::OperationStatus => "OperationStatus",
            Wrapper::Page => "Page",
            Wrapper::PagedList => "PagedList",
            Wrapper::BodyResponse => "BodyResponse",
            Wrapper::ServiceFuture => "ServiceFuture",
            Wrapper::ServiceCallback => "ServiceCallback",
        }
    }
}

/// A resolved target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    /// Unboxed scalar.
    Primitive(Primitive),
    /// Runtime or standard-library class.
    Known(Known),
    /// Generated model class.
    Class(ClassRef),
    /// Generated enum.
    Enum(ClassRef),
    /// `byte[]`
    ByteArray,
    /// `List<T>`
    List(Box<IrType>),
    /// `Map<String, T>`
    Map(Box<IrType>),
    /// Runtime generic container.
    Generic {
        /// Container.
        base: Wrapper,
        /// Type arguments.
        args: Vec<IrType>,
    },
    /// Generated page container parameterized by its element type.
    PageImpl {
        /// Page container class.
        class: ClassRef,
        /// Element type.
        element: Box<IrType>,
    },
}

impl IrType {
    /// `List<T>`; element primitives are boxed.
    pub fn list(element: IrType) -> Self {
        IrType::List(Box::new(element.as_nullable()))
    }

    /// `Map<String, T>`; value primitives are boxed.
    pub fn map(value: IrType) -> Self {
        IrType::Map(Box::new(value.as_nullable()))
    }

    /// Apply a single-argument wrapper; the argument is boxed.
    pub fn wrap(base: Wrapper, arg: IrType) -> Self {
        IrType::Generic {
            base,
            args: vec![arg.as_nullable()],
        }
    }

    /// `Flowable<ByteBuffer>`, the raw byte stream type.
    pub fn byte_stream() -> Self {
        Self::wrap(Wrapper::Flowable, IrType::Known(Known::ByteBuffer))
    }

    /// The empty body.
    pub fn void() -> Self {
        IrType::Primitive(Primitive::Void)
    }

    /// Whether this is the unboxed empty body.
    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Primitive(Primitive::Void))
    }

    /// Element type if this is a `List`.
    pub fn list_element(&self) -> Option<&IrType> {
        match self {
            IrType::List(element) => Some(element),
            _ => None,
        }
    }

    /// The type used where `null` is a legal value.
    pub fn as_nullable(&self) -> IrType {
        match self {
            IrType::Primitive(p) => IrType::Known(p.boxed()),
            other => other.clone(),
        }
    }

    /// Whether `needle` occurs anywhere in this type tree, including itself.
    pub fn contains(&self, needle: &IrType) -> bool {
        if self == needle {
            return true;
        }
        match self {
            IrType::List(inner) | IrType::Map(inner) => inner.contains(needle),
            IrType::Generic { args, .. } => args.iter().any(|arg| arg.contains(needle)),
            IrType::PageImpl { element, .. } => element.contains(needle),
            IrType::Primitive(_)
            | IrType::Known(_)
            | IrType::Class(_)
            | IrType::Enum(_)
            | IrType::ByteArray => false,
        }
    }

    /// Replace wire-only representations with what callers see.
    ///
    /// Base64-url becomes `byte[]`; RFC1123 and unix-time values become
    /// date-times. Applied recursively.
    pub fn to_client(&self) -> IrType {
        match self {
            IrType::Known(Known::Base64Url) => IrType::ByteArray,
            IrType::Primitive(Primitive::UnixTimeLong)
            | IrType::Known(
                Known::DateTimeRfc1123
                | Known::UnixTime
                | Known::UnixTimeLong
                | Known::UnixTimeDateTime,
            ) => IrType::Known(Known::DateTime),
            IrType::List(inner) => IrType::List(Box::new(inner.to_client())),
            IrType::Map(inner) => IrType::Map(Box::new(inner.to_client())),
            IrType::Generic { base, args } => IrType::Generic {
                base: *base,
                args: args.iter().map(IrType::to_client).collect(),
            },
            IrType::PageImpl { class, element } => IrType::PageImpl {
                class: class.clone(),
                element: Box::new(element.to_client()),
            },
            other => other.clone(),
        }
    }
}

impl Serialize for IrType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.emit())
    }
}
