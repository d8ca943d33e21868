//! Normalized description model for REST operations.
//!
//! These structs are what an upstream parser produces after all source-format
//! corner cases are resolved. They derive `Deserialize` so a description can
//! be loaded from JSON, and are otherwise treated as read-only input by the
//! lowering pipeline.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Upper-case wire spelling of the verb.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// Where a parameter is bound on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Substituted into the URL template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Serialized as the request body.
    Body,
    /// Sent as a multipart form field.
    FormData,
    /// Not bound to the request at all.
    None,
}

/// Primitive kinds a description can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KnownPrimitive {
    /// No value (empty body).
    None,
    /// Boolean flag.
    Boolean,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Double-precision float.
    Double,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Text.
    String,
    /// Calendar date.
    Date,
    /// ISO-8601 date-time.
    DateTime,
    /// RFC1123 date-time (transcoded at the boundary).
    DateTimeRfc1123,
    /// Base64-url encoded bytes (transcoded at the boundary).
    Base64Url,
    /// Seconds since the epoch as an integer (transcoded at the boundary).
    UnixTime,
    /// Raw bytes held in memory.
    ByteArray,
    /// Raw byte stream.
    Stream,
    /// UUID.
    Uuid,
    /// ISO-8601 duration.
    Duration,
    /// Untyped value.
    Object,
    /// Service credentials.
    Credentials,
}

/// A sequence (array) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceType {
    /// Element type.
    pub element: Box<ModelType>,
    /// Page-container class bound to this sequence when it is returned by a
    /// paged operation.
    #[serde(default)]
    pub page_impl: Option<String>,
    /// XML element name, used to name body wrappers under XML serialization.
    #[serde(default)]
    pub xml_name: Option<String>,
}

/// A named structural (object) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeType {
    /// Declared model name.
    pub name: String,
    /// Whether this is an inner (implementation) model under fluent conventions.
    #[serde(default)]
    pub inner: bool,
    /// Explicit name-override annotation.
    #[serde(default)]
    pub name_override: Option<String>,
}

/// A type as declared by the description model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModelType {
    /// Primitive value.
    Primitive {
        /// Which primitive.
        primitive: KnownPrimitive,
    },
    /// Named enumeration.
    Enum {
        /// Declared enum name.
        name: String,
    },
    /// Array of elements.
    Sequence(SequenceType),
    /// String-keyed map.
    Dictionary {
        /// Value type.
        value: Box<ModelType>,
    },
    /// Named object.
    Composite(CompositeType),
}

impl ModelType {
    /// Shorthand for a primitive type.
    pub fn primitive(primitive: KnownPrimitive) -> Self {
        ModelType::Primitive { primitive }
    }

    /// The empty type.
    pub fn none() -> Self {
        Self::primitive(KnownPrimitive::None)
    }

    /// A sequence of `element` with no page binding.
    pub fn sequence(element: ModelType) -> Self {
        ModelType::Sequence(SequenceType {
            element: Box::new(element),
            page_impl: None,
            xml_name: None,
        })
    }

    /// A sequence of `element` bound to the page container `page_impl`.
    pub fn paged_sequence(element: ModelType, page_impl: impl Into<String>) -> Self {
        ModelType::Sequence(SequenceType {
            element: Box::new(element),
            page_impl: Some(page_impl.into()),
            xml_name: None,
        })
    }

    /// A plain (non-inner) composite named `name`.
    pub fn composite(name: impl Into<String>) -> Self {
        ModelType::Composite(CompositeType {
            name: name.into(),
            inner: false,
            name_override: None,
        })
    }

    /// Whether this is the raw byte stream primitive.
    pub fn is_stream(&self) -> bool {
        matches!(
            self,
            ModelType::Primitive {
                primitive: KnownPrimitive::Stream
            }
        )
    }
}

/// Link from a parameter to a property shared on the service client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProperty {
    /// Property name as declared on the client.
    #[serde(default)]
    pub name: String,
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Declared parameter name.
    pub name: String,
    /// Wire location.
    pub location: ParameterLocation,
    /// Name used on the wire; defaults to `name`.
    #[serde(default)]
    pub serialized_name: Option<String>,
    /// Declared type.
    #[serde(rename = "type")]
    pub model_type: ModelType,
    /// Whether callers must supply a value.
    #[serde(default)]
    pub required: bool,
    /// Whether the value is a constant baked into the call.
    #[serde(default)]
    pub constant: bool,
    /// Whether `null` is a meaningful value.
    #[serde(default)]
    pub nullable: bool,
    /// Shared client property this parameter is sourced from.
    #[serde(default)]
    pub client_property: Option<ClientProperty>,
    /// Whether the value is sent without URL encoding.
    #[serde(default)]
    pub skip_url_encoding: bool,
    /// Prefix for map-valued header collections.
    #[serde(default)]
    pub header_collection_prefix: Option<String>,
    /// Documentation text.
    #[serde(default)]
    pub documentation: Option<String>,
}

impl Parameter {
    /// An optional, non-constant parameter with no documentation.
    pub fn new(name: impl Into<String>, location: ParameterLocation, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            location,
            serialized_name: None,
            model_type,
            required: false,
            constant: false,
            nullable: false,
            client_property: None,
            skip_url_encoding: false,
            header_collection_prefix: None,
            documentation: None,
        }
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the parameter as a constant.
    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }

    /// Mark the parameter as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Override the wire name.
    pub fn serialized_as(mut self, serialized_name: impl Into<String>) -> Self {
        self.serialized_name = Some(serialized_name.into());
        self
    }

    /// Source the parameter from a shared client property.
    pub fn from_client_property(mut self, property: impl Into<String>) -> Self {
        self.client_property = Some(ClientProperty {
            name: property.into(),
        });
        self
    }

    /// Attach documentation.
    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Name used on the wire.
    pub fn serialized_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether this parameter is a shared client property.
    pub fn is_client_property(&self) -> bool {
        self.client_property.is_some()
    }
}

/// A response shape: body plus optional header bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Body type; `None` means no body.
    #[serde(default)]
    pub body: Option<ModelType>,
    /// Header binding type, when the response declares typed headers.
    #[serde(default)]
    pub headers: Option<ModelType>,
}

/// Convention markers attached to an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConventionFlags {
    /// The operation returns pages of items.
    pub pageable: bool,
    /// The operation is the paired "fetch next page" operation.
    pub next_link_method: bool,
    /// Completion is polled after initial acceptance.
    pub long_running: bool,
    /// The operation can be re-attached from a persisted handle.
    pub resumable: bool,
}

impl ConventionFlags {
    /// Whether the operation is paged, explicitly or via a next-link marker.
    pub fn is_paged(self) -> bool {
        self.pageable || self.next_link_method
    }
}

fn default_content_type() -> String {
    "application/json; charset=utf-8".to_string()
}

/// A normalized REST operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescription {
    /// Declared operation name.
    pub name: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// URL template, e.g. `/subscriptions/{subscriptionId}/providers/...`.
    pub url: String,
    /// Declared parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Declared responses by status code.
    #[serde(default)]
    pub responses: BTreeMap<u16, Response>,
    /// The response callers receive.
    #[serde(default)]
    pub returns: Response,
    /// The default (error) response.
    #[serde(default)]
    pub default_response: Response,
    /// Convention markers.
    #[serde(default)]
    pub flags: ConventionFlags,
    /// One-line summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Request content type.
    #[serde(default = "default_content_type")]
    pub request_content_type: String,
}

impl OperationDescription {
    /// A bare operation with no parameters or responses.
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            parameters: Vec::new(),
            responses: BTreeMap::new(),
            returns: Response::default(),
            default_response: Response::default(),
            flags: ConventionFlags::default(),
            summary: None,
            description: None,
            request_content_type: default_content_type(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare a success response carrying `body` and use it as the return body.
    pub fn returning(mut self, status: u16, body: ModelType) -> Self {
        self.responses.insert(
            status,
            Response {
                body: Some(body.clone()),
                headers: None,
            },
        );
        self.returns.body = Some(body);
        self
    }

    /// Declare a body-less response.
    pub fn responding(mut self, status: u16) -> Self {
        self.responses.insert(status, Response::default());
        self
    }

    /// Declare the error body.
    pub fn with_error(mut self, body: ModelType) -> Self {
        self.default_response.body = Some(body);
        self
    }

    /// Replace the convention flags.
    pub fn with_flags(mut self, flags: ConventionFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Sibling operations sharing one naming scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodGroup {
    /// Group name; empty for operations hosted directly on the client.
    #[serde(default)]
    pub name: String,
    /// Operations in declaration order.
    #[serde(default)]
    pub operations: Vec<OperationDescription>,
    /// Identifiers already taken in the group's scope.
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl MethodGroup {
    /// Build a group, rejecting duplicate operation names.
    pub fn new(
        name: impl Into<String>,
        operations: Vec<OperationDescription>,
    ) -> Result<Self, ModelError> {
        let group = Self {
            name: name.into(),
            operations,
            identifiers: Vec::new(),
        };
        group.validate()?;
        Ok(group)
    }

    /// Check that operation names are unique (case-insensitive).
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for op in &self.operations {
            if !seen.insert(op.name.to_ascii_lowercase()) {
                return Err(ModelError::DuplicateOperation {
                    group: self.name.clone(),
                    operation: op.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether the group has a name.
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A whole service: every method group the generator should lower.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    /// Method groups.
    #[serde(default)]
    pub groups: Vec<MethodGroup>,
}

/// Questions the lowering pipeline asks of the description model.
pub trait DescriptionModel: fmt::Debug + Send + Sync {
    /// Whether the URL segments describe a top-level resource.
    fn is_top_level_resource_url(&self, segments: &[&str]) -> bool;

    /// Whether a response body counts as a sequence for list classification.
    fn is_sequence_type(&self, ty: &ModelType) -> bool;

    /// Convert a wire-level type into the type exposed to callers.
    fn to_client_type(&self, ty: &ModelType) -> ModelType;
}

/// Default description model following the ARM URL conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardModel;

impl DescriptionModel for StandardModel {
    /// `subscriptions/{id}/resourceGroups/{rg}/providers/{ns}/{type}/{name}`
    fn is_top_level_resource_url(&self, segments: &[&str]) -> bool {
        segments.len() == 8
            && segments[0].eq_ignore_ascii_case("subscriptions")
            && segments[2].eq_ignore_ascii_case("resourceGroups")
            && segments[4].eq_ignore_ascii_case("providers")
    }

    fn is_sequence_type(&self, ty: &ModelType) -> bool {
        matches!(ty, ModelType::Sequence(_))
    }

    fn to_client_type(&self, ty: &ModelType) -> ModelType {
        match ty {
            ModelType::Primitive { primitive } => match primitive {
                KnownPrimitive::Base64Url => ModelType::primitive(KnownPrimitive::ByteArray),
                KnownPrimitive::DateTimeRfc1123 | KnownPrimitive::UnixTime => {
                    ModelType::primitive(KnownPrimitive::DateTime)
                }
                _ => ty.clone(),
            },
            ModelType::Sequence(seq) => ModelType::Sequence(SequenceType {
                element: Box::new(self.to_client_type(&seq.element)),
                page_impl: seq.page_impl.clone(),
                xml_name: seq.xml_name.clone(),
            }),
            ModelType::Dictionary { value } => ModelType::Dictionary {
                value: Box::new(self.to_client_type(value)),
            },
            ModelType::Enum { .. } | ModelType::Composite(_) => ty.clone(),
        }
    }
}
