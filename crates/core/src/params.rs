//! Parameter pipeline: synthesis, overrides, ordering and per-parameter
//! derivation of wire-bound parameters.

use opgen_common::{
    KnownPrimitive, ModelType, Namer, OperationDescription, Parameter, ParameterLocation,
    Settings,
};
use tracing::trace;

use crate::ir::{ClassRef, Emit, IrType, Known, RestParameter};
use crate::resolve::wire_type;

const CONTENT_LENGTH: &str = "Content-Length";

/// Declared parameters plus a synthesized `contentLength` header.
///
/// The header is inserted immediately before the first raw byte-stream body
/// parameter unless a `Content-Length` header is already declared.
pub fn with_content_length(declared: &[Parameter]) -> Vec<Parameter> {
    let mut effective = declared.to_vec();
    let stream_body = declared
        .iter()
        .position(|p| p.location == ParameterLocation::Body && p.model_type.is_stream());
    let has_header = declared.iter().any(|p| {
        p.location == ParameterLocation::Header
            && p.serialized_name().eq_ignore_ascii_case(CONTENT_LENGTH)
    });

    if let Some(index) = stream_body
        && !has_header
    {
        let content_length = Parameter::new(
            "contentLength",
            ParameterLocation::Header,
            ModelType::primitive(KnownPrimitive::Long),
        )
        .required()
        .serialized_as(CONTENT_LENGTH)
        .documented("The content length");
        effective.insert(index, content_length);
    }
    effective
}

/// Path parameters first, then everything else; each in declared order.
pub fn path_first<T>(items: Vec<T>, is_path: impl Fn(&T) -> bool) -> Vec<T> {
    let (mut path, rest): (Vec<T>, Vec<T>) = items.into_iter().partition(is_path);
    path.extend(rest);
    path
}

/// Sanitized, camel-cased shared-client-property name, if it has one.
fn property_name(namer: &dyn Namer, parameter: &Parameter) -> Option<String> {
    let property = parameter.client_property.as_ref()?;
    let name = namer.camel_case(&namer.remove_invalid_characters(&property.name));
    (!name.is_empty()).then_some(name)
}

/// Expression reading a shared client property from the generated client.
///
/// Operations hosted directly on the client read `this.{property}()`; those
/// in a named group go through `this.client`.
pub fn caller_accessor(namer: &dyn Namer, group_named: bool, parameter: &Parameter) -> String {
    let caller = if group_named { "this.client" } else { "this" };
    let accessor =
        property_name(namer, parameter).unwrap_or_else(|| namer.camel_case(&parameter.name));
    format!("{caller}.{accessor}()")
}

/// Expression that supplies the parameter's value at the call site.
pub fn variable_name(namer: &dyn Namer, group_named: bool, parameter: &Parameter) -> String {
    if let Some(name) = property_name(namer, parameter) {
        return name;
    }
    if parameter.is_client_property() {
        caller_accessor(namer, group_named, parameter)
    } else {
        parameter.name.clone()
    }
}

fn parameter_type(settings: &Settings, namer: &dyn Namer, parameter: &Parameter) -> IrType {
    let wire = wire_type(settings, &parameter.model_type);
    let in_payload = matches!(
        parameter.location,
        ParameterLocation::Body | ParameterLocation::FormData
    );

    let ty = match wire {
        IrType::List(_)
            if settings.generate_xml_serialization
                && parameter.location == ParameterLocation::Body =>
        {
            let xml_name = match &parameter.model_type {
                ModelType::Sequence(seq) => seq.xml_name.as_deref(),
                _ => None,
            }
            .unwrap_or(parameter.name.as_str());
            IrType::Class(ClassRef::new(
                settings.implementation_package(),
                format!("{}Wrapper", namer.pascal_case(xml_name)),
            ))
        }
        IrType::ByteArray | IrType::List(_) if !in_payload => IrType::Known(Known::String),
        other => other,
    };

    if parameter.nullable {
        ty.as_nullable()
    } else {
        ty
    }
}

/// Derive the wire-bound parameter for a declared one.
pub fn rest_parameter(
    settings: &Settings,
    namer: &dyn Namer,
    group_named: bool,
    parameter: &Parameter,
) -> RestParameter {
    let ty = parameter_type(settings, namer, parameter);
    let description = match parameter.documentation.as_deref() {
        Some(doc) if !doc.is_empty() => doc.to_string(),
        _ => format!("the {} value", ty.emit()),
    };
    RestParameter {
        description,
        variable_name: variable_name(namer, group_named, parameter),
        ty,
        location: parameter.location,
        serialized_name: parameter.serialized_name().to_string(),
        skip_url_encoding: parameter.skip_url_encoding,
        constant: parameter.constant,
        required: parameter.required,
        client_property: parameter.is_client_property(),
        header_collection_prefix: parameter.header_collection_prefix.clone(),
    }
}

fn operation_handle() -> RestParameter {
    RestParameter {
        description: "The OperationDescription object.".to_string(),
        ty: IrType::Known(Known::OperationDescription),
        variable_name: "operationDescription".to_string(),
        location: ParameterLocation::None,
        serialized_name: "operationDescription".to_string(),
        skip_url_encoding: true,
        constant: false,
        required: true,
        client_property: false,
        header_collection_prefix: None,
    }
}

fn next_url() -> RestParameter {
    RestParameter {
        description: "The URL to get the next page of items.".to_string(),
        ty: IrType::Known(Known::String),
        variable_name: "nextUrl".to_string(),
        location: ParameterLocation::Path,
        serialized_name: "nextUrl".to_string(),
        skip_url_encoding: true,
        constant: false,
        required: true,
        client_property: false,
        header_collection_prefix: None,
    }
}

/// How the wire parameter set is shaped for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterShape {
    /// Declared parameters as-is.
    Declared,
    /// Only the opaque operation handle.
    Resumable,
    /// `nextUrl` replaces every path parameter.
    NextLink,
}

/// Build the ordered wire parameter list of an operation.
pub fn rest_parameters(
    settings: &Settings,
    namer: &dyn Namer,
    group_named: bool,
    op: &OperationDescription,
    effective: &[Parameter],
    shape: ParameterShape,
) -> Vec<RestParameter> {
    if shape == ParameterShape::Resumable {
        return vec![operation_handle()];
    }

    let mut logical: Vec<&Parameter> = effective
        .iter()
        .filter(|p| p.location != ParameterLocation::None)
        .collect();

    let mut parameters = Vec::with_capacity(logical.len() + 1);
    if shape == ParameterShape::NextLink {
        parameters.push(next_url());
        logical.retain(|p| p.location != ParameterLocation::Path);
    }

    let ordered = path_first(logical, |p| p.location == ParameterLocation::Path);
    parameters.extend(
        ordered
            .into_iter()
            .map(|p| rest_parameter(settings, namer, group_named, p)),
    );
    trace!(
        operation = %op.name,
        count = parameters.len(),
        "Resolved wire parameters."
    );
    parameters
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use opgen_common::{DefaultNamer, HttpMethod};

    fn string_param(name: &str, location: ParameterLocation) -> Parameter {
        Parameter::new(name, location, ModelType::primitive(KnownPrimitive::String))
    }

    fn stream_body() -> Parameter {
        Parameter::new(
            "content",
            ParameterLocation::Body,
            ModelType::primitive(KnownPrimitive::Stream),
        )
        .required()
    }

    #[test]
    fn test_content_length_inserted_before_stream_body() {
        let declared = vec![string_param("name", ParameterLocation::Path), stream_body()];
        let effective = with_content_length(&declared);

        assert_eq!(effective.len(), 3);
        assert_eq!(effective[1].name, "contentLength");
        assert_eq!(effective[1].serialized_name(), "Content-Length");
        assert!(effective[1].required);
        assert_eq!(effective[1].location, ParameterLocation::Header);
        assert_eq!(effective[2].name, "content");
        // The input is left untouched.
        assert_eq!(declared.len(), 2);
    }

    #[test]
    fn test_content_length_not_duplicated() {
        let declared = vec![
            string_param("length", ParameterLocation::Header).serialized_as("content-length"),
            stream_body(),
        ];
        assert_eq!(with_content_length(&declared), declared);
    }

    #[test]
    fn test_path_first_is_stable() {
        let ordered = path_first(vec![("a", false), ("b", true), ("c", false), ("d", true)], |x| {
            x.1
        });
        let names: Vec<&str> = ordered.iter().map(|x| x.0).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_variable_name_resolution() {
        let namer = DefaultNamer;
        let plain = string_param("resourceGroupName", ParameterLocation::Path);
        assert_eq!(variable_name(&namer, true, &plain), "resourceGroupName");

        let shared = string_param("subscriptionId", ParameterLocation::Path)
            .from_client_property("$subscription-id");
        assert_eq!(variable_name(&namer, true, &shared), "subscriptionId");

        let unnamed = string_param("apiVersion", ParameterLocation::Query).from_client_property("");
        assert_eq!(
            variable_name(&namer, true, &unnamed),
            "this.client.apiVersion()"
        );
        assert_eq!(variable_name(&namer, false, &unnamed), "this.apiVersion()");
    }

    #[test]
    fn test_parameter_type_overrides() {
        let settings = Settings::default();
        let namer = DefaultNamer;

        let ids = Parameter::new(
            "ids",
            ParameterLocation::Query,
            ModelType::sequence(ModelType::primitive(KnownPrimitive::String)),
        );
        let param = rest_parameter(&settings, &namer, true, &ids);
        assert_eq!(param.ty, IrType::Known(Known::String));
        assert_eq!(param.description, "the String value");

        let bytes = Parameter::new(
            "blob",
            ParameterLocation::Header,
            ModelType::primitive(KnownPrimitive::ByteArray),
        );
        assert_eq!(
            rest_parameter(&settings, &namer, true, &bytes).ty,
            IrType::Known(Known::String)
        );

        let count = Parameter::new(
            "count",
            ParameterLocation::Query,
            ModelType::primitive(KnownPrimitive::Int),
        )
        .nullable()
        .documented("How many.");
        let param = rest_parameter(&settings, &namer, true, &count);
        assert_eq!(param.ty, IrType::Known(Known::Integer));
        assert_eq!(param.description, "How many.");
    }

    #[test]
    fn test_xml_wrapper_for_sequence_body() {
        let settings = Settings {
            generate_xml_serialization: true,
            ..Settings::default()
        };
        let body = Parameter::new(
            "signedIdentifiers",
            ParameterLocation::Body,
            ModelType::sequence(ModelType::composite("SignedIdentifier")),
        );
        let param = rest_parameter(&settings, &DefaultNamer, true, &body);
        assert_eq!(param.ty.emit(), "SignedIdentifiersWrapper");
    }

    #[test]
    fn test_rest_parameters_shapes() {
        let settings = Settings::default();
        let namer = DefaultNamer;
        let op = OperationDescription::new("ListNext", HttpMethod::Get, "{nextLink}");
        let declared = vec![
            string_param("filter", ParameterLocation::Query),
            string_param("nextLink", ParameterLocation::Path).required(),
            string_param("ignored", ParameterLocation::None),
        ];

        let params = rest_parameters(
            &settings,
            &namer,
            true,
            &op,
            &declared,
            ParameterShape::NextLink,
        );
        let names: Vec<&str> = params.iter().map(|p| p.variable_name.as_str()).collect();
        assert_eq!(names, vec!["nextUrl", "filter"]);
        assert!(params[0].skip_url_encoding);

        let resumed = rest_parameters(
            &settings,
            &namer,
            true,
            &op,
            &declared,
            ParameterShape::Resumable,
        );
        assert_eq!(resumed.len(), 1);
        assert_eq!(resumed[0].location, ParameterLocation::None);
        assert_eq!(resumed[0].ty, IrType::Known(Known::OperationDescription));
    }
}
