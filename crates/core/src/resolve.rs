//! Type resolution: declared model types to target types.
//!
//! Covers wire types, page containers, the descriptor return type, the
//! exception type and the response transcoding tag.

use std::sync::LazyLock;

use opgen_common::{KnownPrimitive, ModelType, Namer, OperationDescription, Settings};

use crate::error::LoweringError;
use crate::ir::{ClassRef, IrType, Known, Primitive, TranscodeTag, Wrapper};

/// Wire types that need boundary transcoding, in priority order.
static TRANSCODE_PRIORITY: LazyLock<Vec<(IrType, TranscodeTag)>> = LazyLock::new(|| {
    vec![
        (IrType::Known(Known::Base64Url), TranscodeTag::Base64Url),
        (
            IrType::Known(Known::DateTimeRfc1123),
            TranscodeTag::DateTimeRfc1123,
        ),
        (
            IrType::Primitive(Primitive::UnixTimeLong),
            TranscodeTag::UnixTime,
        ),
        (IrType::Known(Known::UnixTimeLong), TranscodeTag::UnixTime),
        (IrType::Known(Known::UnixTimeDateTime), TranscodeTag::UnixTime),
    ]
});

fn primitive_type(primitive: KnownPrimitive) -> IrType {
    match primitive {
        KnownPrimitive::None => IrType::void(),
        KnownPrimitive::Boolean => IrType::Primitive(Primitive::Boolean),
        KnownPrimitive::Int => IrType::Primitive(Primitive::Int),
        KnownPrimitive::Long => IrType::Primitive(Primitive::Long),
        KnownPrimitive::Double => IrType::Primitive(Primitive::Double),
        KnownPrimitive::UnixTime => IrType::Primitive(Primitive::UnixTimeLong),
        KnownPrimitive::Decimal => IrType::Known(Known::BigDecimal),
        KnownPrimitive::String => IrType::Known(Known::String),
        KnownPrimitive::Date => IrType::Known(Known::LocalDate),
        KnownPrimitive::DateTime => IrType::Known(Known::DateTime),
        KnownPrimitive::DateTimeRfc1123 => IrType::Known(Known::DateTimeRfc1123),
        KnownPrimitive::Base64Url => IrType::Known(Known::Base64Url),
        KnownPrimitive::Uuid => IrType::Known(Known::Uuid),
        KnownPrimitive::Duration => IrType::Known(Known::Duration),
        KnownPrimitive::Object => IrType::Known(Known::Object),
        KnownPrimitive::Credentials => IrType::Known(Known::ServiceClientCredentials),
        KnownPrimitive::ByteArray => IrType::ByteArray,
        KnownPrimitive::Stream => IrType::byte_stream(),
    }
}

/// The target type of a declared model type.
///
/// Under fluent conventions inner composites are generated as `{Name}Inner`
/// in the implementation package.
pub fn wire_type(settings: &Settings, ty: &ModelType) -> IrType {
    match ty {
        ModelType::Primitive { primitive } => primitive_type(*primitive),
        ModelType::Enum { name } => IrType::Enum(ClassRef::new(settings.models_package(), name)),
        ModelType::Sequence(seq) => IrType::list(wire_type(settings, &seq.element)),
        ModelType::Dictionary { value } => IrType::map(wire_type(settings, value)),
        ModelType::Composite(composite) => {
            if settings.conventions.fluent && composite.inner {
                IrType::Class(ClassRef::new(
                    settings.implementation_package(),
                    format!("{}Inner", composite.name),
                ))
            } else {
                IrType::Class(ClassRef::new(settings.models_package(), &composite.name))
            }
        }
    }
}

/// Package that hosts page containers.
pub fn page_package(settings: &Settings) -> String {
    if settings.conventions.fluent {
        settings.implementation_package()
    } else {
        settings.models_package()
    }
}

/// Wire body type of the operation's return.
///
/// A paged sequence body is re-expressed as its bound page container.
pub fn wire_body_type(
    settings: &Settings,
    op: &OperationDescription,
    paged: bool,
) -> Result<IrType, LoweringError> {
    let Some(body) = op.returns.body.as_ref() else {
        return Ok(IrType::void());
    };
    let wire = wire_type(settings, body);
    if !paged {
        return Ok(wire);
    }
    match (body, wire.list_element()) {
        (ModelType::Sequence(seq), Some(element)) => {
            let page_impl = seq.page_impl.as_deref().filter(|name| !name.is_empty()).ok_or_else(
                || LoweringError::MissingPageImplementation {
                    operation: op.name.clone(),
                },
            )?;
            Ok(IrType::PageImpl {
                class: ClassRef::new(page_package(settings), page_impl),
                element: Box::new(element.clone()),
            })
        }
        _ => Ok(wire),
    }
}

/// Return type of a long-running wire call.
///
/// `list_element` is the element of the declared sequence body when the
/// operation is paged or simulates paging.
pub fn long_running_return_type(wire_body: &IrType, list_element: Option<&IrType>) -> IrType {
    let status_arg = match list_element {
        Some(element) => IrType::wrap(Wrapper::Page, element.clone()),
        None => wire_body.clone(),
    };
    IrType::wrap(
        Wrapper::Observable,
        IrType::wrap(Wrapper::OperationStatus, status_arg),
    )
}

/// Return type of a non-long-running wire call.
pub fn single_return_type(
    settings: &Settings,
    namer: &dyn Namer,
    group_name: &str,
    op: &OperationDescription,
    wire_body: &IrType,
) -> IrType {
    let value = if op.returns.headers.is_some() {
        IrType::Class(ClassRef::new(
            settings.models_package(),
            format!(
                "{}{}Response",
                namer.pascal_case(group_name),
                namer.pascal_case(&op.name)
            ),
        ))
    } else if *wire_body == IrType::byte_stream() {
        IrType::Known(Known::StreamResponse)
    } else if wire_body.is_void() {
        IrType::Known(Known::VoidResponse)
    } else {
        IrType::wrap(Wrapper::BodyResponse, wire_body.clone())
    };
    IrType::wrap(Wrapper::Single, value)
}

/// Exception raised for error responses.
///
/// `None` when the operation declares no error body.
pub fn exception_type(settings: &Settings, op: &OperationDescription) -> Option<IrType> {
    let body = op.default_response.body.as_ref()?;
    let conventions = settings.conventions;

    if let ModelType::Composite(composite) = body {
        if conventions.cloud_error && composite.name == "CloudError" {
            return Some(IrType::Known(Known::CloudException));
        }
        let package = if !conventions.fluent {
            settings.models_package()
        } else if composite.inner {
            settings.implementation_package()
        } else {
            settings.package.clone()
        };
        let name = match composite.name_override.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if conventions.fluent && composite.inner => {
                format!("{}InnerException", composite.name)
            }
            _ => format!("{}Exception", composite.name),
        };
        return Some(IrType::Class(ClassRef::new(package, name)));
    }

    Some(IrType::Known(Known::RestException))
}

/// The first transcoding wire type found in `return_type`.
pub fn transcode_tag(return_type: &IrType) -> Option<TranscodeTag> {
    TRANSCODE_PRIORITY
        .iter()
        .find(|(wire, _)| return_type.contains(wire))
        .map(|(_, tag)| *tag)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use opgen_common::{CompositeType, Conventions, DefaultNamer, HttpMethod, ModelType, Response};

    use crate::ir::Emit;

    fn fluent_settings() -> Settings {
        Settings {
            conventions: Conventions::fluent(),
            ..Settings::default()
        }
    }

    fn inner(name: &str) -> ModelType {
        ModelType::Composite(CompositeType {
            name: name.to_string(),
            inner: true,
            name_override: None,
        })
    }

    #[test]
    fn test_wire_type_inner_models() {
        let settings = fluent_settings();
        let ty = wire_type(&settings, &inner("Widget"));
        assert_eq!(
            ty,
            IrType::Class(ClassRef::new(
                "com.example.client.implementation",
                "WidgetInner"
            ))
        );

        let plain = wire_type(&Settings::default(), &inner("Widget"));
        assert_eq!(plain.emit(), "Widget");
    }

    #[test]
    fn test_wire_type_stream_and_unix_time() {
        let settings = Settings::default();
        assert_eq!(
            wire_type(&settings, &ModelType::primitive(KnownPrimitive::Stream)),
            IrType::byte_stream()
        );
        assert_eq!(
            wire_type(
                &settings,
                &ModelType::sequence(ModelType::primitive(KnownPrimitive::UnixTime))
            ),
            IrType::list(IrType::Known(Known::UnixTimeLong))
        );
    }

    #[test]
    fn test_paged_body_uses_page_container() {
        let settings = Settings::default();
        let op = OperationDescription::new("List", HttpMethod::Get, "/widgets").returning(
            200,
            ModelType::paged_sequence(ModelType::composite("Widget"), "PageImpl"),
        );
        let body = wire_body_type(&settings, &op, true).unwrap();
        assert_eq!(body.emit(), "PageImpl<Widget>");
        assert!(matches!(
            body,
            IrType::PageImpl { ref class, .. } if class.package == "com.example.client.models"
        ));
    }

    #[test]
    fn test_paged_body_without_binding_is_an_error() {
        let op = OperationDescription::new("List", HttpMethod::Get, "/widgets")
            .returning(200, ModelType::sequence(ModelType::composite("Widget")));
        let err = wire_body_type(&Settings::default(), &op, true).unwrap_err();
        assert!(matches!(
            err,
            LoweringError::MissingPageImplementation { ref operation } if operation == "List"
        ));
    }

    #[test]
    fn test_single_return_type_shapes() {
        let settings = Settings::default();
        let mut op = OperationDescription::new("Get", HttpMethod::Get, "/widgets/{name}");

        let void = single_return_type(&settings, &DefaultNamer, "Widgets", &op, &IrType::void());
        assert_eq!(void.emit(), "Single<VoidResponse>");

        let stream = single_return_type(&settings, &DefaultNamer, "Widgets", &op, &IrType::byte_stream());
        assert_eq!(stream.emit(), "Single<StreamResponse>");

        let body = IrType::Primitive(Primitive::Int);
        assert_eq!(
            single_return_type(&settings, &DefaultNamer, "Widgets", &op, &body).emit(),
            "Single<BodyResponse<Integer>>"
        );

        op.returns = Response {
            body: None,
            headers: Some(ModelType::composite("GetHeaders")),
        };
        assert_eq!(
            single_return_type(&settings, &DefaultNamer, "widgets", &op, &IrType::void()).emit(),
            "Single<WidgetsGetResponse>"
        );
    }

    #[test]
    fn test_long_running_return_type() {
        let widget = IrType::Class(ClassRef::new("p", "Widget"));
        assert_eq!(
            long_running_return_type(&widget, None).emit(),
            "Observable<OperationStatus<Widget>>"
        );
        assert_eq!(
            long_running_return_type(&IrType::list(widget.clone()), Some(&widget)).emit(),
            "Observable<OperationStatus<Page<Widget>>>"
        );
    }

    #[test]
    fn test_exception_type_policy() {
        let op = OperationDescription::new("Get", HttpMethod::Get, "/a");
        assert_eq!(exception_type(&Settings::default(), &op), None);

        let cloud = op.clone().with_error(ModelType::composite("CloudError"));
        assert_eq!(
            exception_type(&Settings::default(), &cloud),
            Some(IrType::Known(Known::CloudException))
        );

        let vanilla = Settings {
            conventions: Conventions::vanilla(),
            ..Settings::default()
        };
        assert_eq!(
            exception_type(&vanilla, &cloud),
            Some(IrType::Class(ClassRef::new(
                "com.example.client.models",
                "CloudErrorException"
            )))
        );

        let inner_error = op.clone().with_error(inner("ErrorBody"));
        assert_eq!(
            exception_type(&fluent_settings(), &inner_error),
            Some(IrType::Class(ClassRef::new(
                "com.example.client.implementation",
                "ErrorBodyInnerException"
            )))
        );

        let plain_error = op.clone().with_error(ModelType::composite("ErrorBody"));
        assert_eq!(
            exception_type(&fluent_settings(), &plain_error),
            Some(IrType::Class(ClassRef::new(
                "com.example.client",
                "ErrorBodyException"
            )))
        );

        let overridden = op.clone().with_error(ModelType::Composite(CompositeType {
            name: "ErrorBody".to_string(),
            inner: false,
            name_override: Some("ServiceFault".to_string()),
        }));
        assert_eq!(
            exception_type(&Settings::default(), &overridden)
                .unwrap()
                .emit(),
            "ServiceFault"
        );

        let text_error = op.with_error(ModelType::primitive(KnownPrimitive::String));
        assert_eq!(
            exception_type(&Settings::default(), &text_error),
            Some(IrType::Known(Known::RestException))
        );
    }

    #[test]
    fn test_transcode_priority() {
        let both = IrType::wrap(
            Wrapper::Single,
            IrType::map(IrType::Known(Known::DateTimeRfc1123)),
        );
        assert_eq!(transcode_tag(&both), Some(TranscodeTag::DateTimeRfc1123));

        let mixed = IrType::Generic {
            base: Wrapper::Single,
            args: vec![
                IrType::Known(Known::DateTimeRfc1123),
                IrType::Known(Known::Base64Url),
            ],
        };
        assert_eq!(transcode_tag(&mixed), Some(TranscodeTag::Base64Url));

        let unix = IrType::wrap(
            Wrapper::Single,
            IrType::list(IrType::Primitive(Primitive::UnixTimeLong)),
        );
        assert_eq!(transcode_tag(&unix), Some(TranscodeTag::UnixTime));

        assert_eq!(transcode_tag(&IrType::void()), None);
    }
}
