//! Assembly of the wire-level call descriptor.

use opgen_common::{MethodGroup, OperationDescription, Parameter, UniqueNames};
use tracing::debug;

use crate::classify::resolve_name;
use crate::context::LoweringContext;
use crate::error::LoweringError;
use crate::ir::{Emit, OperationCategory, RestCallDescriptor};
use crate::params::{ParameterShape, rest_parameters};
use crate::resolve::{
    exception_type, long_running_return_type, single_return_type, transcode_tag, wire_body_type,
    wire_type,
};

fn combined_description(op: &OperationDescription) -> String {
    let parts: Vec<&str> = [op.summary.as_deref(), op.description.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    parts.join("\n")
}

/// Build the descriptor for `op`, whose effective parameters are `effective`.
pub fn build_rest_call(
    ctx: &LoweringContext,
    scope: &dyn UniqueNames,
    group: &MethodGroup,
    op: &OperationDescription,
    effective: &[Parameter],
) -> Result<RestCallDescriptor, LoweringError> {
    let settings = ctx.settings();
    let conventions = settings.conventions;
    let flags = op.flags;

    let resolved = resolve_name(ctx, scope, group, op);

    let is_paging_next = conventions.paging && flags.next_link_method;
    let is_paging = conventions.paging && flags.pageable && !flags.next_link_method;
    let simulate_as_paging =
        conventions.paging && resolved.role.is_some_and(|role| role.simulates_paging());
    let is_long_running = conventions.long_running && flags.long_running;
    let is_resumable = conventions.long_running && flags.resumable;

    let category = if is_resumable {
        OperationCategory::Resumable
    } else if is_paging || is_paging_next {
        OperationCategory::Paging
    } else if simulate_as_paging {
        OperationCategory::SimulatedPaging
    } else if is_long_running {
        OperationCategory::LongRunning
    } else {
        OperationCategory::Simple
    };

    let paged = conventions.paging && flags.is_paged();
    let wire_body = wire_body_type(settings, op, paged)?;

    let return_type = if is_long_running {
        let declared_list = op
            .returns
            .body
            .as_ref()
            .map(|body| wire_type(settings, body));
        let list_element = declared_list
            .as_ref()
            .and_then(|ty| ty.list_element())
            .filter(|_| paged || simulate_as_paging);
        long_running_return_type(&wire_body, list_element)
    } else {
        single_return_type(settings, ctx.namer(), &group.name, op, &wire_body)
    };

    let shape = if is_resumable {
        ParameterShape::Resumable
    } else if is_paging_next {
        ParameterShape::NextLink
    } else {
        ParameterShape::Declared
    };
    let parameters = rest_parameters(
        settings,
        ctx.namer(),
        group.is_named(),
        op,
        effective,
        shape,
    );

    let descriptor = RestCallDescriptor {
        name: resolved.name,
        http_method: op.method,
        url_path: op.url.trim_start_matches('/').to_string(),
        parameters,
        expected_status_codes: op.responses.keys().copied().collect(),
        exception_type: exception_type(settings, op),
        transcode: transcode_tag(&return_type),
        return_type,
        content_type: op.request_content_type.clone(),
        description: combined_description(op),
        category,
        is_paging,
        is_paging_next,
        simulate_as_paging,
        is_long_running,
        is_resumable,
    };

    debug!(
        operation = %op.name,
        name = %descriptor.name,
        category = ?descriptor.category,
        return_type = %descriptor.return_type.emit(),
        "Built REST call descriptor."
    );
    Ok(descriptor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use opgen_common::{
        ConventionFlags, Conventions, HttpMethod, KnownPrimitive, ModelType, NameScope,
        ParameterLocation, Settings,
    };

    use crate::ir::TranscodeTag;

    fn build(ctx: &LoweringContext, group: &MethodGroup, index: usize) -> RestCallDescriptor {
        let op = &group.operations[index];
        build_rest_call(ctx, &NameScope::default(), group, op, &op.parameters).unwrap()
    }

    #[test]
    fn test_simple_descriptor() {
        let mut op = OperationDescription::new(
            "GetProperties",
            HttpMethod::Get,
            "//widgets/{name}/properties",
        )
        .with_parameter(
            Parameter::new(
                "name",
                ParameterLocation::Path,
                ModelType::primitive(KnownPrimitive::String),
            )
            .required(),
        )
        .returning(200, ModelType::primitive(KnownPrimitive::DateTimeRfc1123))
        .responding(204)
        .with_error(ModelType::composite("CloudError"));
        op.summary = Some("Gets properties.".to_string());
        op.description = Some("Returns the last-modified time.".to_string());
        let group = MethodGroup::new("Widgets", vec![op]).unwrap();

        let rc = build(&LoweringContext::default(), &group, 0);
        assert_eq!(rc.name, "getProperties");
        assert_eq!(rc.url_path, "widgets/{name}/properties");
        assert_eq!(rc.expected_status_codes, vec![200, 204]);
        assert_eq!(rc.category, OperationCategory::Simple);
        assert_eq!(rc.return_type.emit(), "Single<BodyResponse<DateTimeRfc1123>>");
        assert_eq!(rc.transcode, Some(TranscodeTag::DateTimeRfc1123));
        assert_eq!(rc.exception_type.unwrap().emit(), "CloudException");
        assert_eq!(
            rc.description,
            "Gets properties.\nReturns the last-modified time."
        );
    }

    #[test]
    fn test_paging_gated_by_conventions() {
        let op = OperationDescription::new("ListAll", HttpMethod::Get, "/widgets")
            .returning(
                200,
                ModelType::paged_sequence(ModelType::composite("Widget"), "PageImpl1"),
            )
            .with_flags(ConventionFlags {
                pageable: true,
                ..ConventionFlags::default()
            });
        let group = MethodGroup::new("Widgets", vec![op]).unwrap();

        let rc = build(&LoweringContext::default(), &group, 0);
        assert!(rc.is_paging);
        assert_eq!(rc.category, OperationCategory::Paging);
        assert_eq!(rc.return_type.emit(), "Single<BodyResponse<PageImpl1<Widget>>>");

        let vanilla = LoweringContext::new(Settings {
            conventions: Conventions::vanilla(),
            ..Settings::default()
        });
        let rc = build(&vanilla, &group, 0);
        assert!(!rc.is_paging);
        assert_eq!(rc.category, OperationCategory::Simple);
        assert_eq!(rc.return_type.emit(), "Single<BodyResponse<List<Widget>>>");
    }

    #[test]
    fn test_long_running_paged_return_type() {
        let op = OperationDescription::new("ListAll", HttpMethod::Post, "/widgets/scan")
            .returning(
                200,
                ModelType::paged_sequence(ModelType::composite("Widget"), "PageImpl1"),
            )
            .with_flags(ConventionFlags {
                pageable: true,
                long_running: true,
                ..ConventionFlags::default()
            });
        let group = MethodGroup::new("Widgets", vec![op]).unwrap();

        let rc = build(&LoweringContext::default(), &group, 0);
        assert!(rc.is_long_running);
        assert_eq!(rc.category, OperationCategory::Paging);
        assert_eq!(
            rc.return_type.emit(),
            "Observable<OperationStatus<Page<Widget>>>"
        );
    }

    #[test]
    fn test_resumable_wins_over_paging() {
        let op = OperationDescription::new("Create", HttpMethod::Put, "/widgets/{name}")
            .with_parameter(
                Parameter::new(
                    "name",
                    ParameterLocation::Path,
                    ModelType::primitive(KnownPrimitive::String),
                )
                .required(),
            )
            .returning(200, ModelType::composite("Widget"))
            .with_flags(ConventionFlags {
                pageable: true,
                long_running: true,
                resumable: true,
                ..ConventionFlags::default()
            });
        let group = MethodGroup::new("Widgets", vec![op]).unwrap();

        let rc = build(&LoweringContext::default(), &group, 0);
        assert_eq!(rc.category, OperationCategory::Resumable);
        assert_eq!(rc.parameters.len(), 1);
        assert_eq!(rc.parameters[0].variable_name, "operationDescription");
    }
}
