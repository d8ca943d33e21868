//! Expansion of a descriptor into caller-visible method variants.
//!
//! The variant matrix is parameter sets (full list, and optionally a
//! required-only subset) crossed with the kinds of the operation's category.

use std::collections::HashSet;
use std::sync::Arc;

use opgen_common::{ModelType, OperationDescription, Parameter};
use tracing::debug;

use crate::context::LoweringContext;
use crate::error::LoweringError;
use crate::ir::{
    Emit, IrType, Known, MethodParameter, MethodVariant, OperationCategory, RestCallDescriptor,
    ReturnValue, VariantKind, Wrapper,
};
use crate::resolve::wire_type;
use crate::validate::validation_targets;

const SINGLE_DESCRIPTION: &str = "a Single which performs the network request upon subscription.";
const FUTURE_DESCRIPTION: &str =
    "a ServiceFuture which will be completed with the result of the network request.";
const OBSERVABLE_DESCRIPTION: &str = "the observable for the request";

/// Formal parameters of the client methods, required first.
///
/// Shared client properties, unnamed parameters and constants are excluded.
pub fn formal_parameters(ctx: &LoweringContext, effective: &[Parameter]) -> Vec<MethodParameter> {
    let mut formal: Vec<&Parameter> = effective
        .iter()
        .filter(|p| !p.is_client_property() && !p.name.trim().is_empty() && !p.constant)
        .collect();
    formal.sort_by_key(|p| !p.required);

    formal
        .into_iter()
        .map(|p| {
            let client = ctx.model().to_client_type(&p.model_type);
            let mut ty = wire_type(ctx.settings(), &client);
            if !p.required || p.nullable {
                ty = ty.as_nullable();
            }
            let description = match p.documentation.as_deref() {
                Some(doc) if !doc.is_empty() => doc.to_string(),
                _ => format!("the {} value", ty.emit()),
            };
            MethodParameter {
                description,
                ty,
                name: p.name.clone(),
                required: p.required,
            }
        })
        .collect()
}

/// Client-side body and page types.
struct BodyTypes {
    /// Body as seen by callers (`PagedList<E>` for paged lists).
    client: IrType,
    /// `Page<E>` for paged lists, else the nullable client body.
    page: IrType,
}

fn body_types(
    ctx: &LoweringContext,
    op: &OperationDescription,
    rest_call: &RestCallDescriptor,
) -> BodyTypes {
    let declared = op.returns.body.clone().unwrap_or_else(ModelType::none);
    let client = wire_type(ctx.settings(), &ctx.model().to_client_type(&declared));
    let paged = matches!(
        rest_call.category,
        OperationCategory::Paging | OperationCategory::SimulatedPaging
    );
    match client.list_element() {
        Some(element) if paged => BodyTypes {
            page: IrType::wrap(Wrapper::Page, element.clone()),
            client: IrType::wrap(Wrapper::PagedList, element.clone()),
        },
        _ => BodyTypes {
            page: client.as_nullable(),
            client,
        },
    }
}

/// Shared inputs for building the variants of one parameter set.
struct VariantBuilder<'a> {
    rest_call: &'a Arc<RestCallDescriptor>,
    parameters: Vec<MethodParameter>,
    only_required: bool,
    validation_targets: Vec<String>,
}

impl VariantBuilder<'_> {
    fn variant(
        &self,
        kind: VariantKind,
        name: String,
        return_value: ReturnValue,
        callback: Option<&MethodParameter>,
    ) -> MethodVariant {
        let mut parameters = self.parameters.clone();
        parameters.extend(callback.cloned());
        MethodVariant {
            name,
            description: self.rest_call.description.clone(),
            parameters,
            return_value,
            kind,
            only_required: self.only_required,
            validation_targets: self.validation_targets.clone(),
            rest_call: Arc::clone(self.rest_call),
        }
    }
}

fn returns(description: Option<String>, ty: IrType) -> ReturnValue {
    ReturnValue { description, ty }
}

fn sync_description(body: &IrType) -> Option<String> {
    (!body.is_void()).then(|| format!("the {} object if successful.", body.emit()))
}

/// Expand the descriptor into every caller-visible method variant.
pub fn expand_variants(
    ctx: &LoweringContext,
    group_named: bool,
    op: &OperationDescription,
    effective: &[Parameter],
    rest_call: &Arc<RestCallDescriptor>,
) -> Result<Vec<MethodVariant>, LoweringError> {
    let settings = ctx.settings();
    let body = body_types(ctx, op, rest_call);
    let name = &rest_call.name;

    if rest_call.category == OperationCategory::Resumable {
        let parameters = rest_call
            .parameters
            .iter()
            .take(1)
            .map(|p| MethodParameter {
                description: p.description.clone(),
                ty: p.ty.clone(),
                name: p.variable_name.clone(),
                required: true,
            })
            .collect();
        let variant = MethodVariant {
            name: name.clone(),
            description: format!("{} (resume watch)", rest_call.description),
            parameters,
            return_value: returns(
                Some(OBSERVABLE_DESCRIPTION.to_string()),
                IrType::wrap(
                    Wrapper::Observable,
                    IrType::wrap(Wrapper::OperationStatus, body.client.clone()),
                ),
            ),
            kind: VariantKind::Resumable,
            only_required: true,
            validation_targets: Vec::new(),
            rest_call: Arc::clone(rest_call),
        };
        return Ok(vec![variant]);
    }

    let all = formal_parameters(ctx, effective);
    let required_count = all.iter().filter(|p| p.required).count();
    let mut parameter_sets = vec![(all.clone(), false)];
    if settings.required_parameter_client_methods && all.iter().any(|p| !p.required) {
        let required: Vec<MethodParameter> = all.into_iter().filter(|p| p.required).collect();
        parameter_sets.insert(0, (required, true));
    }

    let callback = MethodParameter {
        description: "the async ServiceCallback to handle successful and failed responses."
            .to_string(),
        ty: IrType::wrap(Wrapper::ServiceCallback, body.client.clone()),
        name: "serviceCallback".to_string(),
        required: true,
    };
    let future = IrType::wrap(Wrapper::ServiceFuture, body.client.clone());
    let observable_page = IrType::wrap(Wrapper::Observable, body.page.clone());
    let async_page_description = if body.client.is_void() {
        format!("the {} object if successful.", observable_page.emit())
    } else {
        format!("the observable to the {} object", body.client.emit())
    };

    let fluent_delete = settings.conventions.fluent
        && name.eq_ignore_ascii_case("delete")
        && required_count == 2;

    let mut variants = Vec::new();
    for (parameters, only_required) in parameter_sets {
        let builder = VariantBuilder {
            rest_call,
            validation_targets: validation_targets(
                settings,
                ctx.namer(),
                group_named,
                effective,
                only_required,
            ),
            parameters,
            only_required,
        };

        match rest_call.category {
            OperationCategory::Paging => {
                let single_page = IrType::wrap(Wrapper::Single, body.page.clone());
                variants.push(builder.variant(
                    VariantKind::PagingSync,
                    name.clone(),
                    returns(sync_description(&body.client), body.client.clone()),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::PagingAsync,
                    rest_call.simple_async_name(),
                    returns(Some(async_page_description.clone()), observable_page.clone()),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::PagingAsyncSinglePage,
                    rest_call.single_page_name(),
                    returns(
                        Some(format!("the {} object if successful.", single_page.emit())),
                        single_page,
                    ),
                    None,
                ));
            }
            OperationCategory::SimulatedPaging => {
                variants.push(builder.variant(
                    VariantKind::SimulatedPagingSync,
                    name.clone(),
                    returns(sync_description(&body.client), body.client.clone()),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::SimulatedPagingAsync,
                    rest_call.simple_async_name(),
                    returns(Some(async_page_description.clone()), observable_page.clone()),
                    None,
                ));
            }
            OperationCategory::LongRunning => {
                variants.push(builder.variant(
                    VariantKind::LongRunningSync,
                    name.clone(),
                    returns(sync_description(&body.client), body.client.clone()),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::LongRunningAsyncServiceCallback,
                    rest_call.simple_async_name(),
                    returns(Some(format!("the {} object", future.emit())), future.clone()),
                    Some(&callback),
                ));
                variants.push(builder.variant(
                    VariantKind::LongRunningAsync,
                    rest_call.simple_async_name(),
                    returns(
                        Some(OBSERVABLE_DESCRIPTION.to_string()),
                        IrType::wrap(
                            Wrapper::Observable,
                            IrType::wrap(Wrapper::OperationStatus, body.client.clone()),
                        ),
                    ),
                    None,
                ));
            }
            OperationCategory::Simple => {
                let async_return = if !body.client.is_void() {
                    IrType::wrap(Wrapper::Maybe, body.client.clone())
                } else if fluent_delete {
                    IrType::wrap(Wrapper::Maybe, IrType::Known(Known::Void))
                } else {
                    IrType::Known(Known::Completable)
                };
                variants.push(builder.variant(
                    VariantKind::SimpleSync,
                    name.clone(),
                    returns(sync_description(&body.client), body.client.clone()),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::SimpleAsyncServiceCallback,
                    rest_call.simple_async_name(),
                    returns(Some(FUTURE_DESCRIPTION.to_string()), future.clone()),
                    Some(&callback),
                ));
                variants.push(builder.variant(
                    VariantKind::SimpleAsyncRestResponse,
                    rest_call.rest_response_name(),
                    returns(
                        Some(SINGLE_DESCRIPTION.to_string()),
                        rest_call.return_type.to_client(),
                    ),
                    None,
                ));
                variants.push(builder.variant(
                    VariantKind::SimpleAsync,
                    rest_call.simple_async_name(),
                    returns(Some(SINGLE_DESCRIPTION.to_string()), async_return),
                    None,
                ));
            }
            OperationCategory::Resumable => {
                return Err(LoweringError::Invariant {
                    operation: op.name.clone(),
                    invariant: "resumable operations expand to a single variant",
                });
            }
        }
    }

    ensure_unique(op, &variants)?;
    debug!(
        operation = %op.name,
        category = ?rest_call.category,
        count = variants.len(),
        "Expanded method variants."
    );
    Ok(variants)
}

/// Each (name, kind, required-only) triple may appear at most once.
fn ensure_unique(op: &OperationDescription, variants: &[MethodVariant]) -> Result<(), LoweringError> {
    let mut seen = HashSet::new();
    for variant in variants {
        if !seen.insert((variant.name.as_str(), variant.kind, variant.only_required)) {
            return Err(LoweringError::Invariant {
                operation: op.name.clone(),
                invariant: "method variant (name, kind, required-only) must be unique",
            });
        }
    }
    Ok(())
}
