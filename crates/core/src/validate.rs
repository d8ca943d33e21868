//! Presence-check targets for method variants.

use std::collections::HashSet;
use std::sync::LazyLock;

use opgen_common::{Namer, Parameter, Settings};

use crate::ir::{IrType, Known};
use crate::params::caller_accessor;
use crate::resolve::wire_type;

/// Types that never need a presence check before the call.
static SELF_VALIDATING: LazyLock<HashSet<IrType>> = LazyLock::new(|| {
    [
        Known::Object,
        Known::Integer,
        Known::Long,
        Known::Double,
        Known::BigDecimal,
        Known::String,
        Known::DateTime,
        Known::LocalDate,
        Known::DateTimeRfc1123,
        Known::Duration,
        Known::Boolean,
        Known::ServiceClientCredentials,
        Known::AzureTokenCredentials,
        Known::Uuid,
        Known::Base64Url,
        Known::UnixTime,
        Known::UnixTimeDateTime,
        Known::UnixTimeLong,
    ]
    .into_iter()
    .map(IrType::Known)
    .chain([IrType::ByteArray, IrType::byte_stream()])
    .collect()
});

fn needs_check(ty: &IrType) -> bool {
    !matches!(ty, IrType::Primitive(_) | IrType::Enum(_)) && !SELF_VALIDATING.contains(ty)
}

/// Expressions to check for presence before calling the operation.
///
/// Every effective parameter is considered, including shared client
/// properties; with `only_required` set, optional parameters are skipped.
pub fn validation_targets(
    settings: &Settings,
    namer: &dyn Namer,
    group_named: bool,
    effective: &[Parameter],
    only_required: bool,
) -> Vec<String> {
    effective
        .iter()
        .filter(|p| !p.constant)
        .filter(|p| !only_required || p.required)
        .filter(|p| needs_check(&wire_type(settings, &p.model_type)))
        .map(|p| {
            if p.is_client_property() {
                caller_accessor(namer, group_named, p)
            } else {
                p.name.clone()
            }
        })
        .collect()
}
