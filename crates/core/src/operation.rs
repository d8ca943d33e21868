//! Per-operation lowering handle with memoized results.

use std::sync::{Arc, OnceLock};

use opgen_common::{OperationDescription, Parameter};

use crate::descriptor::build_rest_call;
use crate::error::LoweringError;
use crate::group::GroupLowering;
use crate::ir::{LoweredOperation, MethodVariant, RestCallDescriptor};
use crate::params::with_content_length;
use crate::validate::validation_targets;
use crate::variants::expand_variants;

/// Cached lowering results for one operation.
#[derive(Debug, Default)]
pub(crate) struct OperationCache {
    effective: OnceLock<Vec<Parameter>>,
    rest_call: OnceLock<Arc<RestCallDescriptor>>,
    variants: OnceLock<Arc<[MethodVariant]>>,
}

/// Lowering of one operation within its group.
///
/// Every accessor computes on first use and returns the cached value after
/// that, so repeated and concurrent calls observe the same result.
#[derive(Debug, Clone, Copy)]
pub struct OperationLowering<'g, 'a> {
    group: &'g GroupLowering<'a>,
    op: &'a OperationDescription,
    cache: &'g OperationCache,
}

impl<'g, 'a> OperationLowering<'g, 'a> {
    pub(crate) fn new(
        group: &'g GroupLowering<'a>,
        op: &'a OperationDescription,
        cache: &'g OperationCache,
    ) -> Self {
        Self { group, op, cache }
    }

    /// The operation being lowered.
    pub fn operation(&self) -> &'a OperationDescription {
        self.op
    }

    /// Declared parameters plus any synthesized `contentLength` header.
    pub fn effective_parameters(&self) -> &'g [Parameter] {
        self.cache
            .effective
            .get_or_init(|| with_content_length(&self.op.parameters))
    }

    /// The wire-level call descriptor.
    pub fn rest_call(&self) -> Result<Arc<RestCallDescriptor>, LoweringError> {
        if let Some(rest_call) = self.cache.rest_call.get() {
            return Ok(Arc::clone(rest_call));
        }
        let built = Arc::new(build_rest_call(
            self.group.context(),
            self.group.scope(),
            self.group.group(),
            self.op,
            self.effective_parameters(),
        )?);
        Ok(Arc::clone(self.cache.rest_call.get_or_init(|| built)))
    }

    /// Every caller-visible method variant, in emission order.
    pub fn variants(&self) -> Result<Arc<[MethodVariant]>, LoweringError> {
        if let Some(variants) = self.cache.variants.get() {
            return Ok(Arc::clone(variants));
        }
        let rest_call = self.rest_call()?;
        let expanded: Arc<[MethodVariant]> = expand_variants(
            self.group.context(),
            self.group.group().is_named(),
            self.op,
            self.effective_parameters(),
            &rest_call,
        )?
        .into();
        Ok(Arc::clone(self.cache.variants.get_or_init(|| expanded)))
    }

    /// Presence-check targets for the full or the required-only overload.
    pub fn validation_targets(&self, only_required: bool) -> Vec<String> {
        let ctx = self.group.context();
        validation_targets(
            ctx.settings(),
            ctx.namer(),
            self.group.group().is_named(),
            self.effective_parameters(),
            only_required,
        )
    }

    /// Descriptor and variants together.
    pub fn lower(&self) -> Result<LoweredOperation, LoweringError> {
        Ok(LoweredOperation {
            operation: self.op.name.clone(),
            rest_call: self.rest_call()?,
            variants: self.variants()?,
        })
    }
}
