//! Group driver: lowers every operation of a method group.

use opgen_common::{MethodGroup, NameScope};
use rayon::prelude::*;
use tracing::info;

use crate::context::LoweringContext;
use crate::error::LoweringError;
use crate::ir::LoweredOperation;
use crate::operation::{OperationCache, OperationLowering};

/// Lowering state for one method group.
///
/// Owns the group's name scope and the per-operation caches. Operations can
/// be lowered in any order, or in parallel.
#[derive(Debug)]
pub struct GroupLowering<'a> {
    ctx: &'a LoweringContext,
    group: &'a MethodGroup,
    scope: NameScope,
    caches: Vec<OperationCache>,
}

impl<'a> GroupLowering<'a> {
    /// Prepare a group for lowering, rejecting duplicate operation names.
    pub fn new(ctx: &'a LoweringContext, group: &'a MethodGroup) -> Result<Self, LoweringError> {
        group.validate()?;
        Ok(Self {
            ctx,
            group,
            scope: NameScope::new(&group.identifiers),
            caches: group
                .operations
                .iter()
                .map(|_| OperationCache::default())
                .collect(),
        })
    }

    /// Shared settings and collaborators.
    pub fn context(&self) -> &'a LoweringContext {
        self.ctx
    }

    /// The group being lowered.
    pub fn group(&self) -> &'a MethodGroup {
        self.group
    }

    /// The group's name scope.
    pub fn scope(&self) -> &NameScope {
        &self.scope
    }

    /// Number of operations in the group.
    pub fn len(&self) -> usize {
        self.group.operations.len()
    }

    /// Whether the group has no operations.
    pub fn is_empty(&self) -> bool {
        self.group.operations.is_empty()
    }

    /// Handle for the operation at `index`.
    pub fn operation(&self, index: usize) -> Result<OperationLowering<'_, 'a>, LoweringError> {
        match (self.group.operations.get(index), self.caches.get(index)) {
            (Some(op), Some(cache)) => Ok(OperationLowering::new(self, op, cache)),
            _ => Err(LoweringError::UnknownOperation {
                group: self.group.name.clone(),
                index,
            }),
        }
    }

    /// Lower every operation in declaration order.
    pub fn lower_all(&self) -> Result<Vec<LoweredOperation>, LoweringError> {
        let lowered = (0..self.len())
            .map(|index| self.operation(index)?.lower())
            .collect::<Result<Vec<_>, _>>()?;
        info!(group = %self.group.name, operations = lowered.len(), "Lowered method group.");
        Ok(lowered)
    }

    /// Lower every operation on the rayon pool; output is in declaration order.
    pub fn lower_all_parallel(&self) -> Result<Vec<LoweredOperation>, LoweringError> {
        let lowered = (0..self.len())
            .into_par_iter()
            .map(|index| self.operation(index)?.lower())
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            group = %self.group.name,
            operations = lowered.len(),
            "Lowered method group in parallel."
        );
        Ok(lowered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use opgen_common::{HttpMethod, OperationDescription};

    #[test]
    fn test_unknown_operation_index() {
        let ctx = LoweringContext::default();
        let group =
            MethodGroup::new("Widgets", vec![OperationDescription::new("Get", HttpMethod::Get, "/a")])
                .unwrap();
        let lowering = GroupLowering::new(&ctx, &group).unwrap();
        assert!(lowering.operation(0).is_ok());
        assert!(matches!(
            lowering.operation(1),
            Err(LoweringError::UnknownOperation { index: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected_on_construction() {
        let ctx = LoweringContext::default();
        let group = MethodGroup {
            name: "Widgets".to_string(),
            operations: vec![
                OperationDescription::new("Get", HttpMethod::Get, "/a"),
                OperationDescription::new("GET", HttpMethod::Get, "/b"),
            ],
            identifiers: Vec::new(),
        };
        assert!(matches!(
            GroupLowering::new(&ctx, &group),
            Err(LoweringError::Model(_))
        ));
    }

    #[test]
    fn test_identifiers_in_scope_are_avoided() {
        let ctx = LoweringContext::default();
        let group = MethodGroup {
            name: "Widgets".to_string(),
            operations: vec![OperationDescription::new(
                "Remove",
                HttpMethod::Delete,
                "/subscriptions/{s}/resourceGroups/{rg}/providers/Microsoft.Test/widgets/{name}",
            )],
            identifiers: vec!["delete".to_string()],
        };
        let lowering = GroupLowering::new(&ctx, &group).unwrap();
        let rest_call = lowering.operation(0).unwrap().rest_call().unwrap();
        assert_eq!(rest_call.name, "delete1");
    }
}
