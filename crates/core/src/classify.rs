//! Shape-based classification of operations into well-known roles.
//!
//! A role is inferred from the HTTP verb and URL structure alone, and only
//! applied when it is unambiguous among the operation's siblings.

use opgen_common::{DescriptionModel, HttpMethod, MethodGroup, OperationDescription, UniqueNames};
use tracing::debug;

use crate::context::LoweringContext;

/// Conventional roles an operation can be recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownRole {
    /// `GET /subscriptions/{id}/providers/{ns}/{type}` returning a sequence.
    ListBySubscription,
    /// `GET` over a resource group collection returning a sequence.
    ListByResourceGroup,
    /// `DELETE` on a top-level resource.
    Delete,
    /// `GET` on a top-level resource.
    GetByResourceGroup,
}

impl WellKnownRole {
    /// The conventional method name for this role.
    pub fn method_name(self) -> &'static str {
        match self {
            WellKnownRole::ListBySubscription => "List",
            WellKnownRole::ListByResourceGroup => "ListByResourceGroup",
            WellKnownRole::Delete => "Delete",
            WellKnownRole::GetByResourceGroup => "GetByResourceGroup",
        }
    }

    /// Whether a method carrying this role's name is presented as one page.
    pub fn simulates_paging(self) -> bool {
        matches!(
            self,
            WellKnownRole::ListBySubscription | WellKnownRole::ListByResourceGroup
        )
    }
}

/// Split a URL template into segments, ignoring leading and trailing slashes.
pub fn url_segments(url: &str) -> Vec<&str> {
    url.trim_matches('/').split('/').collect()
}

/// Classify one operation in isolation.
pub fn classify(model: &dyn DescriptionModel, op: &OperationDescription) -> Option<WellKnownRole> {
    let segments = url_segments(&op.url);
    match op.method {
        HttpMethod::Get => {
            let returns_sequence = op
                .returns
                .body
                .as_ref()
                .is_some_and(|body| model.is_sequence_type(body));
            if matches!(segments.len(), 5 | 7)
                && segments[0].eq_ignore_ascii_case("subscriptions")
                && returns_sequence
            {
                if segments.len() == 5 {
                    if segments[2].eq_ignore_ascii_case("providers") {
                        Some(WellKnownRole::ListBySubscription)
                    } else {
                        Some(WellKnownRole::ListByResourceGroup)
                    }
                } else if segments[2].eq_ignore_ascii_case("resourceGroups") {
                    Some(WellKnownRole::ListByResourceGroup)
                } else {
                    None
                }
            } else if model.is_top_level_resource_url(&segments) {
                Some(WellKnownRole::GetByResourceGroup)
            } else {
                None
            }
        }
        HttpMethod::Delete => model
            .is_top_level_resource_url(&segments)
            .then_some(WellKnownRole::Delete),
        _ => None,
    }
}

/// The role of `op`, if its group is named and no sibling shares it.
pub fn well_known_role(
    model: &dyn DescriptionModel,
    group: &MethodGroup,
    op: &OperationDescription,
) -> Option<WellKnownRole> {
    if !group.is_named() {
        return None;
    }
    let role = classify(model, op)?;
    let same_role = group
        .operations
        .iter()
        .filter(|sibling| classify(model, sibling) == Some(role))
        .count();
    if same_role == 1 {
        Some(role)
    } else {
        debug!(
            operation = %op.name,
            role = ?role,
            count = same_role,
            "Role is ambiguous among siblings, keeping declared name."
        );
        None
    }
}

/// Resolved method name and the role it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Camel-cased method name.
    pub name: String,
    /// Role whose conventional name was applied.
    pub role: Option<WellKnownRole>,
}

/// Resolve the method name of `op`, applying its well-known name when one
/// is unambiguous.
pub fn resolve_name(
    ctx: &LoweringContext,
    scope: &dyn UniqueNames,
    group: &MethodGroup,
    op: &OperationDescription,
) -> ResolvedName {
    let namer = ctx.namer();
    match well_known_role(ctx.model(), group, op) {
        Some(role) => {
            let siblings: Vec<&str> = group
                .operations
                .iter()
                .filter(|sibling| sibling.name != op.name)
                .map(|sibling| sibling.name.as_str())
                .collect();
            let unique = scope.get_unique(&op.name, role.method_name(), &siblings);
            ResolvedName {
                name: namer.camel_case(&unique),
                role: Some(role),
            }
        }
        None => ResolvedName {
            name: namer.camel_case(&op.name),
            role: None,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use opgen_common::{ModelType, NameScope, StandardModel};

    const RESOURCE: &str =
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Test/widgets/{widgetName}";

    fn list_op(name: &str, url: &str) -> OperationDescription {
        OperationDescription::new(name, HttpMethod::Get, url)
            .returning(200, ModelType::sequence(ModelType::composite("Widget")))
    }

    #[test]
    fn test_url_segments_trims_slashes() {
        assert_eq!(url_segments("//a/b/"), vec!["a", "b"]);
        assert_eq!(url_segments(""), vec![""]);
    }

    #[test]
    fn test_classify_list_shapes() {
        let model = StandardModel;
        let by_sub = list_op(
            "ListAll",
            "/subscriptions/{s}/providers/Microsoft.Test/widgets",
        );
        assert_eq!(
            classify(&model, &by_sub),
            Some(WellKnownRole::ListBySubscription)
        );

        let by_rg_short = list_op("ListRg", "/subscriptions/{s}/resourceGroups/{rg}/widgets");
        assert_eq!(
            classify(&model, &by_rg_short),
            Some(WellKnownRole::ListByResourceGroup)
        );

        let by_rg = list_op(
            "ListRg",
            "/subscriptions/{s}/resourceGroups/{rg}/providers/Microsoft.Test/widgets",
        );
        assert_eq!(
            classify(&model, &by_rg),
            Some(WellKnownRole::ListByResourceGroup)
        );

        let other = list_op(
            "ListLoc",
            "/subscriptions/{s}/locations/{l}/providers/Microsoft.Test/widgets",
        );
        assert_eq!(classify(&model, &other), None);
    }

    #[test]
    fn test_classify_requires_sequence_for_lists() {
        let model = StandardModel;
        let op = OperationDescription::new(
            "Get",
            HttpMethod::Get,
            "/subscriptions/{s}/providers/Microsoft.Test/widgets",
        )
        .returning(200, ModelType::composite("Widget"));
        assert_eq!(classify(&model, &op), None);
    }

    #[test]
    fn test_classify_top_level_resource() {
        let model = StandardModel;
        let get = OperationDescription::new("Get", HttpMethod::Get, RESOURCE)
            .returning(200, ModelType::composite("Widget"));
        assert_eq!(
            classify(&model, &get),
            Some(WellKnownRole::GetByResourceGroup)
        );

        let delete = OperationDescription::new("Remove", HttpMethod::Delete, RESOURCE);
        assert_eq!(classify(&model, &delete), Some(WellKnownRole::Delete));

        let put = OperationDescription::new("Create", HttpMethod::Put, RESOURCE);
        assert_eq!(classify(&model, &put), None);
    }

    #[test]
    fn test_unnamed_group_skips_classification() {
        let model = StandardModel;
        let op = OperationDescription::new("Remove", HttpMethod::Delete, RESOURCE);
        let group = MethodGroup::new("", vec![op.clone()]).unwrap();
        assert_eq!(well_known_role(&model, &group, &op), None);
    }

    #[test]
    fn test_resolve_name_applies_unique_role() {
        let ctx = LoweringContext::default();
        let op = OperationDescription::new("Remove", HttpMethod::Delete, RESOURCE);
        let group = MethodGroup::new("Widgets", vec![op.clone()]).unwrap();
        let scope = NameScope::default();

        let resolved = resolve_name(&ctx, &scope, &group, &op);
        assert_eq!(resolved.name, "delete");
        assert_eq!(resolved.role, Some(WellKnownRole::Delete));
    }

    #[test]
    fn test_resolve_name_avoids_sibling_collision() {
        let ctx = LoweringContext::default();
        let all = list_op(
            "ListAll",
            "/subscriptions/{s}/providers/Microsoft.Test/widgets",
        );
        let other = OperationDescription::new("List", HttpMethod::Post, "/widgets/list");
        let group = MethodGroup::new("Widgets", vec![all.clone(), other]).unwrap();
        let scope = NameScope::default();

        let resolved = resolve_name(&ctx, &scope, &group, &all);
        assert_eq!(resolved.name, "list1");
        assert!(resolved.role.is_some_and(WellKnownRole::simulates_paging));
    }
}
