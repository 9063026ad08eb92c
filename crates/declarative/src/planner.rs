//! Execution planner - builds lifecycle execution plans

use crate::diff::{Action, ResourceDiff, plan_changes};
use crate::resource::Resource;
use crate::types::ResourceData;
use std::collections::BTreeMap;

/// An ordered list of planned changes for one resource type
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub changes: Vec<ResourceDiff>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Plan convergence of persisted records towards the declared ones
    pub fn reconcile(
        resource: &dyn Resource,
        declared: &BTreeMap<String, ResourceData>,
        prior: &BTreeMap<String, ResourceData>,
    ) -> Self {
        Self {
            changes: plan_changes(resource, declared, prior),
        }
    }

    /// Plan deletion of every persisted record
    pub fn destroy(resource: &dyn Resource, prior: &BTreeMap<String, ResourceData>) -> Self {
        Self {
            changes: plan_changes(resource, &BTreeMap::new(), prior),
        }
    }

    /// Filter plan to only include changes matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&ResourceDiff) -> bool,
    {
        Self {
            changes: self.changes.into_iter().filter(|c| predicate(c)).collect(),
        }
    }

    /// Filter plan to only include changes matching a target pattern
    ///
    /// Target format: "name" or "type.name"
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (resource_type, name) = parse_target(t);
                self.filter(|c| matches_filter(c, resource_type.as_deref(), name.as_deref()))
            }
        }
    }

    /// Total number of changes in the plan
    pub fn total_changes(&self) -> usize {
        self.changes.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Check if plan has changes that need a drift check first
    pub fn has_refreshes(&self) -> bool {
        self.changes.iter().any(|c| c.action == Action::Refresh)
    }
}

/// Parse a target string like "type.name" into (type, name)
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = target.split('.').collect();
    match parts.len() {
        1 => (None, Some(parts[0].to_string())),
        2 => (Some(parts[0].to_string()), Some(parts[1].to_string())),
        _ => (None, Some(target.to_string())),
    }
}

/// Check if a change matches the filter criteria
fn matches_filter(change: &ResourceDiff, resource_type: Option<&str>, name: Option<&str>) -> bool {
    if let Some(rt) = resource_type
        && change.resource_type != rt
    {
        return false;
    }

    if let Some(n) = name
        && change.name != n
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::tests::Named;

    fn state(names: &[&str]) -> BTreeMap<String, ResourceData> {
        names
            .iter()
            .map(|n| {
                let mut data = ResourceData::new().with_attribute("value", *n);
                data.set_id(*n);
                ((*n).to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("hello"), (None, Some("hello".to_string())));
        assert_eq!(
            parse_target("command.hello"),
            (Some("command".to_string()), Some("hello".to_string()))
        );
        assert_eq!(parse_target("a.b.c"), (None, Some("a.b.c".to_string())));
    }

    #[test]
    fn test_destroy_plans_every_persisted_record() {
        let plan = ExecutionPlan::destroy(&Named, &state(&["a", "b"]));
        assert_eq!(plan.total_changes(), 2);
        assert!(plan.changes.iter().all(ResourceDiff::is_removal));
    }

    #[test]
    fn test_filter_by_target() {
        let plan = ExecutionPlan::destroy(&Named, &state(&["a", "b"]));
        let only_b = plan.clone().filter_by_target(Some("b"));
        assert_eq!(only_b.total_changes(), 1);
        assert_eq!(only_b.changes[0].name, "b");

        let typed = plan.clone().filter_by_target(Some("named.a"));
        assert_eq!(typed.changes[0].name, "a");

        let wrong_type = plan.filter_by_target(Some("other.a"));
        assert!(wrong_type.is_empty());
    }

    #[test]
    fn test_reconcile_marks_refreshes() {
        let prior = state(&["a"]);
        let declared = prior.clone();
        let plan = ExecutionPlan::reconcile(&Named, &declared, &prior);
        assert!(plan.has_refreshes());
    }
}
