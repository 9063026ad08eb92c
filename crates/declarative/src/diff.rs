//! Change computation between declared and persisted records

use crate::resource::{Resource, ResourceExt};
use crate::types::ResourceData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a resource has to be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaceReason {
    /// Force-new attributes differ between declaration and state
    Changed { attributes: Vec<String> },
    /// The persisted record no longer matches a fresh check
    Drift,
}

/// What has to happen to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Declared but never created
    Create,
    /// Delete the persisted instance, then create from the declaration
    Replace { reason: ReplaceReason },
    /// Persisted and unchanged in config; needs an `exists` check
    Refresh,
    /// Persisted but no longer declared
    Delete,
}

/// A planned change for one named resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Name of the resource in config and state
    pub name: String,
    /// Type of the resource
    pub resource_type: String,
    /// Planned action
    pub action: Action,
    /// Declared record, absent for deletions
    pub declared: Option<ResourceData>,
    /// Persisted record, absent for creations
    pub prior: Option<ResourceData>,
}

impl ResourceDiff {
    /// Address of the resource as `type.name`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        matches!(self.action, Action::Create)
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        matches!(self.action, Action::Delete)
    }

    /// Check if this diff represents a replacement
    pub fn is_replacement(&self) -> bool {
        matches!(self.action, Action::Replace { .. })
    }

    /// Whether the outcome is already known to change something
    pub fn is_change(&self) -> bool {
        !matches!(self.action, Action::Refresh)
    }
}

/// Compute planned changes for one resource type
///
/// Declared names are visited in order, followed by deletions of persisted
/// names that are no longer declared. A persisted record without an id
/// counts as absent.
pub fn plan_changes(
    resource: &dyn Resource,
    declared: &BTreeMap<String, ResourceData>,
    prior: &BTreeMap<String, ResourceData>,
) -> Vec<ResourceDiff> {
    let resource_type = resource.resource_type().to_string();
    let mut diffs = Vec::new();

    for (name, decl) in declared {
        let existing = prior.get(name).filter(|p| p.has_id());
        let action = match existing {
            None => Action::Create,
            Some(p) => {
                let attributes = changed_force_new(resource, decl, p);
                if attributes.is_empty() {
                    Action::Refresh
                } else {
                    Action::Replace {
                        reason: ReplaceReason::Changed { attributes },
                    }
                }
            }
        };

        diffs.push(ResourceDiff {
            name: name.clone(),
            resource_type: resource_type.clone(),
            action,
            declared: Some(decl.clone()),
            prior: existing.cloned(),
        });
    }

    for (name, p) in prior {
        if declared.contains_key(name) || !p.has_id() {
            continue;
        }
        diffs.push(ResourceDiff {
            name: name.clone(),
            resource_type: resource_type.clone(),
            action: Action::Delete,
            declared: None,
            prior: Some(p.clone()),
        });
    }

    diffs
}

fn changed_force_new(
    resource: &dyn Resource,
    declared: &ResourceData,
    prior: &ResourceData,
) -> Vec<String> {
    declared
        .attributes()
        .keys()
        .chain(prior.attributes().keys())
        .filter(|key| resource.forces_new(key))
        .filter(|key| declared.get(key) != prior.get(key))
        .cloned()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources to replace
    pub replacements: usize,
    /// Number of resources that still need a drift check
    pub refreshes: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.action {
                Action::Create => summary.additions += 1,
                Action::Delete => summary.removals += 1,
                Action::Replace { .. } => summary.replacements += 1,
                Action::Refresh => summary.refreshes += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.replacements
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::ApplyContext;
    use anyhow::Result;

    #[derive(Debug)]
    pub(crate) struct Named;

    impl Resource for Named {
        fn resource_type(&self) -> &'static str {
            "named"
        }

        fn describe(&self, data: &ResourceData) -> String {
            format!("Named {}", data.get_str("value").unwrap_or_default())
        }

        fn force_new_attributes(&self) -> &'static [&'static str] {
            &["value"]
        }

        fn create(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
            data.set_id("id");
            Ok(())
        }

        fn exists(&self, data: &ResourceData, _ctx: &ApplyContext) -> Result<bool> {
            Ok(data.has_id())
        }

        fn read(&self, _data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
            Ok(())
        }

        fn delete(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
            data.clear_id();
            Ok(())
        }
    }

    fn record(value: &str, id: Option<&str>) -> ResourceData {
        let mut data = ResourceData::new().with_attribute("value", value);
        if let Some(id) = id {
            data.set_id(id);
        }
        data
    }

    #[test]
    fn test_plan_actions() {
        let declared = BTreeMap::from([
            ("new".to_string(), record("a", None)),
            ("same".to_string(), record("b", None)),
            ("changed".to_string(), record("c2", None)),
        ]);
        let prior = BTreeMap::from([
            ("same".to_string(), record("b", Some("1"))),
            ("changed".to_string(), record("c1", Some("2"))),
            ("gone".to_string(), record("d", Some("3"))),
        ]);

        let diffs = plan_changes(&Named, &declared, &prior);
        let actions: Vec<_> = diffs
            .iter()
            .map(|d| (d.name.as_str(), d.action.clone()))
            .collect();

        assert_eq!(
            actions,
            vec![
                (
                    "changed",
                    Action::Replace {
                        reason: ReplaceReason::Changed {
                            attributes: vec!["value".to_string()]
                        }
                    }
                ),
                ("new", Action::Create),
                ("same", Action::Refresh),
                ("gone", Action::Delete),
            ]
        );
        assert_eq!(diffs[3].address(), "named.gone");
    }

    #[test]
    fn test_prior_without_id_is_absent() {
        let declared = BTreeMap::from([("x".to_string(), record("a", None))]);
        let prior = BTreeMap::from([
            ("x".to_string(), record("a", None)),
            ("y".to_string(), record("b", None)),
        ]);

        let diffs = plan_changes(&Named, &declared, &prior);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_addition());
        assert!(diffs[0].prior.is_none());
    }

    #[test]
    fn test_non_force_new_attribute_does_not_replace() {
        let mut decl = record("a", None);
        decl.set("note", "new");
        let mut prior_rec = record("a", Some("1"));
        prior_rec.set("text_output", "computed");

        let declared = BTreeMap::from([("x".to_string(), decl)]);
        let prior = BTreeMap::from([("x".to_string(), prior_rec)]);

        let diffs = plan_changes(&Named, &declared, &prior);
        assert_eq!(diffs[0].action, Action::Refresh);
    }

    #[test]
    fn test_summary() {
        let declared = BTreeMap::from([("new".to_string(), record("a", None))]);
        let prior = BTreeMap::from([("gone".to_string(), record("d", Some("3")))]);

        let summary = DiffSummary::from_diffs(&plan_changes(&Named, &declared, &prior));
        assert_eq!(summary.additions, 1);
        assert_eq!(summary.removals, 1);
        assert_eq!(summary.total(), 2);
        assert!(summary.has_changes());
    }
}
