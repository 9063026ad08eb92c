//! Resource trait for declarative state management
//!
//! A Resource knows how to bring one kind of thing into existence, how to
//! tell whether a previously created instance still matches what was
//! declared, and how to forget it. Instances carry no state of their own:
//! everything lives in the [`ResourceData`] record the host persists.

use crate::context::ApplyContext;
use crate::types::ResourceData;
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// The four lifecycle operations mirror how a reconciliation host drives a
/// resource:
///
/// - `create` on first apply (no persisted id)
/// - `exists` on every later pass, to detect drift
/// - `read` after `exists` confirmed a match
/// - `delete` when the resource is no longer declared, or before a
///   replacement
///
/// # Example
///
/// ```ignore
/// use declarative::{ApplyContext, Resource, ResourceData};
///
/// #[derive(Debug)]
/// struct Marker;
///
/// impl Resource for Marker {
///     fn resource_type(&self) -> &'static str {
///         "marker"
///     }
///
///     fn describe(&self, data: &ResourceData) -> String {
///         format!("Marker {}", data.get_str("name").unwrap_or("?"))
///     }
///
///     fn create(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> anyhow::Result<()> {
///         let name = data.get_str("name").unwrap_or_default().to_string();
///         data.set_id(name);
///         Ok(())
///     }
///
///     fn exists(&self, data: &ResourceData, _ctx: &ApplyContext) -> anyhow::Result<bool> {
///         Ok(data.has_id())
///     }
///
///     fn read(&self, _data: &mut ResourceData, _ctx: &ApplyContext) -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn delete(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> anyhow::Result<()> {
///         data.clear_id();
///         Ok(())
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Resource type category
    ///
    /// Used for grouping, filtering and target addresses (`type.name`).
    fn resource_type(&self) -> &'static str;

    /// Human-readable description of one instance
    fn describe(&self, data: &ResourceData) -> String;

    /// Attributes whose change forces the resource to be replaced
    fn force_new_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Bring the resource into existence and populate computed attributes
    ///
    /// Must set an id on success. On error the record must not be
    /// persisted; the executor only commits after this returns `Ok`.
    fn create(&self, data: &mut ResourceData, ctx: &ApplyContext) -> Result<()>;

    /// Check whether the persisted record still matches reality
    ///
    /// Must not mutate the record. A record without an id never exists.
    fn exists(&self, data: &ResourceData, ctx: &ApplyContext) -> Result<bool>;

    /// Refresh computed attributes after `exists` returned `true`
    fn read(&self, data: &mut ResourceData, ctx: &ApplyContext) -> Result<()>;

    /// Remove the resource, leaving the record without an id
    fn delete(&self, data: &mut ResourceData, ctx: &ApplyContext) -> Result<()>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;

/// Extension trait for working with resources
pub trait ResourceExt {
    /// Check whether changing `attribute` forces replacement
    fn forces_new(&self, attribute: &str) -> bool;
}

impl<R: Resource + ?Sized> ResourceExt for R {
    fn forces_new(&self, attribute: &str) -> bool {
        self.force_new_attributes().contains(&attribute)
    }
}
