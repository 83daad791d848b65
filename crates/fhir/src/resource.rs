//! Resources and the polymorphic resource envelope.
//!
//! Fields declared as "any resource" (`DomainResource.contained`,
//! `Bundle.entry.resource`) hold a [`ResourceEnvelope`]. Decoders read the
//! discriminant, ask the [`registry`] for an empty instance of that type and decode
//! into it through [`Composite`]; nothing downstream matches on a closed list of
//! resource types.

use crate::element::Composite;
use std::fmt;

/// A FHIR resource: a composite with a `resourceType` discriminant.
pub trait Resource: Composite {
    /// The wire discriminant (`Patient`).
    fn resource_type(&self) -> &'static str {
        self.type_info().name
    }

    /// Logical id, when set.
    fn resource_id(&self) -> Option<&str>;

    fn clone_resource(&self) -> Box<dyn Resource>;
}

/// Owned, type-erased resource.
pub struct ResourceEnvelope(Box<dyn Resource>);

impl ResourceEnvelope {
    pub fn new<T: Resource>(resource: T) -> Self {
        Self(Box::new(resource))
    }

    pub fn from_boxed(resource: Box<dyn Resource>) -> Self {
        Self(resource)
    }

    pub fn resource_type(&self) -> &'static str {
        self.0.resource_type()
    }

    pub fn as_resource(&self) -> &dyn Resource {
        &*self.0
    }

    pub fn as_resource_mut(&mut self) -> &mut dyn Resource {
        &mut *self.0
    }

    pub fn as_composite(&self) -> &dyn Composite {
        &*self.0
    }

    pub fn as_composite_mut(&mut self) -> &mut dyn Composite {
        &mut *self.0
    }

    pub fn downcast_ref<T: Resource>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Resource>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut()
    }

    pub fn into_inner(self) -> Box<dyn Resource> {
        self.0
    }
}

impl Clone for ResourceEnvelope {
    fn clone(&self) -> Self {
        Self(self.0.clone_resource())
    }
}

impl PartialEq for ResourceEnvelope {
    fn eq(&self, other: &Self) -> bool {
        self.0.equal(other.as_composite()) == Some(true)
    }
}

impl fmt::Debug for ResourceEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceEnvelope").field(&self.0).finish()
    }
}

/// The resource types this crate can instantiate by discriminant.
pub mod registry {
    use super::Resource;
    use crate::resources::{Bundle, Observation, Organization, Patient};
    use once_cell::sync::Lazy;
    use std::collections::HashMap;
    use tracing::debug;

    /// Creates an empty resource.
    pub type Factory = fn() -> Box<dyn Resource>;

    fn factory<T: Resource + Default>() -> Box<dyn Resource> {
        Box::new(T::default())
    }

    static REGISTRY: Lazy<HashMap<&'static str, Factory>> = Lazy::new(|| {
        let factories: [Factory; 4] = [
            factory::<Bundle>,
            factory::<Observation>,
            factory::<Organization>,
            factory::<Patient>,
        ];
        let registry: HashMap<&'static str, Factory> = factories
            .into_iter()
            .map(|make| (make().resource_type(), make))
            .collect();
        debug!(resource_types = registry.len(), "Initialized resource registry");
        registry
    });

    /// An empty resource of the given type, or `None` for an unknown discriminant.
    pub fn instantiate(resource_type: &str) -> Option<Box<dyn Resource>> {
        REGISTRY.get(resource_type).map(|make| make())
    }

    pub fn is_known(resource_type: &str) -> bool {
        REGISTRY.contains_key(resource_type)
    }

    /// Registered discriminants, sorted.
    pub fn resource_types() -> Vec<&'static str> {
        let mut types: Vec<_> = REGISTRY.keys().copied().collect();
        types.sort_unstable();
        types
    }
}
