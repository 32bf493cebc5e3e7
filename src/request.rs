//! Request boundary
//!
//! The host framework is opaque to this crate; all the middleware needs from a
//! request is a bag of named, typed attributes. The router stores its
//! [`RouteContext`] under [`ROUTE_CONTEXT_ATTRIBUTE`] and the middleware
//! stores the per-request navigation under [`NAVIGATION_ATTRIBUTE`].

use crate::{NavigationContainer, RouteContext};
use std::any::Any;
use std::collections::HashMap;

/// Attribute holding the [`RouteContext`] produced by the router.
pub const ROUTE_CONTEXT_ATTRIBUTE: &str = "route_context";

/// Attribute holding the [`RequestNavigation`] injected by the middleware.
pub const NAVIGATION_ATTRIBUTE: &str = "navigation";

/// An incoming request: a path plus named attributes of arbitrary type.
#[derive(Debug, Default)]
pub struct Request {
    /// Request path
    pub path: String,
    attributes: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Request {
    /// Create a request for `path` without attributes
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style [`set_attribute`](Self::set_attribute)
    pub fn with_attribute<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Attach the router's outcome under [`ROUTE_CONTEXT_ATTRIBUTE`]
    pub fn with_route_context(self, context: RouteContext) -> Self {
        self.with_attribute(ROUTE_CONTEXT_ATTRIBUTE, context)
    }

    /// Store an attribute, replacing any previous value of any type
    pub fn set_attribute<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.attributes.insert(name.into(), Box::new(value));
    }

    /// Read an attribute; `None` when absent or of another type
    pub fn attribute<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name)?.downcast_ref::<T>()
    }

    /// Mutable access to an attribute; `None` when absent or of another type
    pub fn attribute_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.attributes.get_mut(name)?.downcast_mut::<T>()
    }

    /// Remove and return an attribute
    ///
    /// An attribute of another type is left in place and `None` is returned.
    pub fn take_attribute<T: Any>(&mut self, name: &str) -> Option<T> {
        if !self.attributes.get(name)?.is::<T>() {
            return None;
        }
        let boxed = self.attributes.remove(name)?;
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Whether an attribute of any type is stored under `name`
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The router's outcome, if the request has been routed
    pub fn route_context(&self) -> Option<&RouteContext> {
        self.attribute(ROUTE_CONTEXT_ATTRIBUTE)
    }

    /// Navigation injected by the middleware
    pub fn navigation(&self) -> Option<&RequestNavigation> {
        self.attribute(NAVIGATION_ATTRIBUTE)
    }

    /// Mutable navigation injected by the middleware
    pub fn navigation_mut(&mut self) -> Option<&mut RequestNavigation> {
        self.attribute_mut(NAVIGATION_ATTRIBUTE)
    }
}

/// The navigation containers of one request, with the route context applied.
///
/// Containers keep the order the middleware holds them in. Containers built
/// through a factory also carry their service name.
#[derive(Debug, Clone, Default)]
pub struct RequestNavigation {
    containers: Vec<(Option<String>, NavigationContainer)>,
}

impl RequestNavigation {
    pub(crate) fn push(&mut self, name: Option<String>, container: NavigationContainer) {
        self.containers.push((name, container));
    }

    /// Container at `index`
    pub fn get(&self, index: usize) -> Option<&NavigationContainer> {
        self.containers.get(index).map(|(_, c)| c)
    }

    /// Mutable container at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut NavigationContainer> {
        self.containers.get_mut(index).map(|(_, c)| c)
    }

    /// Container registered under the service `name`
    pub fn named(&self, name: &str) -> Option<&NavigationContainer> {
        self.containers
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, c)| c)
    }

    /// Mutable container registered under the service `name`
    pub fn named_mut(&mut self, name: &str) -> Option<&mut NavigationContainer> {
        self.containers
            .iter_mut()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, c)| c)
    }

    /// Containers in order
    pub fn iter(&self) -> impl Iterator<Item = &NavigationContainer> {
        self.containers.iter().map(|(_, c)| c)
    }

    /// Number of containers
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether no container was injected
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
