//! Route propagation middleware
//!
//! [`NavigationMiddleware`] sits in the request pipeline after the router. For
//! every routed request it copies each navigation container it holds, attaches
//! the request's [`RouteContext`] to every route-bound node of the copies, and
//! hands the copies to the next handler through the request's
//! [`NAVIGATION_ATTRIBUTE`](crate::NAVIGATION_ATTRIBUTE).
//!
//! The containers held by the middleware are shared by all requests and are
//! never written to, so parallel requests for different routes cannot observe
//! each other's context.
//!
//! # Example
//!
//! ```
//! use route_navigation::*;
//! use std::sync::Arc;
//!
//! let container = NavigationContainer::from_nodes(vec![
//!     NavigationNode::routed("home").unwrap(),
//!     NavigationNode::routed("about").unwrap(),
//! ]);
//! let middleware = NavigationMiddleware::new(vec![Arc::new(container)]);
//!
//! let request = Request::new("/about")
//!     .with_route_context(RouteContext::matched("about", RouteParams::new()));
//!
//! let active = pollster::block_on(middleware.process(request, |mut request: Request| async move {
//!     let navigation = request.navigation_mut().unwrap();
//!     let about = navigation.get_mut(0).unwrap().find_by_route_mut("about").unwrap();
//!     about.is_active(false)
//! }));
//! assert!(active);
//! ```

use crate::error::{NavigationError, Result};
use crate::request::{RequestNavigation, NAVIGATION_ATTRIBUTE};
use crate::{
    debug_log, trace_log, warn_log, ContainerFactory, NavigationContainer, Request, RouteContext,
    SharedContainer,
};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// The rest of the pipeline, invoked exactly once per request.
///
/// Implemented for every `FnOnce(Request) -> impl Future`, so a closure or an
/// async function can be passed as `next`.
pub trait Next {
    /// What the pipeline produces, typically a response or a `Result` of one
    type Output;
    /// The future returned by [`run`](Self::run)
    type Future: Future<Output = Self::Output>;

    /// Hand the request to the rest of the pipeline
    fn run(self, request: Request) -> Self::Future;
}

impl<F, Fut> Next for F
where
    F: FnOnce(Request) -> Fut,
    Fut: Future,
{
    type Output = Fut::Output;
    type Future = Fut;

    fn run(self, request: Request) -> Self::Future {
        self(request)
    }
}

/// Pipeline middleware injecting the matched route into navigation containers.
#[derive(Debug, Clone, Default)]
pub struct NavigationMiddleware {
    containers: Vec<(Option<String>, SharedContainer)>,
}

impl NavigationMiddleware {
    /// Hold `containers`, in order
    pub fn new(containers: impl IntoIterator<Item = SharedContainer>) -> Self {
        Self {
            containers: containers.into_iter().map(|c| (None, c)).collect(),
        }
    }

    /// Hold containers registered under service names
    pub fn named(containers: impl IntoIterator<Item = (String, SharedContainer)>) -> Self {
        Self {
            containers: containers
                .into_iter()
                .map(|(name, c)| (Some(name), c))
                .collect(),
        }
    }

    /// Hold containers pulled out of an untyped service registry
    ///
    /// Every element must be a [`SharedContainer`] or a [`NavigationContainer`];
    /// anything else fails with `Construction`.
    pub fn from_services(services: Vec<Arc<dyn Any + Send + Sync>>) -> Result<Self> {
        let containers = services
            .into_iter()
            .enumerate()
            .map(|(index, service)| downcast_container(index, service))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(containers))
    }

    /// Hold every container configured for `factory`, under its service name
    ///
    /// Containers are the factory's memoized instances, built on demand.
    pub fn from_factory(factory: &ContainerFactory) -> Result<Self> {
        factory.middleware()
    }

    /// Number of held containers
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the middleware holds no container
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Held containers, in order
    pub fn containers(&self) -> impl Iterator<Item = &SharedContainer> {
        self.containers.iter().map(|(_, c)| c)
    }

    /// Copies of the held containers with `context` attached to every route-bound node
    pub fn inject(&self, context: &RouteContext) -> RequestNavigation {
        let context = Arc::new(context.clone());
        let mut navigation = RequestNavigation::default();

        for (name, shared) in &self.containers {
            let mut container = NavigationContainer::clone(shared);
            let mut injected = 0_usize;
            container.visit_mut(|node| {
                if node.set_route_context(Arc::clone(&context)) {
                    injected += 1;
                }
            });
            trace_log!(
                "Attached route context to {} nodes of container {:?}",
                injected,
                name
            );
            navigation.push(name.clone(), container);
        }

        navigation
    }

    /// Propagate the request's route context, then run `next`
    ///
    /// A request without a [`RouteContext`] attribute (or with a value of
    /// another type) is passed through untouched. `next` is always called
    /// exactly once and its output is returned as is.
    pub async fn process<N: Next>(&self, mut request: Request, next: N) -> N::Output {
        let navigation = request
            .route_context()
            .filter(|_| !self.containers.is_empty())
            .map(|context| {
                debug_log!(
                    "Propagating route {:?} into {} navigation containers",
                    context.matched_route_name(),
                    self.containers.len()
                );
                self.inject(context)
            });

        match navigation {
            Some(navigation) => request.set_attribute(NAVIGATION_ATTRIBUTE, navigation),
            None => {
                trace_log!("No route context on request '{}', passing through", request.path);
            }
        }

        next.run(request).await
    }
}

fn downcast_container(index: usize, service: Arc<dyn Any + Send + Sync>) -> Result<SharedContainer> {
    let service = match service.downcast::<NavigationContainer>() {
        Ok(container) => return Ok(container),
        Err(service) => service,
    };
    if let Some(shared) = service.downcast_ref::<SharedContainer>() {
        return Ok(Arc::clone(shared));
    }

    let found = describe(service.as_ref());
    warn_log!("Rejected navigation middleware service {}: {}", index, found);
    Err(NavigationError::Construction { index, found })
}

fn describe(service: &(dyn Any + Send + Sync)) -> String {
    if service.is::<String>() || service.is::<&str>() {
        "a string".to_string()
    } else if service.is::<crate::NavigationNode>() {
        "a navigation node".to_string()
    } else {
        "a value of another type".to_string()
    }
}
