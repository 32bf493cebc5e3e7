//! Navigation nodes
//!
//! A [`NavigationNode`] is one menu entry. It either points to a fixed URI
//! ([`NodeTarget::Unbound`]) or is bound to a named route
//! ([`NodeTarget::RouteBound`]), in which case its href is generated by a
//! [`UrlResolver`] and its active state is derived from the [`RouteContext`]
//! of the current request.

use crate::error::{NavigationError, Result};
use crate::resolver::{UrlResolver, UrlTarget};
use crate::{trace_log, QueryParams, RouteContext, RouteParams};
use std::fmt;
use std::sync::Arc;

/// Shared URL generation capability injected into route-bound nodes.
pub type SharedResolver = Arc<dyn UrlResolver>;

/// Route binding of a node: what to link to, plus per-request state.
#[derive(Clone, Default)]
pub struct RouteBinding {
    route: Option<String>,
    params: RouteParams,
    query: QueryParams,
    fragment: Option<String>,
    context: Option<Arc<RouteContext>>,
    resolver: Option<SharedResolver>,
    cached_href: Option<String>,
}

impl RouteBinding {
    /// Route name, `None` when the node links to the current route
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Route parameters
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Query parameters
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Fragment
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Attached route context, if the node has seen a routed request
    pub fn context(&self) -> Option<&RouteContext> {
        self.context.as_deref()
    }

    /// Injected resolver
    pub fn resolver(&self) -> Option<&SharedResolver> {
        self.resolver.as_ref()
    }

    /// Href computed by the last resolution, if still valid
    pub fn cached_href(&self) -> Option<&str> {
        self.cached_href.as_deref()
    }

    fn target(&self) -> UrlTarget<'_> {
        UrlTarget {
            route: self.route.as_deref(),
            params: &self.params,
            query: &self.query,
            fragment: self.fragment.as_deref(),
        }
    }
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .field("context", &self.context)
            .field("has_resolver", &self.resolver.is_some())
            .field("cached_href", &self.cached_href)
            .finish()
    }
}

/// What a node links to.
#[derive(Debug, Clone)]
pub enum NodeTarget {
    /// A plain entry with an optional fixed URI
    Unbound {
        /// The URI used as href
        uri: Option<String>,
    },
    /// An entry bound to a named route
    RouteBound(RouteBinding),
}

impl Default for NodeTarget {
    fn default() -> Self {
        Self::Unbound { uri: None }
    }
}

/// A menu entry with optional children.
///
/// # Example
///
/// ```
/// use route_navigation::{NavigationNode, RouteContext, RouteParams};
/// use std::sync::Arc;
///
/// let mut node = NavigationNode::routed("user.detail")
///     .unwrap()
///     .with_params(RouteParams::new().with("id", "7"));
///
/// node.set_route_context(Arc::new(RouteContext::matched(
///     "user.detail",
///     RouteParams::new().with("id", "7").with("tab", "posts"),
/// )));
///
/// assert!(node.is_active(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationNode {
    label: Option<String>,
    target: NodeTarget,
    active: bool,
    children: Vec<NavigationNode>,
}

impl NavigationNode {
    /// Create an unbound node without href
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unbound node pointing to a fixed URI
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            target: NodeTarget::Unbound {
                uri: Some(uri.into()),
            },
            ..Self::default()
        }
    }

    /// Create a node bound to the named route
    ///
    /// Fails with `InvalidArgument` if `route` is empty.
    pub fn routed(route: impl Into<String>) -> Result<Self> {
        let route = route.into();
        let mut node = Self::default();
        node.set_route(Some(route.as_str()))?;
        Ok(node)
    }

    /// Create a route-capable node that links to whatever route the request matched
    pub fn current_route() -> Self {
        Self {
            target: NodeTarget::RouteBound(RouteBinding::default()),
            ..Self::default()
        }
    }

    /// Set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set route parameters (ignored by unbound nodes)
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.set_params(Some(params));
        self
    }

    /// Set query parameters (ignored by unbound nodes)
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.set_query(Some(query));
        self
    }

    /// Set fragment (ignored by unbound nodes)
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.set_fragment(Some(fragment.into()));
        self
    }

    /// Set the resolver used by [`href`](Self::href)
    pub fn with_resolver(mut self, resolver: SharedResolver) -> Self {
        self.set_resolver(resolver);
        self
    }

    /// Mark the node as explicitly active
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: NavigationNode) -> Self {
        self.children.push(child);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set label
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// What the node links to
    pub fn target(&self) -> &NodeTarget {
        &self.target
    }

    /// Route binding, `None` for unbound nodes
    pub fn binding(&self) -> Option<&RouteBinding> {
        match &self.target {
            NodeTarget::RouteBound(binding) => Some(binding),
            NodeTarget::Unbound { .. } => None,
        }
    }

    /// Whether the node can receive a route context
    pub fn is_route_bound(&self) -> bool {
        self.binding().is_some()
    }

    /// Route name of a route-bound node
    pub fn route(&self) -> Option<&str> {
        self.binding().and_then(RouteBinding::route)
    }

    /// Route parameters (empty for unbound nodes)
    pub fn params(&self) -> RouteParams {
        self.binding()
            .map(|b| b.params.clone())
            .unwrap_or_default()
    }

    /// Query parameters (empty for unbound nodes)
    pub fn query(&self) -> QueryParams {
        self.binding().map(|b| b.query.clone()).unwrap_or_default()
    }

    /// Fragment of a route-bound node
    pub fn fragment(&self) -> Option<&str> {
        self.binding().and_then(RouteBinding::fragment)
    }

    /// Route context attached by the last propagation
    pub fn route_context(&self) -> Option<&RouteContext> {
        self.binding().and_then(RouteBinding::context)
    }

    /// Children in order
    pub fn children(&self) -> &[NavigationNode] {
        &self.children
    }

    /// Mutable children
    pub fn children_mut(&mut self) -> &mut Vec<NavigationNode> {
        &mut self.children
    }

    /// Append a child
    pub fn add_child(&mut self, child: NavigationNode) {
        self.children.push(child);
    }

    /// Whether the node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Apply `update` to the route binding; unbound nodes are left untouched.
    fn update_binding(&mut self, update: impl FnOnce(&mut RouteBinding)) -> bool {
        match &mut self.target {
            NodeTarget::RouteBound(binding) => {
                update(binding);
                true
            }
            NodeTarget::Unbound { .. } => false,
        }
    }

    /// Set the route name
    ///
    /// `None` keeps the node route-capable but links it to the current route.
    /// This is the only setter that turns an unbound node into a route-bound
    /// one; its URI is discarded. Fails with `InvalidArgument` for the empty
    /// string.
    pub fn set_route(&mut self, route: Option<&str>) -> Result<()> {
        if route == Some("") {
            return Err(NavigationError::invalid_argument(
                "route must be a non-empty string or None",
            ));
        }
        let route = route.map(str::to_string);

        if let NodeTarget::RouteBound(binding) = &mut self.target {
            binding.route = route;
            binding.cached_href = None;
            return Ok(());
        }
        self.target = NodeTarget::RouteBound(RouteBinding {
            route,
            ..RouteBinding::default()
        });
        Ok(())
    }

    /// Replace route parameters, `None` resets to empty
    ///
    /// Returns `false` and leaves the node untouched if it is unbound.
    pub fn set_params(&mut self, params: Option<RouteParams>) -> bool {
        self.update_binding(|binding| {
            binding.params = params.unwrap_or_default();
            binding.cached_href = None;
        })
    }

    /// Replace query parameters, `None` resets to empty
    ///
    /// Returns `false` and leaves the node untouched if it is unbound.
    pub fn set_query(&mut self, query: Option<QueryParams>) -> bool {
        self.update_binding(|binding| {
            binding.query = query.unwrap_or_default();
            binding.cached_href = None;
        })
    }

    /// Replace the fragment
    ///
    /// Returns `false` and leaves the node untouched if it is unbound.
    pub fn set_fragment(&mut self, fragment: Option<String>) -> bool {
        self.update_binding(|binding| {
            binding.fragment = fragment;
            binding.cached_href = None;
        })
    }

    /// Set the URI of an unbound node
    ///
    /// Returns `false` and leaves the node untouched if it is route-bound.
    pub fn set_uri(&mut self, uri: Option<String>) -> bool {
        match &mut self.target {
            NodeTarget::Unbound { uri: current } => {
                *current = uri;
                true
            }
            NodeTarget::RouteBound(_) => false,
        }
    }

    /// Attach the routing outcome of the current request
    ///
    /// Replaces any previously attached context. Unbound nodes ignore the call
    /// and return `false`.
    pub fn set_route_context(&mut self, context: Arc<RouteContext>) -> bool {
        match &mut self.target {
            NodeTarget::RouteBound(binding) => {
                binding.context = Some(context);
                binding.cached_href = None;
                true
            }
            NodeTarget::Unbound { .. } => false,
        }
    }

    /// Set the resolver used by [`href`](Self::href), replacing any other
    ///
    /// Unbound nodes never consult a resolver and return `false`.
    pub fn set_resolver(&mut self, resolver: SharedResolver) -> bool {
        self.update_binding(|binding| binding.resolver = Some(resolver))
    }

    /// Set the resolver unless one is already present
    ///
    /// Returns whether the resolver was injected. Unbound nodes are skipped.
    pub fn inject_resolver(&mut self, resolver: &SharedResolver) -> bool {
        match &mut self.target {
            NodeTarget::RouteBound(binding) if binding.resolver.is_none() => {
                binding.resolver = Some(Arc::clone(resolver));
                true
            }
            _ => false,
        }
    }

    /// Override the active state
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolve the href with the given resolver
    ///
    /// The result is cached until the route, params, query, fragment or
    /// context change. Unbound nodes return their URI (or an empty string)
    /// without consulting the resolver.
    pub fn resolve_href(&mut self, resolver: &dyn UrlResolver) -> Result<String> {
        let binding = match &mut self.target {
            NodeTarget::Unbound { uri } => return Ok(uri.clone().unwrap_or_default()),
            NodeTarget::RouteBound(binding) => binding,
        };

        if let Some(href) = &binding.cached_href {
            return Ok(href.clone());
        }

        let href = resolver.generate(&binding.target(), binding.context.as_deref())?;
        trace_log!("Resolved href '{}' for route {:?}", href, binding.route);
        binding.cached_href = Some(href.clone());
        Ok(href)
    }

    /// Resolve the href with the injected resolver
    pub fn href(&mut self) -> Result<String> {
        let resolver = match &self.target {
            NodeTarget::Unbound { .. } => None,
            NodeTarget::RouteBound(binding) => {
                if binding.cached_href.is_none() && binding.resolver.is_none() {
                    return Err(NavigationError::url_resolution(
                        binding.route.as_deref(),
                        "no URL resolver injected into the node",
                    ));
                }
                binding.resolver.clone()
            }
        };

        match resolver {
            Some(resolver) => self.resolve_href(resolver.as_ref()),
            None => self.resolve_href(&NoResolver),
        }
    }

    /// Whether the node is active
    ///
    /// An explicit active flag always wins. A route-bound node with an
    /// attached context is active when the context selects its route and
    /// params (see [`RouteContext::selects`]); the match is remembered for
    /// the lifetime of this node. Otherwise, with `recursive`, the node is
    /// active when any descendant is.
    pub fn is_active(&mut self, recursive: bool) -> bool {
        if self.active {
            return true;
        }

        if let NodeTarget::RouteBound(RouteBinding {
            route: Some(route),
            params,
            context: Some(context),
            ..
        }) = &self.target
        {
            if context.selects(route, params) {
                trace_log!("Node for route '{}' matched the current request", route);
                self.active = true;
                return true;
            }
        }

        recursive && self.children.iter_mut().any(|child| child.is_active(true))
    }

    /// Pre-order iterator over this node and its descendants
    pub fn traverse(&self) -> crate::container::Traverse<'_> {
        crate::container::Traverse::from_slice(std::slice::from_ref(self))
    }
}

/// Stand-in for nodes whose href is already cached or fixed.
struct NoResolver;

impl UrlResolver for NoResolver {
    fn generate(&self, target: &UrlTarget<'_>, _context: Option<&RouteContext>) -> Result<String> {
        Err(NavigationError::url_resolution(
            target.route,
            "no URL resolver injected into the node",
        ))
    }
}
