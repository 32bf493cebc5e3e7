//! URL generation capability
//!
//! Navigation nodes never build URLs themselves. They hand a [`UrlTarget`]
//! and the current [`RouteContext`] to a [`UrlResolver`] supplied by the
//! application. [`RouteRegistry`] is a small resolver over named path
//! patterns; any router that can reverse a route name can implement the trait
//! instead.

use crate::error::{NavigationError, Result};
use crate::params::encode_uri_component;
use crate::{trace_log, QueryParams, RouteContext, RouteParams};
use std::collections::HashMap;
use std::fmt;

/// Everything a node knows about the link it points to.
#[derive(Debug, Clone, Copy)]
pub struct UrlTarget<'a> {
    /// Route name, `None` to reuse the route matched for the current request
    pub route: Option<&'a str>,
    /// Route parameters
    pub params: &'a RouteParams,
    /// Query string parameters
    pub query: &'a QueryParams,
    /// Fragment without the leading `#`
    pub fragment: Option<&'a str>,
}

/// Generates hrefs for route-bound navigation nodes.
///
/// Implementations must be shareable across threads: a single resolver is
/// injected into every node of every container.
pub trait UrlResolver: Send + Sync {
    /// Produce the href for `target`, optionally using the current request's
    /// routing outcome to fill in what `target` leaves out.
    fn generate(&self, target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Result<String>;
}

impl<R: UrlResolver + ?Sized> UrlResolver for std::sync::Arc<R> {
    fn generate(&self, target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Result<String> {
        (**self).generate(target, context)
    }
}

/// Helper to create a resolver from a closure
///
/// # Example
///
/// ```
/// use route_navigation::{resolver_fn, RouteParams, QueryParams, UrlResolver, UrlTarget};
///
/// let resolver = resolver_fn(|target, _context| Ok(format!("/{}", target.route.unwrap_or(""))));
///
/// let target = UrlTarget {
///     route: Some("about"),
///     params: &RouteParams::new(),
///     query: &QueryParams::new(),
///     fragment: None,
/// };
/// assert_eq!(resolver.generate(&target, None).unwrap(), "/about");
/// ```
pub fn resolver_fn<F>(generate: F) -> FnResolver<F>
where
    F: Fn(&UrlTarget<'_>, Option<&RouteContext>) -> Result<String> + Send + Sync,
{
    FnResolver { generate }
}

/// Resolver created from a closure, see [`resolver_fn`]
#[derive(Clone)]
pub struct FnResolver<F> {
    generate: F,
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

impl<F> UrlResolver for FnResolver<F>
where
    F: Fn(&UrlTarget<'_>, Option<&RouteContext>) -> Result<String> + Send + Sync,
{
    fn generate(&self, target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Result<String> {
        (self.generate)(target, context)
    }
}

// ============================================================================
// RouteRegistry
// ============================================================================

/// Resolver over named path patterns such as `/users/:id`.
///
/// When the requested route is the one matched for the current request (or
/// no route is requested at all), the matched parameters are reused for any
/// segment the node does not specify.
///
/// # Example
///
/// ```
/// use route_navigation::{RouteRegistry, RouteParams};
///
/// let mut registry = RouteRegistry::new();
/// registry.register("user.detail", "/users/:id").unwrap();
///
/// let url = registry.url_for("user.detail", &RouteParams::new().with("id", "123"));
/// assert_eq!(url.as_deref(), Some("/users/123"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteRegistry {
    /// Map of route names to path patterns
    routes: HashMap<String, String>,
    /// Prefix prepended to every generated path
    base_path: String,
}

impl RouteRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every generated URL with `base_path` (e.g. `/app`)
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        self.register(name, pattern)?;
        Ok(self)
    }

    /// Register a named route
    ///
    /// Fails with `InvalidArgument` for an empty name or a malformed pattern.
    pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> Result<()> {
        let name = name.into();
        let pattern = pattern.into();

        if name.is_empty() {
            return Err(NavigationError::invalid_argument(
                "route name must be a non-empty string",
            ));
        }
        validate_route_pattern(&pattern).map_err(|reason| {
            NavigationError::invalid_argument(format!("route '{}': {}", name, reason))
        })?;

        self.routes.insert(name, pattern);
        Ok(())
    }

    /// Get path pattern for a named route
    pub fn get(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    /// Check if a route name exists
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Generate the path for a named route, `None` if the route is unknown
    /// or a parameter is missing
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Option<String> {
        let pattern = self.get(name)?;
        let path = substitute_params(pattern, params).ok()?;
        Some(self.prefixed(&path))
    }

    /// Get number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn prefixed(&self, path: &str) -> String {
        if self.base_path.is_empty() {
            path.to_string()
        } else {
            format!("{}{}", self.base_path, path)
        }
    }
}

impl UrlResolver for RouteRegistry {
    fn generate(&self, target: &UrlTarget<'_>, context: Option<&RouteContext>) -> Result<String> {
        let (route, params) = match target.route {
            Some(route) => {
                let params = match context {
                    Some(ctx) if ctx.matched_route_name() == Some(route) => {
                        ctx.matched_params().merged_with(target.params)
                    }
                    _ => target.params.clone(),
                };
                (route, params)
            }
            None => {
                let ctx = context.ok_or_else(|| {
                    NavigationError::url_resolution(
                        None,
                        "no route name given and no route context attached",
                    )
                })?;
                let route = ctx.matched_route_name().ok_or_else(|| {
                    NavigationError::url_resolution(
                        None,
                        "no route name given and the current request did not match a route",
                    )
                })?;
                (route, ctx.matched_params().merged_with(target.params))
            }
        };

        let pattern = self
            .get(route)
            .ok_or_else(|| NavigationError::url_resolution(Some(route), "route is not registered"))?;
        let path = substitute_params(pattern, &params)
            .map_err(|reason| NavigationError::url_resolution(Some(route), reason))?;

        let mut url = self.prefixed(&path);
        if !target.query.is_empty() {
            url.push('?');
            url.push_str(&target.query.to_query_string());
        }
        if let Some(fragment) = target.fragment.filter(|f| !f.is_empty()) {
            url.push('#');
            url.push_str(fragment);
        }

        trace_log!("Generated '{}' for route '{}'", url, route);
        Ok(url)
    }
}

/// Replace every `:param` segment of `pattern` with its encoded value.
fn substitute_params(pattern: &str, params: &RouteParams) -> std::result::Result<String, String> {
    let segments = pattern
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params
                .get(name)
                .map(encode_uri_component)
                .ok_or_else(|| format!("missing parameter '{}'", name)),
            None => Ok(segment.to_string()),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(segments.join("/"))
}

/// Validate a route path pattern
///
/// # Validation Rules
///
/// - Pattern must start with '/'
/// - No consecutive slashes ('//')
/// - Parameter names must be alphanumeric/underscore and not empty
/// - No duplicate parameter names
pub fn validate_route_pattern(pattern: &str) -> std::result::Result<(), String> {
    if !pattern.starts_with('/') {
        return Err("route pattern must start with '/'".to_string());
    }

    if pattern.contains("//") {
        return Err("route pattern cannot contain consecutive slashes".to_string());
    }

    let mut param_names = std::collections::HashSet::new();
    for segment in pattern.split('/') {
        if let Some(param) = segment.strip_prefix(':') {
            if param.is_empty() {
                return Err("route parameter name cannot be empty".to_string());
            }

            if !param.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(format!(
                    "route parameter '{}' must contain only alphanumeric characters and underscores",
                    param
                ));
            }

            if !param_names.insert(param) {
                return Err(format!("duplicate route parameter: '{}'", param));
            }
        }
    }

    Ok(())
}
