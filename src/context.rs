//! The routing outcome of the current request.

use crate::RouteParams;

/// Snapshot of the route matched for one request.
///
/// A context is either a successful match (a route name plus the parameters
/// extracted from the path) or a failed match. It is immutable once built and
/// shared between all nodes it is injected into.
///
/// # Example
///
/// ```
/// use route_navigation::{RouteContext, RouteParams};
///
/// let context = RouteContext::matched("user.detail", RouteParams::new().with("id", "42"));
///
/// assert!(context.is_success());
/// assert_eq!(context.matched_route_name(), Some("user.detail"));
/// assert_eq!(context.matched_params().get("id"), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteContext {
    matched_route_name: Option<String>,
    matched_params: RouteParams,
}

impl RouteContext {
    /// A successful match of `name` with the extracted `params`.
    pub fn matched(name: impl Into<String>, params: RouteParams) -> Self {
        Self {
            matched_route_name: Some(name.into()),
            matched_params: params,
        }
    }

    /// A request that did not match any route.
    pub fn failure() -> Self {
        Self {
            matched_route_name: None,
            matched_params: RouteParams::new(),
        }
    }

    /// Whether routing succeeded
    pub fn is_success(&self) -> bool {
        self.matched_route_name.is_some()
    }

    /// Whether routing failed
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Name of the matched route, `None` for a failed match
    pub fn matched_route_name(&self) -> Option<&str> {
        self.matched_route_name.as_deref()
    }

    /// Parameters extracted by the router (empty for a failed match)
    pub fn matched_params(&self) -> &RouteParams {
        &self.matched_params
    }

    /// Whether a node bound to `route` with `params` is selected by this match.
    ///
    /// Every entry of `params` must be present with an equal value among the
    /// matched parameters; extra matched parameters are ignored, so an empty
    /// `params` selects on the route name alone.
    pub fn selects(&self, route: &str, params: &RouteParams) -> bool {
        self.matched_route_name() == Some(route)
            && params.intersection_len(&self.matched_params) == params.len()
    }
}
