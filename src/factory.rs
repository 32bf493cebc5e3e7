//! Navigation container factory
//!
//! [`ContainerFactory`] turns configuration sections into
//! [`NavigationContainer`]s, injects the application's [`UrlResolver`](crate::UrlResolver) into
//! every route-bound node, and memoizes each container by service name so
//! that every consumer shares one canonical tree.
//!
//! Service names are derived from section names: the section `main` is
//! served as `navigation.Main`. When the configuration holds only a
//! `default` section, it is served under [`DEFAULT_SERVICE`].

use crate::config::{NavigationConfig, PageDefinition, CONFIG_KEY, DEFAULT_SECTION};
use crate::error::{NavigationError, Result};
use crate::node::SharedResolver;
#[cfg(feature = "middleware")]
use crate::NavigationMiddleware;
use crate::{debug_log, info_log, NavigationContainer, NavigationNode, SharedContainer};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Prefix of every service name served by the factory.
pub const SERVICE_PREFIX: &str = "navigation.";

/// Service name of the default container.
pub const DEFAULT_SERVICE: &str = "navigation";

/// Builds and memoizes navigation containers from configuration.
///
/// # Example
///
/// ```
/// use route_navigation::{ContainerFactory, RouteRegistry, DEFAULT_SERVICE};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = RouteRegistry::new().route("home", "/").unwrap();
/// let factory = ContainerFactory::from_value(
///     &json!({ "navigation": { "default": [{ "label": "Home", "route": "home" }] } }),
///     Arc::new(registry),
/// );
///
/// let first = factory.get(DEFAULT_SERVICE).unwrap();
/// let second = factory.default_container().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct ContainerFactory {
    config: NavigationConfig,
    resolver: SharedResolver,
    named_resolvers: HashMap<String, SharedResolver>,
    containers: Mutex<HashMap<String, SharedContainer>>,
}

impl std::fmt::Debug for ContainerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerFactory")
            .field("config", &self.config)
            .field("named_resolvers", &self.named_resolvers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ContainerFactory {
    /// Create a factory over `config`, injecting `resolver` into route-bound nodes
    pub fn new(config: NavigationConfig, resolver: SharedResolver) -> Self {
        Self {
            config,
            resolver,
            named_resolvers: HashMap::new(),
            containers: Mutex::new(HashMap::new()),
        }
    }

    /// Create a factory from the whole application configuration
    pub fn from_value(config: &serde_json::Value, resolver: SharedResolver) -> Self {
        Self::new(NavigationConfig::from_value(config), resolver)
    }

    /// Register a resolver that page definitions can select with `url_resolver`
    pub fn with_named_resolver(mut self, name: impl Into<String>, resolver: SharedResolver) -> Self {
        self.named_resolvers.insert(name.into(), resolver);
        self
    }

    /// The configuration the factory builds from
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Service name for a configuration section: prefix plus capitalized name
    pub fn service_name(section: &str) -> String {
        let mut chars = section.chars();
        match chars.next() {
            Some(first) => format!("{}{}{}", SERVICE_PREFIX, first.to_uppercase(), chars.as_str()),
            None => SERVICE_PREFIX.to_string(),
        }
    }

    /// Service names of every configured container, in section order
    ///
    /// A configuration holding exactly one section named `default` maps to
    /// `[DEFAULT_SERVICE]`.
    pub fn container_names(&self) -> Vec<String> {
        let sections = self.config.section_names();
        if sections == [DEFAULT_SECTION] {
            return vec![DEFAULT_SERVICE.to_string()];
        }
        sections.into_iter().map(Self::service_name).collect()
    }

    /// Whether `name` can be served by this factory
    pub fn can_create(&self, name: &str) -> bool {
        let name = normalize(name);
        let Some(section) = name.strip_prefix(SERVICE_PREFIX) else {
            return false;
        };

        self.lock_containers().contains_key(&name) || self.config.has_section(section)
    }

    /// The container served under `name`, built on first request
    ///
    /// Every later call for the same (normalized) name returns the same `Arc`.
    pub fn get(&self, name: &str) -> Result<SharedContainer> {
        let name = normalize(name);
        let section = name.strip_prefix(SERVICE_PREFIX).ok_or_else(|| {
            NavigationError::invalid_argument(format!(
                "service name '{}' does not start with '{}'",
                name, SERVICE_PREFIX
            ))
        })?;

        let mut containers = self.lock_containers();
        if let Some(container) = containers.get(&name) {
            debug_log!("Reusing memoized navigation container '{}'", name);
            return Ok(SharedContainer::clone(container));
        }

        let pages = self.config.pages(section)?.ok_or_else(|| {
            NavigationError::invalid_argument(format!(
                "no navigation container configured under the name \"{}\"",
                section
            ))
        })?;
        let container = SharedContainer::new(self.build(&pages)?);
        info_log!(
            "Built navigation container '{}' with {} nodes",
            name,
            container.count()
        );

        containers.insert(name, SharedContainer::clone(&container));
        Ok(container)
    }

    /// The default container
    ///
    /// Fails with `InvalidArgument` if the configuration has no navigation
    /// key or no `default` section.
    pub fn default_container(&self) -> Result<SharedContainer> {
        if !self.config.has_navigation_key() {
            return Err(NavigationError::invalid_argument(format!(
                "could not find the '{}' configuration key",
                CONFIG_KEY
            )));
        }
        if !self.config.has_section(DEFAULT_SECTION) {
            return Err(NavigationError::invalid_argument(format!(
                "failed to find a navigation container by the name \"{}\"",
                DEFAULT_SECTION
            )));
        }
        self.get(DEFAULT_SERVICE)
    }

    /// Build a fresh, unmemoized container from page definitions
    pub fn build(&self, pages: &[PageDefinition]) -> Result<NavigationContainer> {
        pages
            .iter()
            .map(|page| self.build_node(page))
            .collect::<Result<Vec<_>>>()
            .map(NavigationContainer::from_nodes)
    }

    fn build_node(&self, page: &PageDefinition) -> Result<NavigationNode> {
        let mut node = NavigationNode::new().with_active(page.active);
        node.set_label(page.label.clone());

        if let Some(route) = &page.route {
            node.set_route(Some(route.as_str()))?;
            node.set_params(Some(page.route_params()));
            node.set_query(Some(page.query_params()));
            node.set_fragment(page.fragment.clone());

            if let Some(name) = &page.url_resolver {
                let resolver = self.named_resolvers.get(name).ok_or_else(|| {
                    NavigationError::invalid_argument(format!(
                        "page for route '{}' names unknown URL resolver '{}'",
                        route, name
                    ))
                })?;
                node.set_resolver(SharedResolver::clone(resolver));
            }
            node.inject_resolver(&self.resolver);
        } else {
            node.set_uri(page.uri.clone());
        }

        for child in &page.pages {
            node.add_child(self.build_node(child)?);
        }
        Ok(node)
    }

    /// A middleware holding every configured container
    #[cfg(feature = "middleware")]
    pub fn middleware(&self) -> Result<NavigationMiddleware> {
        let containers = self
            .container_names()
            .into_iter()
            .map(|name| self.get(&name).map(|container| (name, container)))
            .collect::<Result<Vec<_>>>()?;

        debug_log!("Created navigation middleware for {} containers", containers.len());
        Ok(NavigationMiddleware::named(containers))
    }

    fn lock_containers(&self) -> std::sync::MutexGuard<'_, HashMap<String, SharedContainer>> {
        self.containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Map the default service name onto its prefixed form.
fn normalize(name: &str) -> String {
    if name == DEFAULT_SERVICE {
        ContainerFactory::service_name("default")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolver_fn, RouteContext, RouteParams, RouteRegistry};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> SharedResolver {
        Arc::new(
            RouteRegistry::new()
                .route("home", "/")
                .and_then(|r| r.route("user.detail", "/users/:id"))
                .unwrap(),
        )
    }

    fn factory(config: serde_json::Value) -> ContainerFactory {
        ContainerFactory::from_value(&config, registry())
    }

    #[test]
    fn test_service_name_capitalizes() {
        assert_eq!(ContainerFactory::service_name("main"), "navigation.Main");
        assert_eq!(ContainerFactory::service_name("Footer"), "navigation.Footer");
        assert_eq!(normalize(DEFAULT_SERVICE), "navigation.Default");
        assert_eq!(normalize("navigation.Main"), "navigation.Main");
    }

    #[test]
    fn test_container_names_single_default() {
        let factory = factory(json!({ "navigation": { "default": [] } }));
        assert_eq!(factory.container_names(), [DEFAULT_SERVICE]);
    }

    #[test]
    fn test_container_names_multiple_sections() {
        let sectioned = factory(json!({ "navigation": { "default": [], "footer": [] } }));
        assert_eq!(
            sectioned.container_names(),
            ["navigation.Default", "navigation.Footer"]
        );

        let unsorted = factory(json!({ "navigation": { "main": [], "footer": [] } }));
        assert_eq!(
            unsorted.container_names(),
            ["navigation.Main", "navigation.Footer"]
        );

        let empty = factory(json!({}));
        assert!(empty.container_names().is_empty());
    }

    #[test]
    fn test_memoizes_default_container() {
        let factory = factory(json!({ "navigation": { "default": [{ "route": "home" }] } }));

        let first = factory.default_container().unwrap();
        let second = factory.default_container().unwrap();
        let third = factory.get("navigation.Default").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_default_container_requires_keys() {
        let error = factory(json!({})).default_container().unwrap_err();
        assert!(error.is_invalid_argument());
        assert!(error.to_string().contains("'navigation' configuration key"));

        let error = factory(json!({ "navigation": { "main": [] } }))
            .default_container()
            .unwrap_err();
        assert!(error.to_string().contains("\"default\""));
    }

    #[test]
    fn test_lookup_falls_back_to_lowercase_section() {
        let factory = factory(json!({ "navigation": { "main": [{ "uri": "/" }] } }));
        assert!(factory.can_create("navigation.Main"));
        assert!(!factory.can_create("navigation.Other"));
        assert!(!factory.can_create("Main"));

        let container = factory.get("navigation.Main").unwrap();
        assert_eq!(container.len(), 1);
        assert!(factory.get("navigation.Other").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_route_bound_nodes_get_resolver() {
        let factory = factory(json!({ "navigation": { "default": [
            { "label": "Home", "route": "home", "pages": [
                { "label": "Me", "route": "user.detail", "params": { "id": "me" }, "query": { "tab": "a" } },
                { "label": "Docs", "uri": "https://example.com/docs" }
            ]}
        ]}}));

        let container = factory.default_container().unwrap();
        assert_eq!(container.count(), 3);

        let mut container = NavigationContainer::clone(&container);
        assert_eq!(container.find_by_route_mut("home").unwrap().href().unwrap(), "/");
        assert_eq!(
            container.find_by_route_mut("user.detail").unwrap().href().unwrap(),
            "/users/me?tab=a"
        );

        let docs = container
            .find_first_mut(|n| n.label() == Some("Docs"))
            .unwrap();
        assert!(!docs.is_route_bound());
        assert_eq!(docs.href().unwrap(), "https://example.com/docs");
    }

    #[test]
    fn test_named_resolver_is_kept() {
        let admin: SharedResolver = Arc::new(resolver_fn(|target, _| {
            Ok(format!("/admin/{}", target.route.unwrap_or_default()))
        }));
        let factory = factory(json!({ "navigation": { "default": [
            { "route": "home" },
            { "route": "dashboard", "url_resolver": "admin" }
        ]}}))
        .with_named_resolver("admin", admin);

        let mut container = NavigationContainer::clone(&factory.default_container().unwrap());
        assert_eq!(
            container.find_by_route_mut("dashboard").unwrap().href().unwrap(),
            "/admin/dashboard"
        );
        assert_eq!(container.find_by_route_mut("home").unwrap().href().unwrap(), "/");
    }

    #[test]
    fn test_unknown_named_resolver_fails() {
        let factory = factory(json!({ "navigation": { "default": [
            { "route": "home", "url_resolver": "missing" }
        ]}}));
        assert!(factory.default_container().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_empty_route_in_config_fails() {
        let factory = factory(json!({ "navigation": { "default": [{ "route": "" }] } }));
        assert!(factory.default_container().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_unsupported_section_value_fails() {
        let scalar = factory(json!({ "navigation": { "default": 12 } }));
        assert!(scalar.default_container().unwrap_err().is_invalid_argument());

        let missing_file = factory(json!({ "navigation": { "default": "/no/such/file.yaml" } }));
        assert!(missing_file.default_container().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_explicit_active_from_config() {
        let factory = factory(json!({ "navigation": { "default": [
            { "route": "home", "active": true }
        ]}}));
        let mut container = NavigationContainer::clone(&factory.default_container().unwrap());
        let node = container.find_by_route_mut("home").unwrap();
        node.set_route_context(Arc::new(RouteContext::matched("other", RouteParams::new())));
        assert!(node.is_active(false));
    }

    #[cfg(feature = "middleware")]
    #[test]
    fn test_middleware_holds_memoized_containers() {
        let factory = factory(json!({ "navigation": {
            "default": [{ "route": "home" }],
            "footer": [{ "uri": "/legal" }]
        }}));

        let middleware = factory.middleware().unwrap();
        assert_eq!(middleware.len(), 2);

        let footer = factory.get("navigation.Footer").unwrap();
        assert!(middleware.containers().any(|c| Arc::ptr_eq(c, &footer)));
    }
}
