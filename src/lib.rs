//! # Route Navigation
//!
//! Route-aware navigation trees for request/response web applications:
//!
//! - **Navigation Trees** - Nested menus of pages pointing at a fixed URI or a named route
//! - **Active State** - Pages know whether the current request's route selects them
//! - **URL Generation** - Hrefs produced by a pluggable [`UrlResolver`] and cached per page
//! - **Middleware** - Propagates the router's outcome into every configured menu
//! - **Configuration** - Menus declared in JSON/YAML, built and memoized by a factory
//!
//! # Quick Start
//!
//! ```
//! # #[cfg(feature = "middleware")]
//! # {
//! use route_navigation::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = RouteRegistry::new()
//!     .route("home", "/")
//!     .and_then(|r| r.route("user.detail", "/users/:id"))
//!     .unwrap();
//!
//! let factory = ContainerFactory::from_value(
//!     &json!({ "navigation": { "default": [
//!         { "label": "Home", "route": "home" },
//!         { "label": "Me", "route": "user.detail", "params": { "id": "me" } }
//!     ]}}),
//!     Arc::new(registry),
//! );
//! let middleware = factory.middleware().unwrap();
//!
//! let request = Request::new("/users/me")
//!     .with_route_context(RouteContext::matched("user.detail", RouteParams::new().with("id", "me")));
//!
//! let menu = pollster::block_on(middleware.process(request, |mut request: Request| async move {
//!     let container = request.navigation_mut().unwrap().named_mut(DEFAULT_SERVICE).unwrap();
//!     let mut items = Vec::new();
//!     container.visit_mut(|node| {
//!         items.push((node.href().unwrap(), node.is_active(true)));
//!     });
//!     items
//! }));
//!
//! assert_eq!(menu, [("/".to_string(), false), ("/users/me".to_string(), true)]);
//! # }
//! ```
//!
//! # Concurrency
//!
//! Containers built by [`ContainerFactory`] and held by [`NavigationMiddleware`]
//! are shared and never mutated. The middleware hands each request its own
//! copies with the request's [`RouteContext`] attached, so parallel requests
//! never see each other's active state.
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `middleware` (default) - [`NavigationMiddleware`] and [`ContainerFactory::middleware`]
//! - `cache` (default) - [`CachingResolver`], an LRU cache for generated URLs

#![doc(html_root_url = "https://docs.rs/route-navigation/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Error handling
pub mod error;

// Core navigation model
pub mod container;
pub mod context;
pub mod node;
pub mod params;
pub mod resolver;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Request pipeline
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod request;

// Configuration and construction
pub mod config;
pub mod factory;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, CachingResolver};
pub use config::{pages_from_value, NavigationConfig, PageDefinition, CONFIG_KEY, DEFAULT_SECTION};
pub use container::{NavigationContainer, SharedContainer, Traverse};
pub use context::RouteContext;
pub use error::{NavigationError, Result};
pub use factory::{ContainerFactory, DEFAULT_SERVICE, SERVICE_PREFIX};
pub use logging::LOG_TARGET;
#[cfg(feature = "middleware")]
pub use middleware::{NavigationMiddleware, Next};
pub use node::{NavigationNode, NodeTarget, RouteBinding, SharedResolver};
pub use params::{QueryParams, RouteParams};
pub use request::{Request, RequestNavigation, NAVIGATION_ATTRIBUTE, ROUTE_CONTEXT_ATTRIBUTE};
pub use resolver::{resolver_fn, validate_route_pattern, FnResolver, RouteRegistry, UrlResolver, UrlTarget};
