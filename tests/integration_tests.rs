//! Integration tests for route_navigation
//!
//! These tests verify the complete workflow: configuration, factory,
//! middleware propagation, active-state matching and href generation.

use route_navigation::*;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> RouteRegistry {
    RouteRegistry::new()
        .route("home", "/")
        .and_then(|r| r.route("foo", "/foo"))
        .and_then(|r| r.route("bar", "/bar"))
        .and_then(|r| r.route("user.list", "/users"))
        .and_then(|r| r.route("user.detail", "/users/:id"))
        .unwrap()
}

fn app_config() -> serde_json::Value {
    json!({
        "navigation": {
            "default": [
                { "label": "Home", "route": "home" },
                { "label": "Users", "route": "user.list", "pages": [
                    { "label": "Alice", "route": "user.detail", "params": { "id": "alice" } },
                    { "label": "Bob", "route": "user.detail", "params": { "id": "bob" }, "fragment": "profile" }
                ]}
            ],
            "footer": [
                { "label": "Foo", "route": "foo" },
                { "label": "Legal", "uri": "/legal" }
            ]
        }
    })
}

#[cfg(feature = "middleware")]
fn matched(route: &str, params: RouteParams) -> Request {
    Request::new("/").with_route_context(RouteContext::matched(route, params))
}

/// Labels of every active node, in pre-order.
fn active_labels(container: &mut NavigationContainer) -> Vec<String> {
    let mut labels = Vec::new();
    container.visit_mut(|node| {
        if node.is_active(true) {
            labels.push(node.label().unwrap_or_default().to_string());
        }
    });
    labels
}

// ============================================================================
// Route Propagation Tests
// ============================================================================

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_foo_bar_propagation() {
    init_logging();

    let container = NavigationContainer::from_nodes(vec![
        NavigationNode::routed("foo").unwrap().with_label("Foo"),
        NavigationNode::routed("bar").unwrap().with_label("Bar"),
    ]);
    let middleware = NavigationMiddleware::new(vec![Arc::new(container)]);

    let active = middleware
        .process(matched("foo", RouteParams::new()), |mut request: Request| async move {
            active_labels(request.navigation_mut().unwrap().get_mut(0).unwrap())
        })
        .await;

    assert_eq!(active, ["Foo"]);
}

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_unrouted_request_has_no_navigation() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let middleware = factory.middleware().unwrap();

    let status = middleware
        .process(Request::new("/missing"), |request: Request| async move {
            if request.navigation().is_some() {
                500
            } else {
                404
            }
        })
        .await;

    assert_eq!(status, 404);
}

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_failed_match_activates_nothing() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let middleware = factory.middleware().unwrap();
    let request = Request::new("/nowhere").with_route_context(RouteContext::failure());

    let active = middleware
        .process(request, |mut request: Request| async move {
            let navigation = request.navigation_mut().unwrap();
            let mut labels = active_labels(navigation.named_mut("navigation.Default").unwrap());
            labels.extend(active_labels(navigation.named_mut("navigation.Footer").unwrap()));
            labels
        })
        .await;

    assert!(active.is_empty());
}

// ============================================================================
// Factory Tests
// ============================================================================

#[test]
fn test_factory_returns_same_container() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    assert_eq!(
        factory.container_names(),
        ["navigation.Default", "navigation.Footer"]
    );

    let first = factory.get("navigation.Footer").unwrap();
    let second = factory.get("navigation.Footer").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let default = factory.default_container().unwrap();
    assert!(Arc::ptr_eq(&default, &factory.get(DEFAULT_SERVICE).unwrap()));
    assert_eq!(default.count(), 4);
}

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_active_subtree_and_hrefs() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let middleware = factory.middleware().unwrap();
    let request = matched("user.detail", RouteParams::new().with("id", "bob"));

    let (active, hrefs) = middleware
        .process(request, |mut request: Request| async move {
            let container = request
                .navigation_mut()
                .unwrap()
                .named_mut("navigation.Default")
                .unwrap();
            let active = active_labels(container);

            let mut hrefs = Vec::new();
            container.visit_mut(|node| hrefs.push(node.href().unwrap()));
            (active, hrefs)
        })
        .await;

    assert_eq!(active, ["Users", "Bob"]);
    assert_eq!(hrefs, ["/", "/users", "/users/alice", "/users/bob#profile"]);
}

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_services_from_registry() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let services: Vec<Arc<dyn std::any::Any + Send + Sync>> = factory
        .container_names()
        .iter()
        .map(|name| factory.get(name).map(|c| Arc::new(c) as Arc<dyn std::any::Any + Send + Sync>))
        .collect::<Result<_>>()
        .unwrap();

    let middleware = NavigationMiddleware::from_services(services).unwrap();
    assert_eq!(middleware.len(), 2);

    let active = middleware
        .process(matched("foo", RouteParams::new()), |mut request: Request| async move {
            active_labels(request.navigation_mut().unwrap().get_mut(1).unwrap())
        })
        .await;
    assert_eq!(active, ["Foo"]);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_interleaved_requests_do_not_leak() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let middleware = factory.middleware().unwrap();

    let handler = |mut request: Request| async move {
        tokio::task::yield_now().await;
        active_labels(request.navigation_mut().unwrap().named_mut("navigation.Default").unwrap())
    };

    let (alice, home) = tokio::join!(
        middleware.process(matched("user.detail", RouteParams::new().with("id", "alice")), handler),
        middleware.process(matched("home", RouteParams::new()), handler),
    );

    assert_eq!(alice, ["Users", "Alice"]);
    assert_eq!(home, ["Home"]);

    let shared = factory.default_container().unwrap();
    assert!(shared.traverse().all(|node| node.route_context().is_none()));
}

#[cfg(feature = "middleware")]
#[test]
fn test_parallel_threads_do_not_leak() {
    init_logging();

    let factory = ContainerFactory::from_value(&app_config(), Arc::new(registry()));
    let middleware = factory.middleware().unwrap();
    let routes = [("home", None), ("user.detail", Some("alice")), ("user.detail", Some("bob"))];

    std::thread::scope(|scope| {
        for (route, id) in routes {
            let middleware = &middleware;
            scope.spawn(move || {
                for _ in 0..50 {
                    let params = id.map(|id| RouteParams::new().with("id", id)).unwrap_or_default();
                    let active = pollster::block_on(middleware.process(
                        matched(route, params),
                        |mut request: Request| async move {
                            active_labels(request.navigation_mut().unwrap().get_mut(0).unwrap())
                        },
                    ));
                    let expected: &[&str] = match id {
                        None => &["Home"],
                        Some("alice") => &["Users", "Alice"],
                        Some(_) => &["Users", "Bob"],
                    };
                    assert_eq!(active, expected);
                }
            });
        }
    });
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[cfg(feature = "middleware")]
#[tokio::test]
async fn test_yaml_config_file() {
    init_logging();

    let mut pages = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(
        pages,
        "- label: Home\n  route: home\n- label: Users\n  route: user.list\n  query:\n    sort: name"
    )
    .unwrap();

    let mut app = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(app, "navigation:\n  main: {}", pages.path().display()).unwrap();

    let config = NavigationConfig::from_file(app.path()).unwrap();
    let factory = ContainerFactory::new(config, Arc::new(registry()));
    assert_eq!(factory.container_names(), ["navigation.Main"]);
    assert!(factory.default_container().is_err());

    let middleware = factory.middleware().unwrap();
    let hrefs = middleware
        .process(matched("user.list", RouteParams::new()), |mut request: Request| async move {
            let container = request.navigation_mut().unwrap().named_mut("navigation.Main").unwrap();
            let users = container.find_by_route_mut("user.list").unwrap();
            (users.is_active(false), users.href().unwrap())
        })
        .await;

    assert_eq!(hrefs, (true, "/users?sort=name".to_string()));
}

#[test]
fn test_unquoted_yaml_params_activate() {
    init_logging();

    let mut pages = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        pages,
        "- label: Users\n  route: user.list\n  pages:\n    - label: Five\n      route: user.detail\n      params:\n        id: 5\n    - label: Six\n      route: user.detail\n      params:\n        id: 6"
    )
    .unwrap();

    let config = json!({ "navigation": { "default": pages.path().display().to_string() } });
    let factory = ContainerFactory::from_value(&config, Arc::new(registry()));
    let mut container = NavigationContainer::clone(&factory.default_container().unwrap());

    let context = Arc::new(RouteContext::matched("user.detail", RouteParams::new().with("id", "5")));
    container.visit_mut(|node| {
        node.set_route_context(Arc::clone(&context));
    });

    assert_eq!(active_labels(&mut container), ["Users", "Five"]);
    assert_eq!(
        container.find_by_route_mut("user.detail").unwrap().href().unwrap(),
        "/users/5"
    );
}

#[cfg(all(feature = "middleware", feature = "cache"))]
#[test]
fn test_caching_resolver_in_factory() {
    init_logging();

    let cache = Arc::new(CachingResolver::new(registry()));
    let factory = ContainerFactory::from_value(&app_config(), cache.clone());
    let middleware = factory.middleware().unwrap();

    for _ in 0..3 {
        pollster::block_on(middleware.process(matched("home", RouteParams::new()), |mut request: Request| async move {
            let container = request.navigation_mut().unwrap().get_mut(1).unwrap();
            container.visit_mut(|node| {
                node.href().unwrap();
            });
        }));
    }

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}
