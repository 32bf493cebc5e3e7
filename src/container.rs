//! Navigation containers and tree traversal

use crate::NavigationNode;
use std::sync::Arc;

/// A container shared between the factory, the middleware and request handlers.
pub type SharedContainer = Arc<NavigationContainer>;

/// An ordered menu tree.
///
/// # Example
///
/// ```
/// use route_navigation::{NavigationContainer, NavigationNode};
///
/// let container: NavigationContainer = vec![
///     NavigationNode::uri("/").with_label("Home"),
///     NavigationNode::uri("/blog")
///         .with_label("Blog")
///         .with_child(NavigationNode::uri("/blog/archive").with_label("Archive")),
/// ]
/// .into_iter()
/// .collect();
///
/// let labels: Vec<_> = container.traverse().filter_map(|n| n.label()).collect();
/// assert_eq!(labels, ["Home", "Blog", "Archive"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationContainer {
    nodes: Vec<NavigationNode>,
}

impl NavigationContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from top-level nodes
    pub fn from_nodes(nodes: Vec<NavigationNode>) -> Self {
        Self { nodes }
    }

    /// Append a top-level node
    pub fn add_node(&mut self, node: NavigationNode) {
        self.nodes.push(node);
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[NavigationNode] {
        &self.nodes
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the container has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes at every depth
    pub fn count(&self) -> usize {
        self.traverse().count()
    }

    /// Lazy pre-order traversal (parent before children, left to right)
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::from_slice(&self.nodes)
    }

    /// Visit every node mutably, in pre-order
    pub fn visit_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut NavigationNode),
    {
        fn walk<F: FnMut(&mut NavigationNode)>(nodes: &mut [NavigationNode], f: &mut F) {
            for node in nodes {
                f(node);
                walk(node.children_mut(), f);
            }
        }

        walk(&mut self.nodes, &mut f);
    }

    /// First node in pre-order matching `predicate`
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&NavigationNode>
    where
        P: FnMut(&NavigationNode) -> bool,
    {
        self.traverse().find(|node| predicate(node))
    }

    /// Mutable access to the first node in pre-order matching `predicate`
    pub fn find_first_mut<P>(&mut self, mut predicate: P) -> Option<&mut NavigationNode>
    where
        P: FnMut(&NavigationNode) -> bool,
    {
        fn walk<'a, P: FnMut(&NavigationNode) -> bool>(
            nodes: &'a mut [NavigationNode],
            predicate: &mut P,
        ) -> Option<&'a mut NavigationNode> {
            for node in nodes {
                if predicate(&*node) {
                    return Some(node);
                }
                if let Some(found) = walk(node.children_mut(), predicate) {
                    return Some(found);
                }
            }
            None
        }

        walk(&mut self.nodes, &mut predicate)
    }

    /// Every node matching `predicate`, in pre-order
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<&NavigationNode>
    where
        P: FnMut(&NavigationNode) -> bool,
    {
        self.traverse().filter(|node| predicate(node)).collect()
    }

    /// First route-bound node for `route`
    pub fn find_by_route(&self, route: &str) -> Option<&NavigationNode> {
        self.find_first(|node| node.route() == Some(route))
    }

    /// Mutable access to the first route-bound node for `route`
    pub fn find_by_route_mut(&mut self, route: &str) -> Option<&mut NavigationNode> {
        self.find_first_mut(|node| node.route() == Some(route))
    }
}

impl FromIterator<NavigationNode> for NavigationContainer {
    fn from_iter<I: IntoIterator<Item = NavigationNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NavigationContainer {
    type Item = &'a NavigationNode;
    type IntoIter = Traverse<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}

/// Pre-order iterator over a node forest.
///
/// Holds one slice iterator per open level, so memory grows with depth only.
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    stack: Vec<std::slice::Iter<'a, NavigationNode>>,
}

impl<'a> Traverse<'a> {
    pub(crate) fn from_slice(nodes: &'a [NavigationNode]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a NavigationNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    if node.has_children() {
                        self.stack.push(node.children().iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Traverse<'_> {}
