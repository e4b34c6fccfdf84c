//! Route tree arena
//!
//! The declarative tree is flattened once into an arena where every node gets
//! a stable [`RouteId`]. Shell and tab-root lookups compare ids, never
//! pointers, so the same `Arc<Route>` mounted twice yields two distinct nodes.

use crate::matcher::RoutePattern;
use crate::route::{RouteBase, RouteRef, ShellRoute, StatefulShellRoute};
use std::fmt;
use std::sync::Arc;

/// Stable identifier of a node, assigned in preorder at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node in the arena is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Segment-consuming route with its parsed pattern
    Route {
        route: RouteRef,
        pattern: RoutePattern,
    },
    /// Chrome wrapper consuming no segments
    Shell(Arc<ShellRoute>),
    /// Multi-branch shell; its children are `Branch` nodes
    StatefulShell(Arc<StatefulShellRoute>),
    /// One branch of a stateful shell
    Branch {
        index: usize,
        initial_path: Option<String>,
    },
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: RouteId,
    pub parent: Option<RouteId>,
    pub kind: NodeKind,
    pub children: Vec<RouteId>,
}

impl TreeNode {
    /// The route and pattern if this is a `Route` node
    pub fn as_route(&self) -> Option<(&RouteRef, &RoutePattern)> {
        match &self.kind {
            NodeKind::Route { route, pattern } => Some((route, pattern)),
            _ => None,
        }
    }

    pub fn is_route(&self) -> bool {
        matches!(self.kind, NodeKind::Route { .. })
    }

    pub fn is_shell(&self) -> bool {
        matches!(self.kind, NodeKind::Shell(_))
    }
}

/// Immutable arena built from the declarative tree
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    nodes: Vec<TreeNode>,
    roots: Vec<RouteId>,
}

impl RouteTree {
    pub fn new(routes: &[RouteBase]) -> Self {
        let mut tree = Self::default();
        let roots = tree.insert_all(routes, None);
        tree.roots = roots;
        tree
    }

    fn insert_all(&mut self, routes: &[RouteBase], parent: Option<RouteId>) -> Vec<RouteId> {
        routes
            .iter()
            .map(|route| self.insert(route, parent))
            .collect()
    }

    fn insert(&mut self, base: &RouteBase, parent: Option<RouteId>) -> RouteId {
        let kind = match base {
            RouteBase::Route(route) => NodeKind::Route {
                pattern: RoutePattern::from_path(&route.path),
                route: Arc::clone(route),
            },
            RouteBase::Shell(shell) => NodeKind::Shell(Arc::clone(shell)),
            RouteBase::StatefulShell(shell) => NodeKind::StatefulShell(Arc::clone(shell)),
        };
        let id = self.push(parent, kind);

        let children = match base {
            RouteBase::Route(route) => self.insert_all(&route.routes, Some(id)),
            RouteBase::Shell(shell) => self.insert_all(&shell.routes, Some(id)),
            RouteBase::StatefulShell(shell) => shell
                .branches
                .iter()
                .enumerate()
                .map(|(index, branch)| {
                    let branch_id = self.push(
                        Some(id),
                        NodeKind::Branch {
                            index,
                            initial_path: branch.initial_path.clone(),
                        },
                    );
                    let branch_children = self.insert_all(&branch.routes, Some(branch_id));
                    self.nodes[branch_id.0].children = branch_children;
                    branch_id
                })
                .collect(),
        };
        self.nodes[id.0].children = children;
        id
    }

    fn push(&mut self, parent: Option<RouteId>, kind: NodeKind) -> RouteId {
        let id = RouteId(self.nodes.len());
        self.nodes.push(TreeNode {
            id,
            parent,
            kind,
            children: Vec::new(),
        });
        id
    }

    /// Top-level nodes in declared order
    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    pub fn get(&self, id: RouteId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    pub fn node(&self, id: RouteId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: RouteId) -> Option<RouteId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: RouteId) -> &[RouteId] {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walk from `id`'s parent up to the root
    pub fn ancestors(&self, id: RouteId) -> impl Iterator<Item = RouteId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: RouteId, id: RouteId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }

    /// All nodes in preorder
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
