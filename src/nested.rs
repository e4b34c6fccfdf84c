//! Shell-aware ancestry queries
//!
//! `go` prunes the stack by tab: entries are compared through the shell that
//! owns them and the direct child of that shell (the tab root) they descend
//! from. All lookups run on [`RouteId`]s in the arena.

use crate::tree::{NodeKind, RouteId, RouteTree};
use std::borrow::Cow;

/// Nearest [`ShellRoute`](crate::ShellRoute) enclosing `id`
///
/// Stateful shells and their branches are skipped.
pub fn find_owner_shell(tree: &RouteTree, id: RouteId) -> Option<RouteId> {
    tree.ancestors(id)
        .find(|ancestor| matches!(tree.node(*ancestor).kind, NodeKind::Shell(_)))
}

/// The direct child of `shell` that `id` descends from, possibly `id` itself
///
/// Only route children count as tab roots; a nested stateful shell yields `None`.
pub fn find_tab_root(tree: &RouteTree, shell: RouteId, id: RouteId) -> Option<RouteId> {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .find(|candidate| tree.parent(*candidate) == Some(shell))
        .filter(|candidate| tree.node(*candidate).is_route())
}

/// Whether `id` is itself a direct child of `shell`
pub fn is_direct_tab_route(tree: &RouteTree, shell: RouteId, id: RouteId) -> bool {
    tree.parent(id) == Some(shell)
}

/// Join a parent pattern and a child pattern
///
/// A child starting with `/` is absolute and replaces the parent prefix.
///
/// # Example
///
/// ```
/// use shell_router::join_route_path;
///
/// assert_eq!(join_route_path("/users", ":id"), "/users/:id");
/// assert_eq!(join_route_path("/users", "/admin"), "/admin");
/// assert_eq!(join_route_path("", "/"), "/");
/// ```
pub fn join_route_path<'a>(parent_path: &'a str, child_path: &'a str) -> Cow<'a, str> {
    if child_path.starts_with('/') {
        return normalize(child_path);
    }

    let parent = parent_path.trim_end_matches('/');
    let child = child_path.trim_end_matches('/');

    if child.is_empty() {
        normalize(parent_path)
    } else if parent.is_empty() {
        Cow::Owned(format!("/{}", child))
    } else {
        Cow::Owned(format!("{}/{}", parent, child))
    }
}

fn normalize(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        Cow::Borrowed("/")
    } else if trimmed.starts_with('/') {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("/{}", trimmed))
    }
}
