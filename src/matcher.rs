//! Route matching
//!
//! Turns a location string into the chain of tree nodes it resolves to.
//!
//! Matching walks the tree depth-first in declared order:
//! - A route consumes as many segments as its own pattern has
//! - Literal segments compare case-insensitively
//! - `:name` binds the percent-decoded segment, `*` matches one segment unbound
//! - The empty (root) pattern only matches at segment index 0, consuming nothing
//! - Shells consume nothing and just try their children
//! - Stateful shells try each branch in order, first success wins
//!
//! When a route consumes the last segment it is the leaf. Otherwise its
//! children are tried from the next segment; if none of them completes the
//! match the route is dropped and its siblings are tried.

use crate::params::{decode_path_segment, QueryParams, RouteParams};
use crate::route::RouteRef;
use crate::state::RouterState;
#[cfg(feature = "transition")]
use crate::transition::Transition;
use crate::tree::{NodeKind, RouteId, RouteTree};
use crate::{trace_log, Extra, RouterError};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Patterns
// ============================================================================

/// A single segment in a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must match, ignoring case
    Literal(String),
    /// `:name` capture
    Param(String),
    /// `*`, any single segment
    Wildcard,
}

impl Segment {
    /// Parse a segment from string
    ///
    /// - "users" -> Literal("users")
    /// - ":id" -> Param("id")
    /// - "*" -> Wildcard
    pub fn parse(s: &str) -> Self {
        if s == "*" {
            Segment::Wildcard
        } else if let Some(name) = s.strip_prefix(':') {
            Segment::Param(name.to_string())
        } else {
            Segment::Literal(s.to_string())
        }
    }

    fn matches(&self, actual: &str) -> bool {
        match self {
            Segment::Literal(expected) => expected.to_lowercase() == actual.to_lowercase(),
            Segment::Param(_) | Segment::Wildcard => true,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => f.write_str(s),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Wildcard => f.write_str("*"),
        }
    }
}

/// A parsed route path
///
/// Leading `/` is dropped: during matching every pattern is relative to the
/// segment where its parent stopped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutePattern {
    pub segments: Vec<Segment>,
}

/// Result of matching one pattern at one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Number of input segments consumed
    pub consumed: usize,
    /// Bound `:name` values
    pub params: RouteParams,
    /// Concrete consumed location, `/` for the root pattern
    pub matched_path: String,
}

impl RoutePattern {
    pub fn from_path(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();

        Self { segments }
    }

    /// Whether this is the empty root pattern
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of all `:name` segments, in order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Match this pattern against `segments` starting at `start`
    pub fn match_at(&self, segments: &[&str], start: usize) -> Option<PatternMatch> {
        if self.is_root() {
            // Anchors the top of the tree, whatever follows
            return (start == 0).then(|| PatternMatch {
                consumed: 0,
                params: RouteParams::new(),
                matched_path: "/".to_string(),
            });
        }

        let input = segments.get(start..start + self.segments.len())?;
        let mut params = RouteParams::new();

        for (pattern, actual) in self.segments.iter().zip(input) {
            if !pattern.matches(actual) {
                return None;
            }
            if let Segment::Param(name) = pattern {
                params.insert(name.as_str(), decode_path_segment(actual));
            }
        }

        Some(PatternMatch {
            consumed: input.len(),
            params,
            matched_path: format!("/{}", input.join("/")),
        })
    }

    /// Match this pattern against a whole path
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let segments = split_segments(path);
        self.match_at(&segments, 0)
            .filter(|m| m.consumed == segments.len())
            .map(|m| m.params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Split a path into its non-empty segments
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.trim_end_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a location into path and query, dropping any fragment
///
/// Deep links such as `app://host/users?tab=1` keep only their path and query.
pub(crate) fn split_location(location: &str) -> (&str, &str) {
    let without_fragment = location
        .split_once('#')
        .map_or(location, |(before, _)| before);
    let relative = strip_authority(without_fragment);
    relative.split_once('?').unwrap_or((relative, ""))
}

fn strip_authority(location: &str) -> &str {
    match location.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains(['/', '?']) => {
            rest.find(['/', '?']).map_or("", |end| &rest[end..])
        }
        _ => location,
    }
}

// ============================================================================
// Match results
// ============================================================================

/// One matched node along a resolution chain
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Arena id of the matched node
    pub id: RouteId,
    pub route: RouteRef,
    /// Concrete location consumed by this node
    pub matched_path: String,
    /// Parameters bound by this node's own pattern
    pub path_params: RouteParams,
    /// Cumulative concrete location up to and including this node
    pub full_path: String,
}

/// Ordered chain from root to leaf, or an error with an empty chain
#[derive(Debug, Clone)]
pub struct RouteMatchList {
    matches: Vec<RouteMatch>,
    uri: String,
    query_params: QueryParams,
    extra: Option<Extra>,
    error: Option<RouterError>,
    transition_enabled: bool,
}

impl RouteMatchList {
    /// A successful chain
    ///
    /// An empty chain is stored as a `NoMatch` failure.
    pub fn matched(
        matches: Vec<RouteMatch>,
        uri: impl Into<String>,
        query_params: QueryParams,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> Self {
        let uri = uri.into();
        let error = matches.is_empty().then(|| RouterError::NoMatch {
            location: uri.clone(),
        });
        Self {
            matches,
            uri,
            query_params,
            extra,
            error,
            transition_enabled,
        }
    }

    /// A failed resolution
    pub fn failed(
        error: RouterError,
        uri: impl Into<String>,
        query_params: QueryParams,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> Self {
        Self {
            matches: Vec::new(),
            uri: uri.into(),
            query_params,
            extra,
            error: Some(error),
            transition_enabled,
        }
    }

    /// Turn this list into a failure, keeping uri, query and payload
    #[must_use]
    pub fn into_failed(self, error: RouterError) -> Self {
        Self {
            matches: Vec::new(),
            error: Some(error),
            ..self
        }
    }

    /// Re-stamp payload and transition flag, used for cached matches
    #[must_use]
    pub(crate) fn with_navigation(mut self, extra: Option<Extra>, transition_enabled: bool) -> Self {
        self.extra = extra;
        self.transition_enabled = transition_enabled;
        self
    }

    pub fn matches(&self) -> &[RouteMatch] {
        &self.matches
    }

    /// The last match, the one that owns render content
    pub fn leaf(&self) -> Option<&RouteMatch> {
        self.matches.last()
    }

    /// The requested location
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    pub fn extra(&self) -> Option<&Extra> {
        self.extra.as_ref()
    }

    pub fn error(&self) -> Option<&RouterError> {
        self.error.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn is_transition_enabled(&self) -> bool {
        self.transition_enabled
    }

    /// The leaf route's transition, if this navigation animates
    #[cfg(feature = "transition")]
    pub fn transition(&self) -> Option<&Transition> {
        if !self.transition_enabled {
            return None;
        }
        self.leaf()?.route.transition.as_ref()
    }

    /// Path parameters of the whole chain; deeper nodes win on duplicates
    pub fn all_path_params(&self) -> RouteParams {
        let mut params = RouteParams::new();
        for m in &self.matches {
            params.merge(&m.path_params);
        }
        params
    }

    /// Build the read-only state view handed to hooks
    pub fn to_state(&self) -> RouterState {
        let leaf = self.leaf();
        RouterState {
            uri: self.uri.clone(),
            path: leaf.map(|l| l.route.path.clone()).unwrap_or_default(),
            matched_location: leaf.map(|l| l.matched_path.clone()).unwrap_or_default(),
            name: leaf.and_then(|l| l.route.name.clone()),
            path_params: self.all_path_params(),
            query_params: self.query_params.clone(),
            extra: self.extra.clone(),
            error: self.error.clone(),
            full_path: leaf.map(|l| l.full_path.clone()).unwrap_or_default(),
        }
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Matches locations against a [`RouteTree`]
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    tree: Arc<RouteTree>,
}

impl RouteMatcher {
    pub fn new(tree: Arc<RouteTree>) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Resolve `location` into a match list
    ///
    /// Never fails outright: an unmatched location yields a list carrying
    /// [`RouterError::NoMatch`] and the original uri.
    pub fn match_location(
        &self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> RouteMatchList {
        let (path, query) = split_location(location);
        let segments = split_segments(path);
        let query_params = QueryParams::from_query_string(query);

        trace_log!("matching {} with segments {:?}", location, segments);

        match self.match_nodes(self.tree.roots(), &segments, 0, "", &[]) {
            Some(chain) => {
                RouteMatchList::matched(chain, location, query_params, extra, transition_enabled)
            }
            None => {
                trace_log!("no route matches {}", location);
                RouteMatchList::failed(
                    RouterError::NoMatch {
                        location: location.to_string(),
                    },
                    location,
                    query_params,
                    extra,
                    transition_enabled,
                )
            }
        }
    }

    fn match_nodes(
        &self,
        ids: &[RouteId],
        segments: &[&str],
        start: usize,
        parent_path: &str,
        chain: &[RouteMatch],
    ) -> Option<Vec<RouteMatch>> {
        ids.iter().find_map(|&id| {
            let node = self.tree.node(id);
            match &node.kind {
                NodeKind::Route { route, pattern } => {
                    self.match_route(id, route, pattern, segments, start, parent_path, chain)
                }
                // Shells, stateful shells and branches consume nothing
                _ => self.match_nodes(&node.children, segments, start, parent_path, chain),
            }
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn match_route(
        &self,
        id: RouteId,
        route: &RouteRef,
        pattern: &RoutePattern,
        segments: &[&str],
        start: usize,
        parent_path: &str,
        chain: &[RouteMatch],
    ) -> Option<Vec<RouteMatch>> {
        let found = pattern.match_at(segments, start)?;
        let next = start + found.consumed;
        let full_path = format!("{}{}", parent_path.trim_end_matches('/'), found.matched_path);

        trace_log!("{} matched {} at segment {}", route.path, found.matched_path, start);

        let mut extended = chain.to_vec();
        extended.push(RouteMatch {
            id,
            route: Arc::clone(route),
            matched_path: found.matched_path,
            path_params: found.params,
            full_path: full_path.clone(),
        });

        if next >= segments.len() {
            return Some(extended);
        }

        self.match_nodes(self.tree.children(id), segments, next, &full_path, &extended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Route, RouteBase, ShellBranch, ShellRoute, StatefulShellRoute};

    fn matcher(routes: Vec<RouteBase>) -> RouteMatcher {
        RouteMatcher::new(Arc::new(RouteTree::new(&routes)))
    }

    fn paths(list: &RouteMatchList) -> Vec<&str> {
        list.matches()
            .iter()
            .map(|m| m.route.path.as_str())
            .collect()
    }

    fn app() -> RouteMatcher {
        matcher(vec![
            Route::new("/")
                .name("home")
                .route(Route::new("about"))
                .into(),
            ShellRoute::new()
                .route(
                    Route::new("/users")
                        .name("users")
                        .route(Route::new(":id").name("user").route(Route::new("posts/:postId"))),
                )
                .route(Route::new("/settings"))
                .into(),
            Route::new("/files/*").into(),
        ])
    }

    #[test]
    fn test_segment_parsing() {
        assert_eq!(Segment::parse("users"), Segment::Literal("users".to_string()));
        assert_eq!(Segment::parse(":id"), Segment::Param("id".to_string()));
        assert_eq!(Segment::parse("*"), Segment::Wildcard);
    }

    #[test]
    fn test_pattern_display_and_params() {
        let pattern = RoutePattern::from_path("/users/:id/posts/:postId");
        assert_eq!(pattern.to_string(), "/users/:id/posts/:postId");
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id", "postId"]);
        assert_eq!(RoutePattern::from_path("/").to_string(), "/");
        assert!(RoutePattern::from_path("/").is_root());
    }

    #[test]
    fn test_pattern_matches_whole_path() {
        let pattern = RoutePattern::from_path("/users/:id");

        let params = pattern.matches("/users/123");
        assert_eq!(params.as_ref().and_then(|p| p.get("id")), Some("123"));
        assert!(pattern.matches("/users").is_none());
        assert!(pattern.matches("/users/123/posts").is_none());
    }

    #[test]
    fn test_wildcard_matches_single_segment() {
        let pattern = RoutePattern::from_path("/files/*");

        assert!(pattern.matches("/files/docs").is_some());
        assert!(pattern.matches("/files/docs/report.pdf").is_none());
        assert!(pattern.matches("/other").is_none());
    }

    #[test]
    fn test_literal_is_case_insensitive() {
        let pattern = RoutePattern::from_path("/Settings");
        assert!(pattern.matches("/settings").is_some());
        assert!(pattern.matches("/SETTINGS").is_some());
    }

    #[test]
    fn test_root_pattern_only_at_index_zero() {
        let pattern = RoutePattern::from_path("/");
        let segments = ["about"];

        let at_zero = pattern.match_at(&segments, 0);
        assert_eq!(at_zero.as_ref().map(|m| m.consumed), Some(0));
        assert_eq!(at_zero.map(|m| m.matched_path), Some("/".to_string()));
        assert!(pattern.match_at(&segments, 1).is_none());
    }

    #[test]
    fn test_match_root() {
        let list = app().match_location("/", None, true);

        assert!(!list.is_error());
        assert_eq!(paths(&list), vec!["/"]);
        assert_eq!(list.leaf().map(|l| l.full_path.as_str()), Some("/"));
    }

    #[test]
    fn test_match_child_of_root() {
        let list = app().match_location("/about", None, true);

        assert_eq!(paths(&list), vec!["/", "about"]);
        assert_eq!(list.leaf().map(|l| l.full_path.as_str()), Some("/about"));
    }

    #[test]
    fn test_match_through_shell() {
        let list = app().match_location("/users/42/posts/7", None, true);

        assert_eq!(paths(&list), vec!["/users", ":id", "posts/:postId"]);
        let leaf = list.leaf().map(|l| (l.matched_path.as_str(), l.full_path.as_str()));
        assert_eq!(leaf, Some(("/posts/7", "/users/42/posts/7")));

        let params = list.all_path_params();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("postId"), Some("7"));
    }

    #[test]
    fn test_trailing_slash_and_fragment_ignored() {
        let list = app().match_location("/settings/#section", None, true);
        assert_eq!(paths(&list), vec!["/settings"]);
    }

    #[test]
    fn test_scheme_and_host_ignored() {
        let list = app().match_location("app://example.com/users/42?tab=posts", None, true);

        assert_eq!(paths(&list), vec!["/users", ":id"]);
        assert_eq!(list.query_params().get("tab"), Some("posts"));
        assert_eq!(list.uri(), "app://example.com/users/42?tab=posts");

        assert_eq!(split_location("app://host"), ("", ""));
        assert_eq!(split_location("app://host?x=1"), ("", "x=1"));
        assert_eq!(split_location("/users?next=a://b"), ("/users", "next=a://b"));
    }

    #[test]
    fn test_query_parsed_and_uri_preserved() {
        let list = app().match_location("/users?sort=name&tag=a&tag=b", None, true);

        assert_eq!(list.uri(), "/users?sort=name&tag=a&tag=b");
        assert_eq!(list.query_params().get("sort"), Some("name"));
        assert_eq!(list.query_params().get_all("tag").len(), 2);
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let list = app().match_location("/users/john%20doe", None, true);
        assert_eq!(list.all_path_params().get("id"), Some("john doe"));
    }

    #[test]
    fn test_no_match_keeps_uri_and_empty_chain() {
        let list = app().match_location("/nowhere?x=1", None, false);

        assert!(list.is_error());
        assert!(list.is_empty());
        assert_eq!(list.uri(), "/nowhere?x=1");
        assert_eq!(list.query_params().get("x"), Some("1"));
        assert!(!list.is_transition_enabled());
        assert!(matches!(list.error(), Some(RouterError::NoMatch { .. })));
    }

    #[test]
    fn test_backtracks_to_sibling() {
        let m = matcher(vec![
            Route::new("/a").route(Route::new("b")).into(),
            Route::new("/a/c").into(),
        ]);

        let list = m.match_location("/a/c", None, true);

        assert_eq!(paths(&list), vec!["/a/c"]);
    }

    #[test]
    fn test_first_declared_wins() {
        let m = matcher(vec![
            Route::new("/items/:id").name("by_id").into(),
            Route::new("/items/new").name("new").into(),
        ]);

        let list = m.match_location("/items/new", None, true);

        assert_eq!(list.to_state().name.as_deref(), Some("by_id"));
    }

    #[test]
    fn test_deeper_param_wins() {
        let m = matcher(vec![Route::new("/:id").route(Route::new(":id")).into()]);

        let list = m.match_location("/outer/inner", None, true);

        assert_eq!(list.all_path_params().get("id"), Some("inner"));
    }

    #[test]
    fn test_stateful_shell_branches_in_order() {
        let m = matcher(vec![StatefulShellRoute::new(vec![
            ShellBranch::new(vec![Route::new("/feed").into()]),
            ShellBranch::new(vec![Route::new("/profile").into()]),
        ])
        .into()]);

        let list = m.match_location("/profile", None, true);
        assert_eq!(paths(&list), vec!["/profile"]);
        assert_eq!(list.leaf().map(|l| l.id.index()), Some(4));
    }

    #[test]
    fn test_to_state() {
        let extra: Extra = Arc::new(5_i32);
        let list = app().match_location("/users/42?tab=posts", Some(extra), true);
        let state = list.to_state();

        assert_eq!(state.uri, "/users/42?tab=posts");
        assert_eq!(state.path, ":id");
        assert_eq!(state.matched_location, "/42");
        assert_eq!(state.full_path, "/users/42");
        assert_eq!(state.name.as_deref(), Some("user"));
        assert_eq!(state.path_param("id"), Some("42"));
        assert_eq!(state.query_param("tab"), Some("posts"));
        assert_eq!(state.extra_as::<i32>(), Some(&5));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_into_failed_clears_chain() {
        let list = app()
            .match_location("/settings", None, true)
            .into_failed(RouterError::NoMatch {
                location: "/x".to_string(),
            });

        assert!(list.is_empty());
        assert!(list.is_error());
        assert_eq!(list.uri(), "/settings");
    }

    #[test]
    fn test_matched_with_empty_chain_is_failure() {
        let list = RouteMatchList::matched(Vec::new(), "/x", QueryParams::new(), None, true);
        assert!(list.is_error());
    }
}
