//! Named route resolution
//!
//! Every named route is indexed once by its absolute pattern so callers can
//! navigate by name instead of spelling locations out.

use crate::matcher::{RoutePattern, Segment};
use crate::nested::join_route_path;
use crate::params::{encode_component, QueryParams, RouteParams};
use crate::tree::{NodeKind, RouteId, RouteTree};
use crate::{trace_log, Result, RouterError};
use std::collections::HashMap;

/// An indexed named route
#[derive(Debug, Clone)]
pub struct NamedRoute {
    pub id: RouteId,
    /// Absolute pattern, e.g. `/users/:id`
    pub path: String,
    pattern: RoutePattern,
}

/// Name to absolute pattern index
#[derive(Debug, Clone, Default)]
pub struct NamedRouteResolver {
    routes: HashMap<String, NamedRoute>,
}

impl NamedRouteResolver {
    /// Index every named route in `tree`
    ///
    /// Fails with [`RouterError::DuplicateRouteName`] when two routes share a name.
    pub fn new(tree: &RouteTree) -> Result<Self> {
        let mut resolver = Self::default();
        for &root in tree.roots() {
            resolver.collect(tree, root, "")?;
        }
        Ok(resolver)
    }

    fn collect(&mut self, tree: &RouteTree, id: RouteId, parent_path: &str) -> Result<()> {
        let node = tree.node(id);
        let full_path = match &node.kind {
            NodeKind::Route { route, .. } => {
                let full_path = join_route_path(parent_path, &route.path).into_owned();
                if let Some(name) = &route.name {
                    if self.routes.contains_key(name) {
                        return Err(RouterError::DuplicateRouteName { name: name.clone() });
                    }
                    trace_log!("named route '{}' -> {}", name, full_path);
                    self.routes.insert(
                        name.clone(),
                        NamedRoute {
                            id,
                            pattern: RoutePattern::from_path(&full_path),
                            path: full_path.clone(),
                        },
                    );
                }
                full_path
            }
            _ => parent_path.to_string(),
        };

        for &child in &node.children {
            self.collect(tree, child, &full_path)?;
        }
        Ok(())
    }

    /// Build a location for `name`
    ///
    /// Parameter values and the query string are percent-encoded. Parameters
    /// the pattern does not mention are ignored.
    pub fn resolve(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<String> {
        let named = self
            .routes
            .get(name)
            .ok_or_else(|| RouterError::MissingNamedRoute {
                name: name.to_string(),
            })?;

        let mut missing: Vec<String> = Vec::new();
        for param in named.pattern.param_names() {
            if !path_params.contains(param) && !missing.iter().any(|m| m == param) {
                missing.push(param.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(RouterError::MissingPathParameter {
                name: name.to_string(),
                missing,
            });
        }

        let mut location = String::new();
        for segment in &named.pattern.segments {
            location.push('/');
            match segment {
                Segment::Param(param) => {
                    let value = path_params.get(param).unwrap_or_default();
                    location.push_str(&encode_component(value));
                }
                other => location.push_str(&other.to_string()),
            }
        }
        if location.is_empty() {
            location.push('/');
        }

        if !query_params.is_empty() {
            location.push('?');
            location.push_str(&query_params.to_query_string());
        }

        Ok(location)
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NamedRoute> {
        self.routes.get(name)
    }

    /// Absolute pattern for `name`
    pub fn pattern(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(|r| r.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Route, RouteBase, ShellBranch, ShellRoute, StatefulShellRoute};

    fn resolver() -> NamedRouteResolver {
        let routes: Vec<RouteBase> = vec![
            Route::new("/").name("home").into(),
            ShellRoute::new()
                .route(
                    Route::new("/users").name("users").route(
                        Route::new(":id")
                            .name("user")
                            .route(Route::new("posts/:postId").name("post")),
                    ),
                )
                .route(Route::new("/settings").route(Route::new("/admin").name("admin")))
                .into(),
            StatefulShellRoute::new(vec![ShellBranch::new(vec![Route::new("/feed")
                .name("feed")
                .into()])])
            .into(),
        ];
        NamedRouteResolver::new(&RouteTree::new(&routes)).unwrap()
    }

    #[test]
    fn test_patterns() {
        let r = resolver();

        assert_eq!(r.len(), 6);
        assert_eq!(r.pattern("home"), Some("/"));
        assert_eq!(r.pattern("user"), Some("/users/:id"));
        assert_eq!(r.pattern("post"), Some("/users/:id/posts/:postId"));
        assert_eq!(r.pattern("admin"), Some("/admin"));
        assert_eq!(r.pattern("feed"), Some("/feed"));
        assert!(r.has_route("users"));
        assert!(!r.has_route("missing"));
    }

    #[test]
    fn test_resolve_with_params() {
        let r = resolver();
        let params = RouteParams::new().with("id", "42").with("postId", "7");

        let location = r.resolve("post", &params, &QueryParams::new()).unwrap();

        assert_eq!(location, "/users/42/posts/7");
    }

    #[test]
    fn test_resolve_root() {
        let r = resolver();
        assert_eq!(
            r.resolve("home", &RouteParams::new(), &QueryParams::new()).unwrap(),
            "/"
        );
    }

    #[test]
    fn test_resolve_encodes_values_and_query() {
        let r = resolver();
        let params = RouteParams::new().with("id", "john doe");
        let query = QueryParams::new().with("tab", "a&b").with("sort", "name");

        let location = r.resolve("user", &params, &query).unwrap();

        assert_eq!(location, "/users/john%20doe?sort=name&tab=a%26b");
    }

    #[test]
    fn test_extra_params_ignored() {
        let r = resolver();
        let params = RouteParams::new().with("id", "1").with("unused", "x");

        assert_eq!(
            r.resolve("user", &params, &QueryParams::new()).unwrap(),
            "/users/1"
        );
    }

    #[test]
    fn test_missing_params_listed_in_order() {
        let r = resolver();

        let err = r
            .resolve("post", &RouteParams::new(), &QueryParams::new())
            .unwrap_err();

        assert_eq!(
            err,
            RouterError::MissingPathParameter {
                name: "post".to_string(),
                missing: vec!["id".to_string(), "postId".to_string()],
            }
        );
    }

    #[test]
    fn test_repeated_param_reported_once() {
        let routes: Vec<RouteBase> = vec![Route::new("/teams/:id")
            .route(Route::new(":id").route(Route::new(":slug").name("member")))
            .into()];
        let r = NamedRouteResolver::new(&RouteTree::new(&routes)).unwrap();

        let err = r
            .resolve("member", &RouteParams::new(), &QueryParams::new())
            .unwrap_err();

        assert_eq!(
            err,
            RouterError::MissingPathParameter {
                name: "member".to_string(),
                missing: vec!["id".to_string(), "slug".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_name() {
        let r = resolver();

        let err = r
            .resolve("nope", &RouteParams::new(), &QueryParams::new())
            .unwrap_err();

        assert_eq!(
            err,
            RouterError::MissingNamedRoute {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let routes: Vec<RouteBase> = vec![
            Route::new("/a").name("dup").into(),
            ShellRoute::new().route(Route::new("/b").name("dup")).into(),
        ];

        let err = NamedRouteResolver::new(&RouteTree::new(&routes)).unwrap_err();

        assert_eq!(
            err,
            RouterError::DuplicateRouteName {
                name: "dup".to_string()
            }
        );
    }
}
