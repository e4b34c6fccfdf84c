//! Integration tests for shell_router
//!
//! These tests drive the router through complete workflows: initialization,
//! shell-aware navigation, named routes, redirects, restoration and events.

use shell_router::*;
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Marker render references the UI would downcast
#[derive(Debug, PartialEq)]
enum Screen {
    Home,
    Login,
    Users,
    UserDetail,
    Settings,
    Tabs,
}

fn app_routes() -> Vec<RouteBase> {
    vec![
        Route::new("/").name("home").builder(Screen::Home).into(),
        Route::new("/login")
            .name("login")
            .builder(Screen::Login)
            .into(),
        ShellRoute::new()
            .builder(Screen::Tabs)
            .route(
                Route::new("/users")
                    .name("users")
                    .builder(Screen::Users)
                    .route(
                        Route::new(":id")
                            .name("user-profile")
                            .builder(Screen::UserDetail)
                            .route(Route::new("posts/:postId").name("user-post")),
                    ),
            )
            .route(
                Route::new("/settings")
                    .name("settings")
                    .builder(Screen::Settings),
            )
            .into(),
        StatefulShellRoute::new(vec![
            ShellBranch::new(vec![Route::new("/feed").into()]).initial_path("/feed"),
            ShellBranch::new(vec![Route::new("/inbox").into()]),
        ])
        .into(),
    ]
}

fn recording_observer() -> (Arc<Mutex<Vec<NavigationEvent>>>, impl NavigationObserver) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let observer = observer_fn(move |event: &NavigationEvent| {
        sink.lock().unwrap().push(event.clone());
    });
    (events, observer)
}

// ============================================================================
// Matching
// ============================================================================

#[tokio::test]
async fn test_literal_leaf_matches_its_path() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    for path in ["/login", "/settings", "/users", "/feed"] {
        router.go(path).await;
        let leaf = router.current_match().and_then(|m| m.leaf()).unwrap();
        assert_eq!(leaf.matched_path, path);
        assert!(leaf.path_params.is_empty());
    }
}

#[tokio::test]
async fn test_param_extraction_and_render_reference() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    router.go("/users/42/posts/7?highlight=true").await;

    let state = router.current_state();
    assert_eq!(state.path_param("id"), Some("42"));
    assert_eq!(state.path_param("postId"), Some("7"));
    assert_eq!(state.query_param("highlight"), Some("true"));
    assert_eq!(state.full_path, "/users/42/posts/7");

    let chain = router.current_match().unwrap().matches();
    let screens: Vec<Option<&Screen>> = chain.iter().map(|m| m.route.builder_as()).collect();
    assert_eq!(
        screens,
        vec![Some(&Screen::Users), Some(&Screen::UserDetail), None]
    );
}

// ============================================================================
// Shell-aware navigation
// ============================================================================

#[tokio::test]
async fn test_go_between_tabs_keeps_tab_root() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    router.go("/users").await;
    router.push("/users/42").await;
    router.go("/settings").await;

    assert_eq!(router.location_strings(), vec!["/users", "/settings"]);
}

#[tokio::test]
async fn test_go_prunes_deep_tab_history() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    router.go("/users").await;
    router.push("/users/1").await;
    router.push("/users/1/posts/9").await;
    router.go("/users/2").await;

    assert_eq!(router.location_strings(), vec!["/users", "/users/2"]);
}

#[tokio::test]
async fn test_go_across_shells_replaces_stack() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    router.go("/users").await;
    router.push("/users/1").await;
    router.go("/login").await;

    assert_eq!(router.location_strings(), vec!["/login"]);

    router.go("/feed").await;
    router.push("/inbox").await;
    router.go("/users").await;

    assert_eq!(router.location_strings(), vec!["/users"]);
}

#[tokio::test]
async fn test_stateful_shell_inside_shell_keeps_branch_history() {
    init_logging();
    let mut router = Router::new(vec![ShellRoute::new()
        .route(StatefulShellRoute::new(vec![
            ShellBranch::new(vec![Route::new("/feed").route(Route::new(":id")).into()]),
            ShellBranch::new(vec![Route::new("/inbox").into()]),
        ]))
        .into()])
    .unwrap();

    router.go("/inbox").await;
    router.push("/feed").await;
    router.push("/feed/1").await;
    router.go("/feed/2").await;

    assert_eq!(
        router.location_strings(),
        vec!["/inbox", "/feed", "/feed/1", "/feed/2"]
    );
}

#[tokio::test]
async fn test_push_never_shrinks() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();
    router.initialize().await;

    let mut depth = router.depth();
    for location in ["/users", "/login", "/users/3", "/settings", "/feed", "/"] {
        router.push(location).await;
        assert_eq!(router.depth(), depth + 1);
        depth = router.depth();
    }
}

#[tokio::test]
async fn test_pop_semantics() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();
    router.initialize().await;

    assert!(!router.can_pop());
    assert!(!router.pop());
    assert_eq!(router.location_strings(), vec!["/"]);

    router.push("/login").await;
    router.push("/settings").await;

    assert!(router.pop());
    assert_eq!(router.depth(), 2);
    assert!(router.pop());
    assert!(!router.pop());
    assert_eq!(router.location_strings(), vec!["/"]);
}

#[tokio::test]
async fn test_stacks_stay_aligned() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();

    router.go("/users").await;
    router.push("/users/5").await;
    router.push_replacement("/users/6").await;
    router.push("/nowhere").await;
    router.go("/settings").await;
    router.pop();

    assert_eq!(router.matches().len(), router.locations().len());
}

// ============================================================================
// Named routes
// ============================================================================

#[tokio::test]
async fn test_named_resolution() {
    init_logging();
    let router = Router::new(app_routes()).unwrap();
    let params = RouteParams::new().with("id", "42");

    assert_eq!(
        router
            .named_location("user-profile", &params, &QueryParams::new())
            .unwrap(),
        "/users/42"
    );

    let err = router
        .named_location("user-profile", &RouteParams::new(), &QueryParams::new())
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::MissingPathParameter { ref missing, .. } if missing == &["id".to_string()]
    ));
}

#[tokio::test]
async fn test_hyphenated_parameter_names() {
    init_logging();
    let mut router = Router::new(vec![Route::new("/members")
        .route(Route::new(":member-id").name("member"))
        .into()])
    .unwrap();

    let location = router
        .named_location(
            "member",
            &RouteParams::new().with("member-id", "7"),
            &QueryParams::new(),
        )
        .unwrap();
    assert_eq!(location, "/members/7");

    router.go(&location).await;
    assert_eq!(router.current_state().path_param("member-id"), Some("7"));
}

#[tokio::test]
async fn test_push_named_with_query_and_extra() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();
    router.go("/users").await;

    let params = RouteParams::new().with("id", "ada lovelace");
    let query = QueryParams::new().with("tab", "posts");
    let extra: Extra = Arc::new(String::from("from-search"));
    router
        .push_named_with_extra("user-profile", &params, &query, extra)
        .await
        .unwrap();

    assert_eq!(
        router.current_location(),
        Some("/users/ada%20lovelace?tab=posts")
    );
    let state = router.current_state();
    assert_eq!(state.path_param("id"), Some("ada lovelace"));
    assert_eq!(state.query_param("tab"), Some("posts"));
    assert_eq!(
        state.extra_as::<String>().map(String::as_str),
        Some("from-search")
    );
    assert!(router.locations()[1].extra.is_some());
}

#[tokio::test]
async fn test_unknown_name_leaves_stack_untouched() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();
    router.initialize().await;

    let result = router
        .go_named("missing", &RouteParams::new(), &QueryParams::new())
        .await;

    assert!(matches!(result, Err(RouterError::MissingNamedRoute { .. })));
    assert_eq!(router.location_strings(), vec!["/"]);
}

// ============================================================================
// Redirects
// ============================================================================

#[tokio::test]
async fn test_redirect_loop_is_an_error_destination() {
    init_logging();
    let mut router = Router::builder(vec![
        Route::new("/").into(),
        Route::new("/a")
            .redirect(redirect_fn(|_, _| async { Some("/b".to_string()) }))
            .into(),
        Route::new("/b")
            .redirect(redirect_fn(|_, _| async { Some("/a".to_string()) }))
            .into(),
    ])
    .build()
    .unwrap();
    router.initialize().await;

    let result = router.push("/a").await;

    assert!(matches!(
        result.error(),
        Some(RouterError::RedirectLoop { .. })
    ));
    assert_eq!(router.location_strings(), vec!["/", "/a"]);
    let top = router.current_match().unwrap();
    assert!(top.is_error());
    assert!(top.matches().is_empty());
}

#[tokio::test]
async fn test_auth_redirect_through_context() {
    struct Session;

    init_logging();
    let mut router = Router::builder(app_routes())
        .redirect(redirect_fn(|cx, state| {
            let signed_in = cx.contains::<Session>();
            let on_login = state.name.as_deref() == Some("login");
            async move { (!signed_in && !on_login).then(|| "/login".to_string()) }
        }))
        .build()
        .unwrap();

    router.go("/settings").await;
    assert_eq!(router.current_state().name.as_deref(), Some("login"));

    router.context_mut().insert(Session);
    router.go("/settings").await;
    assert_eq!(router.current_state().name.as_deref(), Some("settings"));
}

#[tokio::test]
async fn test_error_hook_suppresses_error_entry() {
    init_logging();
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);
    let mut router = Router::builder(app_routes())
        .on_exception(move |state: &RouterState| {
            sink.lock().unwrap().push(state.error.clone());
        })
        .max_redirects(2)
        .build()
        .unwrap();
    router.initialize().await;

    router.push("/does/not/exist").await;

    assert_eq!(router.location_strings(), vec!["/"]);
    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], Some(RouterError::NoMatch { .. })));
}

// ============================================================================
// Restoration
// ============================================================================

#[tokio::test]
async fn test_restore_skips_unresolvable_entries() {
    init_logging();
    let mut router = Router::new(vec![Route::new("/").into(), Route::new("/a").into()]).unwrap();

    let depth = router.restore(&["/", "/a", "/b"]).await;

    assert_eq!(depth, 2);
    assert_eq!(router.location_strings(), vec!["/", "/a"]);
    assert!(router.matches().iter().all(|m| !m.is_error()));
}

#[tokio::test]
async fn test_saved_locations_round_trip() {
    init_logging();
    let mut router = Router::new(app_routes()).unwrap();
    router.go("/users").await;
    router.push("/users/8").await;
    let saved = router.location_strings();

    let mut recreated = Router::new(app_routes()).unwrap();
    recreated.initialize_from(saved.as_slice()).await;

    assert_eq!(recreated.location_strings(), saved);
    assert_eq!(recreated.current_state().path_param("id"), Some("8"));
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_event_stream() {
    init_logging();
    let (events, observer) = recording_observer();
    let mut router = Router::builder(app_routes())
        .observer(observer)
        .debug_log_diagnostics(true)
        .build()
        .unwrap();

    router.initialize().await;
    router.push("/users").await;
    router.push_replacement("/settings").await;
    router.pop();
    router.push("/missing").await;
    router.restore(&["/", "/login"]).await;

    let kinds: Vec<NavigationType> = events.lock().unwrap().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NavigationType::Go,
            NavigationType::Push,
            NavigationType::PushReplacement,
            NavigationType::Pop,
            NavigationType::Error,
            NavigationType::Restore,
        ]
    );

    let events = events.lock().unwrap();
    assert_eq!(events[1].to_string(), "[PUSH] /users (from: /) [depth=2]");
    assert_eq!(events[3].location, "/");
    assert_eq!(events[3].previous_location.as_deref(), Some("/settings"));
    assert_eq!(events[5].location, "/login");
}

#[cfg(feature = "transition")]
#[tokio::test]
async fn test_transition_only_exposed_on_push() {
    init_logging();
    let mut router = Router::new(vec![
        Route::new("/").into(),
        Route::new("/details")
            .transition(Transition::slide_left(250))
            .into(),
    ])
    .unwrap();

    router.go("/details").await;
    assert!(router.current_match().unwrap().transition().is_none());

    router.go("/").await;
    router.push("/details").await;
    assert!(matches!(
        router.current_match().unwrap().transition(),
        Some(Transition::Slide {
            direction: SlideDirection::Left,
            duration_ms: 250
        })
    ));
}
