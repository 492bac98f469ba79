use super::{RegisterError, Router, Verb, VerbSet};
use crate::handlers::{HandlerRef, ResourceBuilder};

fn noop() -> HandlerRef {
    HandlerRef::plain(|_, _, _| Ok(()))
}

#[test]
fn test_duplicate_pattern_rejected() {
    let mut router = Router::new();
    router.register("/home", noop(), None).unwrap();
    let err = router.register("/home", noop(), None).unwrap_err();
    assert_eq!(
        err,
        RegisterError::DuplicateRoute {
            pattern: "/home".into()
        }
    );
    assert_eq!(router.len(), 1);
    assert!(router.match_path("/home").is_some());
}

#[test]
fn test_invalid_pattern_leaves_table_untouched() {
    let mut router = Router::new();
    let err = router.register("/a/{x:float}", noop(), None).unwrap_err();
    assert!(matches!(err, RegisterError::InvalidPattern { .. }));
    assert!(router.is_empty());
}

#[test]
fn test_first_registered_wins() {
    let mut router = Router::new();
    router.register("/users/{id:int}", noop(), None).unwrap();
    router.register("/users/{name}", noop(), None).unwrap();

    let m = router.match_path("/users/42").unwrap();
    assert_eq!(m.pattern(), "/users/{id:int}");
    assert_eq!(m.path_params.get_int("id"), Some(42));

    let m = router.match_path("/users/alice").unwrap();
    assert_eq!(m.pattern(), "/users/{name}");
    assert_eq!(m.path_params.get_str("name"), Some("alice"));
}

#[test]
fn test_default_allowed_verbs() {
    let mut router = Router::new();
    router.register("/any", noop(), None).unwrap();
    router
        .register("/get-only", noop(), Some(VerbSet::from([Verb::Get])))
        .unwrap();

    assert_eq!(router.match_path("/any").unwrap().allowed(), VerbSet::all());
    let only = router.match_path("/get-only").unwrap().allowed();
    assert!(only.contains(Verb::Get));
    assert!(!only.contains(Verb::Post));
}

#[test]
fn test_resource_allowed_comes_from_resource() {
    let mut router = Router::new();
    let book = ResourceBuilder::new()
        .get(|_, _, _| Ok(()))
        .post(|_, _, _| Ok(()))
        .build();
    // The explicit set is ignored for resources.
    router
        .register("/book", book, Some(VerbSet::from([Verb::Delete])))
        .unwrap();
    let allowed = router.match_path("/book").unwrap().allowed();
    assert_eq!(allowed, VerbSet::from([Verb::Get, Verb::Post]));
}

#[test]
fn test_patterns_in_precedence_order() {
    let mut router = Router::new();
    for p in ["/b", "/a", "/c/{x}"] {
        router.register(p, noop(), None).unwrap();
    }
    assert_eq!(router.patterns(), vec!["/b", "/a", "/c/{x}"]);
}
