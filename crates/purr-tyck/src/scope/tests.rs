use purr_common::kinds::{FnType, Fresh, Kind, Vector};

use super::Scopes;
use crate::unify::Unifiers;

fn tv(name: &str) -> Kind {
    Kind::TypeVar(name.into())
}

fn sv(name: &str) -> Kind {
    Kind::StackVar(name.into())
}

fn func(fresh: &mut Fresh, cons: Vec<Kind>, prod: Vec<Kind>) -> FnType {
    fresh.function(Vector::from_kinds(cons), Vector::from_kinds(prod), false)
}

#[test]
fn variables_bind_at_the_innermost_common_function() {
    let mut fresh = Fresh::new();
    let inner = func(&mut fresh, vec![sv("B"), tv("a")], vec![sv("B"), tv("b")]);
    let inner_id = inner.id();
    let outer = func(&mut fresh, vec![sv("A"), tv("a")], vec![sv("A"), inner.into()]);

    let scopes = Scopes::compute(&outer, &Unifiers::new());

    assert_eq!(Some(outer.id()), scopes.parent(inner_id));
    assert_eq!(Some(outer.id()), scopes.binding_scope("a"));
    assert_eq!(Some(inner_id), scopes.binding_scope("B"));
    assert_eq!(None, scopes.binding_scope("nope"));

    assert!(scopes.is_free_at(inner_id, "a"));
    assert!(!scopes.is_free_at(inner_id, "b"));
    assert!(!scopes.is_free_at(outer.id(), "a"));

    assert!(scopes.is_bound_within(inner_id, "b"));
    assert!(!scopes.is_bound_within(inner_id, "a"));
    assert!(scopes.is_bound_within(outer.id(), "a"));
}

#[test]
fn unifiers_count_where_their_variable_occurs() {
    let mut fresh = Fresh::new();
    let quoted = func(&mut fresh, vec![sv("C"), tv("c")], vec![sv("C")]);
    let quoted_id = quoted.id();
    let root = func(&mut fresh, vec![sv("A")], vec![sv("A"), tv("q"), tv("q")]);

    let unifiers = Unifiers::from([("q".to_string(), Kind::Function(quoted))]);
    let scopes = Scopes::compute(&root, &unifiers);

    assert_eq!(Some(root.id()), scopes.parent(quoted_id));
    assert!(scopes.is_bound_within(quoted_id, "c"));
    assert!(scopes.is_bound_within(quoted_id, "C"));
    assert!(!scopes.is_bound_within(quoted_id, "A"));
}

#[test]
fn cyclic_unifiers_terminate() {
    let mut fresh = Fresh::new();
    let root = func(&mut fresh, vec![tv("x")], vec![tv("y")]);

    let unifiers = Unifiers::from([
        ("x".to_string(), tv("y")),
        ("y".to_string(), tv("x")),
    ]);

    let scopes = Scopes::compute(&root, &unifiers);
    assert_eq!(Some(root.id()), scopes.binding_scope("x"));
    assert_eq!(root.id(), scopes.root());
}
