use purr_common::kinds::{FnType, Fresh, Kind, Vector};

use super::SelfTypes;
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
fn indirect_recursion_becomes_self() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![sv("B")], vec![sv("C")]);

    let mut unifiers = Unifiers::from([
        ("a".to_string(), Kind::Function(f.clone())),
        ("B".to_string(), Kind::Vector(Vector::from_kinds([sv("A"), tv("a")]))),
    ]);

    let mut self_types = SelfTypes::new();
    let tagged = self_types.resolve(&mut unifiers, &mut fresh);

    assert_eq!(1, tagged.len());
    let (tag, found) = &tagged[0];
    assert_eq!(f.id(), found.id());
    assert_eq!(Some(&Kind::SelfType(*tag)), unifiers.get("a"));
}

#[test]
fn plain_functions_are_kept() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![sv("A"), tv("b")], vec![sv("A")]);

    let mut unifiers = Unifiers::from([
        ("a".to_string(), Kind::Function(f.clone())),
        ("b".to_string(), tv("b")),
    ]);

    let mut self_types = SelfTypes::new();
    assert!(self_types.resolve(&mut unifiers, &mut fresh).is_empty());
    assert_eq!(Some(&Kind::Function(f)), unifiers.get("a"));
}

#[test]
fn cycles_between_other_variables_terminate() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![tv("x")], vec![]);

    let mut unifiers = Unifiers::from([
        ("a".to_string(), Kind::Function(f)),
        ("x".to_string(), tv("y")),
        ("y".to_string(), tv("x")),
    ]);

    let mut self_types = SelfTypes::new();
    assert!(self_types.resolve(&mut unifiers, &mut fresh).is_empty());
}

#[test]
fn annotated_self_types_are_registered() {
    let mut fresh = Fresh::new();
    let tag = fresh.self_tag();
    let inner = func(&mut fresh, vec![sv("R"), Kind::SelfType(tag)], vec![sv("R")]);
    let outer = func(&mut fresh, vec![], vec![inner.clone().into()]);

    let mut self_types = SelfTypes::new();
    self_types.register_enclosing(&outer);

    let expected = func(&mut fresh, vec![Kind::SelfType(tag)], vec![]);
    assert_eq!(Some(&expected), self_types.template(tag));
    assert_eq!(1, self_types.len());
}
