use super::{Fresh, FnType, Guard, Kind, Vector, ANY, DYNAMIC_FN};

fn tv(name: &str) -> Kind {
    Kind::TypeVar(name.into())
}

fn sv(name: &str) -> Kind {
    Kind::StackVar(name.into())
}

fn int() -> Kind {
    Kind::simple("int")
}

fn func(fresh: &mut Fresh, cons: Vec<Kind>, prod: Vec<Kind>) -> FnType {
    fresh.function(Vector::from_kinds(cons), Vector::from_kinds(prod), false)
}

#[test]
fn vector_push_splices_vectors() {
    let mut vec = Vector::from_kinds([int()]);
    vec.push(Vector::from_kinds([tv("a"), tv("b")]).into());
    vec.push_bottom(Vector::from_kinds([sv("R")]).into());

    assert_eq!(&[sv("R"), int(), tv("a"), tv("b")], vec.kinds());
}

#[test]
fn vector_top_and_rest() {
    let vec = Vector::from_kinds([sv("R"), int(), tv("a")]);

    assert_eq!(Some(&tv("a")), vec.top());
    assert_eq!(Some(&sv("R")), vec.bottom());
    assert_eq!(Vector::from_kinds([sv("R"), int()]), vec.rest());
    assert!(Vector::new().rest().is_empty());
}

#[test]
fn stack_vars_only_at_bottom() {
    assert!(Vector::from_kinds([sv("R"), int()]).is_well_formed());
    assert!(!Vector::from_kinds([int(), sv("R")]).is_well_formed());
}

#[test]
fn function_equality_ignores_ids() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![int()], vec![int()]);
    let g = func(&mut fresh, vec![int()], vec![int()]);

    assert_ne!(f.id(), g.id());
    assert_eq!(f, g);
}

#[test]
fn any_is_a_supertype() {
    assert!(int().is_subtype_of(&Kind::simple(ANY)));
    assert!(int().is_subtype_of(&int()));
    assert!(!Kind::simple(ANY).is_subtype_of(&int()));
    assert!(!int().is_subtype_of(&Kind::simple("string")));
}

#[test]
fn runtime_polymorphic_functions() {
    let mut fresh = Fresh::new();
    let unary = func(&mut fresh, vec![int()], vec![int()]);
    let binary = func(&mut fresh, vec![int(), int()], vec![int()]);
    let rowed = unary.with_implicit_rows(&mut fresh);

    assert!(unary.is_runtime_polymorphic());
    assert!(rowed.is_runtime_polymorphic());
    assert!(!binary.is_runtime_polymorphic());

    assert!(unary.is_subtype_of(&Kind::simple(DYNAMIC_FN)));
    assert!(!binary.is_subtype_of(&Kind::simple(ANY)));
}

#[test]
fn function_consumption_is_contravariant() {
    let mut fresh = Fresh::new();
    let narrow = func(&mut fresh, vec![int()], vec![int()]);
    let wide = func(&mut fresh, vec![Kind::simple(ANY)], vec![int()]);
    let vague = func(&mut fresh, vec![int()], vec![Kind::simple(ANY)]);

    assert!(wide.is_subtype_of(&narrow.clone().into()));
    assert!(!narrow.is_subtype_of(&wide.into()));
    assert!(narrow.is_subtype_of(&vague.clone().into()));
    assert!(!vague.is_subtype_of(&narrow.into()));
}

#[test]
fn net_slot_counts() {
    let mut fresh = Fresh::new();
    let shared = func(&mut fresh, vec![sv("A"), int()], vec![sv("A"), int(), int()]);
    let split = func(&mut fresh, vec![sv("A"), int()], vec![sv("B")]);

    assert_eq!(Some(1), shared.max_consumption());
    assert_eq!(Some(2), shared.max_production());
    assert_eq!(None, split.max_consumption());
}

#[test]
fn implicit_rows_are_added_recursively() {
    let mut fresh = Fresh::new();
    let inner = func(&mut fresh, vec![tv("a")], vec![]);
    let outer = func(&mut fresh, vec![], vec![inner.into()]);

    let rowed = outer.with_implicit_rows(&mut fresh);

    assert!(matches!(rowed.cons.bottom(), Some(Kind::StackVar(_))));
    assert_eq!(rowed.cons.bottom(), rowed.prod.bottom());

    let Some(Kind::Function(inner)) = rowed.prod.top() else {
        panic!("expected a function on top of the production");
    };
    assert!(matches!(inner.cons.bottom(), Some(Kind::StackVar(_))));
    assert_eq!(inner.cons.bottom(), inner.prod.bottom());
}

#[test]
fn explicit_rows_are_kept() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![sv("A"), tv("b")], vec![sv("A")]);

    assert_eq!(f, f.with_implicit_rows(&mut fresh));
}

#[test]
fn implicit_rows_round_trip() {
    let mut fresh = Fresh::new();
    let f = func(&mut fresh, vec![int()], vec![int(), int()]);

    assert_eq!(f, f.with_implicit_rows(&mut fresh).without_implicit_rows());
}

#[test]
fn shared_rows_are_not_removed() {
    let mut fresh = Fresh::new();
    let inner = func(&mut fresh, vec![sv("A")], vec![sv("A")]);
    let f = func(&mut fresh, vec![sv("A")], vec![sv("A"), inner.into()]);

    assert_eq!(f, f.without_implicit_rows());
}

#[test]
fn well_typed_functions() {
    let mut fresh = Fresh::new();
    let dup = func(&mut fresh, vec![tv("a")], vec![tv("a"), tv("a")]);
    let conjure = func(&mut fresh, vec![], vec![tv("a")]);

    assert!(dup.is_well_typed());
    assert!(!conjure.is_well_typed());

    let tag = fresh.self_tag();
    let recursive = func(&mut fresh, vec![Kind::SelfType(tag)], vec![tv("a")]);
    assert!(recursive.is_well_typed());
}

#[test]
fn apply_type_shape() {
    let mut fresh = Fresh::new();
    let apply = FnType::apply_type(&mut fresh);

    assert_eq!(2, apply.cons.len());
    assert_eq!(1, apply.prod.len());
    let Some(Kind::Function(applied)) = apply.cons.top() else {
        panic!("expected a function on top of the consumption");
    };
    assert_eq!(apply.cons.bottom(), applied.cons.bottom());
    assert_eq!(apply.prod.bottom(), applied.prod.bottom());
    assert_ne!(apply.cons.bottom(), apply.prod.bottom());
}

#[test]
fn vars_in_order() {
    let mut fresh = Fresh::new();
    let inner = func(&mut fresh, vec![tv("c")], vec![tv("a")]);
    let f = func(&mut fresh, vec![sv("R"), tv("a")], vec![sv("R"), inner.into(), tv("b")]);

    assert_eq!(vec!["R", "a", "c", "b"], f.vars());
}

#[test]
fn raw_display() {
    let mut fresh = Fresh::new();
    let f = fresh.function(
        Vector::from_kinds([sv("R"), int()]),
        Vector::new(),
        true,
    );

    assert_eq!("('R int ~> )", f.to_string());
    assert!(f.to_id_string().starts_with("('R int ~> )_"));
}

#[test]
fn guard_stops_at_active_keys() {
    let mut guard = Guard::new();

    let inner = guard.enter("a", |guard| {
        assert!(guard.is_active(&"a"));
        guard.enter("a", |_| ())
    });

    assert_eq!(Some(None), inner);
    assert!(guard.is_empty());
}
