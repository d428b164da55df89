use purr_common::kinds::{Fresh, Kind, Vector};

use super::parse_fn_type;

fn codes(src: &str) -> Vec<String> {
    let mut fresh = Fresh::new();
    match parse_fn_type(src, 0, &mut fresh) {
        Ok(ty) => panic!("expected errors, got {ty}"),
        Err(msgs) => msgs.msgs.into_iter().filter_map(|msg| msg.code).collect(),
    }
}

#[test]
fn lower_simple_function() {
    let mut fresh = Fresh::new();
    let ty = parse_fn_type("('A int -> 'A bool)", 0, &mut fresh).unwrap();

    assert_eq!(
        Vector::from_kinds([Kind::StackVar("A".into()), Kind::simple("int")]),
        ty.cons
    );
    assert_eq!(
        Vector::from_kinds([Kind::StackVar("A".into()), Kind::simple("bool")]),
        ty.prod
    );
    assert!(!ty.effects);
}

#[test]
fn lower_effects_and_nesting() {
    let mut fresh = Fresh::new();
    let ty = parse_fn_type("('a f=('a -> 'b) ~> 'b)", 0, &mut fresh).unwrap();

    assert!(ty.effects);
    assert!(matches!(ty.cons.top(), Some(Kind::Function(_))));
    assert_eq!(Some(&Kind::TypeVar("b".into())), ty.prod.top());
}

#[test]
fn self_types_share_a_tag_per_function() {
    let mut fresh = Fresh::new();
    let ty = parse_fn_type("(self (self -> ) -> self)", 0, &mut fresh).unwrap();

    let [Kind::SelfType(outer), Kind::Function(inner)] = ty.cons.kinds() else {
        panic!("unexpected consumption {}", ty.cons);
    };

    assert_eq!(Some(&Kind::SelfType(*outer)), ty.prod.top());
    assert_ne!(Some(&Kind::SelfType(*outer)), inner.cons.top());
    assert!(matches!(inner.cons.top(), Some(Kind::SelfType(_))));
}

#[test]
fn stack_variables_must_be_at_the_bottom() {
    assert_eq!(vec!["EP04"], codes("(int 'A -> 'A)"));
}

#[test]
fn only_types_can_be_labelled() {
    assert_eq!(vec!["EP06"], codes("(x='a -> )"));
}

#[test]
fn arrows_are_required() {
    assert_eq!(vec!["EP05"], codes("(int int)"));
}

#[test]
fn unclosed_function_types() {
    assert_eq!(vec!["EP03"], codes("(int -> int"));
}
