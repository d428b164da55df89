use purr_common::kinds::{FnType, Fresh, Kind, Vector};

use super::{alpha_equivalent, matches_declared, FoldError, Inferer, Typed};
use crate::{InferError, KindError};

fn tv(name: &str) -> Kind {
    Kind::TypeVar(name.into())
}

fn sv(name: &str) -> Kind {
    Kind::StackVar(name.into())
}

fn int() -> Kind {
    Kind::simple("int")
}

fn string() -> Kind {
    Kind::simple("string")
}

fn bool() -> Kind {
    Kind::simple("bool")
}

fn func(fresh: &mut Fresh, cons: Vec<Kind>, prod: Vec<Kind>) -> FnType {
    fresh.function(Vector::from_kinds(cons), Vector::from_kinds(prod), false)
}

fn dup(fresh: &mut Fresh) -> FnType {
    func(fresh, vec![sv("A"), tv("a")], vec![sv("A"), tv("a"), tv("a")])
}

fn swap(fresh: &mut Fresh) -> FnType {
    func(
        fresh,
        vec![sv("A"), tv("a"), tv("b")],
        vec![sv("A"), tv("b"), tv("a")],
    )
}

fn pop(fresh: &mut Fresh) -> FnType {
    func(fresh, vec![sv("A"), tv("a")], vec![sv("A")])
}

fn quote(fresh: &mut Fresh, f: FnType) -> FnType {
    func(fresh, vec![], vec![f.into()])
}

struct Word {
    name: &'static str,
    ty: Option<FnType>,
}

impl Typed for Word {
    fn name(&self) -> &str {
        self.name
    }

    fn fn_type(&self) -> Option<&FnType> {
        self.ty.as_ref()
    }
}

fn word(name: &'static str, ty: FnType) -> Word {
    Word { name, ty: Some(ty) }
}

#[test]
fn row_variables_absorb_the_rest() {
    let mut inferer = Inferer::new();
    let f = func(inferer.fresh(), vec![int()], vec![int()]);
    let g = func(inferer.fresh(), vec![sv("R")], vec![sv("R"), int()]);

    let res = inferer.infer(&f, &g).unwrap();
    let expected = func(inferer.fresh(), vec![int()], vec![int(), int()]);
    assert_eq!(expected, res);
}

#[test]
fn matching_ends_compose() {
    let mut inferer = Inferer::new();
    let f = func(inferer.fresh(), vec![int()], vec![bool()]);
    let g = func(inferer.fresh(), vec![bool()], vec![string()]);

    let res = inferer.infer(&f, &g).unwrap();
    let expected = func(inferer.fresh(), vec![int()], vec![string()]);
    assert!(alpha_equivalent(&expected, &res));
}

#[test]
fn incompatible_ends_fail() {
    let mut inferer = Inferer::new();
    let f = func(inferer.fresh(), vec![int()], vec![int()]);
    let g = func(inferer.fresh(), vec![string()], vec![string()]);

    assert_eq!(
        Err(InferError::Kind(KindError::Incompatible {
            left: int(),
            right: string(),
        })),
        inferer.infer(&f, &g)
    );
}

#[test]
fn composition_is_associative() {
    let mut inferer = Inferer::new();
    let even = func(inferer.fresh(), vec![int()], vec![bool()]);
    let dup = dup(inferer.fresh());
    let swap = swap(inferer.fresh());

    let left = inferer.infer(&even, &dup).unwrap();
    let left = inferer.infer(&left, &swap).unwrap();

    let right = inferer.infer(&dup, &swap).unwrap();
    let right = inferer.infer(&even, &right).unwrap();

    let expected = func(inferer.fresh(), vec![int()], vec![bool(), bool()]);
    assert!(alpha_equivalent(&left, &right));
    assert!(alpha_equivalent(&expected, &left));
}

#[test]
fn composition_does_not_share_names_between_operands() {
    let mut inferer = Inferer::new();
    let dup = dup(inferer.fresh());
    let pop = pop(inferer.fresh());

    let res = inferer.infer(&dup, &pop).unwrap();
    let expected = func(inferer.fresh(), vec![tv("a")], vec![tv("a")]);
    assert!(alpha_equivalent(&expected, &res));
}

#[test]
fn quotations_are_applied() {
    let mut inferer = Inferer::new();
    let dup = dup(inferer.fresh());
    let quoted = quote(inferer.fresh(), dup.clone());
    let apply = FnType::apply_type(inferer.fresh());

    let res = inferer.infer(&quoted, &apply).unwrap();
    assert!(alpha_equivalent(&dup.without_implicit_rows(), &res));
}

#[test]
fn duplicated_quotations_get_their_own_variables() {
    let mut inferer = Inferer::new();
    let id = func(inferer.fresh(), vec![sv("A"), tv("a")], vec![sv("A"), tv("a")]);
    let quoted = quote(inferer.fresh(), id);
    let dup = dup(inferer.fresh());

    let res = inferer.infer(&quoted, &dup).unwrap();

    let [Kind::Function(first), Kind::Function(second)] = res.prod.kinds() else {
        panic!("expected two functions, got {res}");
    };

    assert!(alpha_equivalent(first, second));
    assert!(!first.vars().is_empty());
    assert!(first.vars().iter().all(|var| !second.vars().contains(var)));
}

#[test]
fn self_application_produces_a_self_type() {
    let mut inferer = Inferer::new();
    let dup = dup(inferer.fresh());
    let apply = FnType::apply_type(inferer.fresh());

    let res = inferer.infer(&dup, &apply).unwrap();

    let [Kind::StackVar(_), Kind::SelfType(tag)] = res.cons.kinds() else {
        panic!("expected a self type on top, got {res}");
    };
    assert!(matches!(res.prod.kinds(), [Kind::StackVar(_)]));

    let expanded = inferer.expand_self(*tag).unwrap();
    assert!(alpha_equivalent(&res, expanded));
}

#[test]
fn self_types_compose_again() {
    let mut inferer = Inferer::new();
    let dup_ty = dup(inferer.fresh());
    let apply = FnType::apply_type(inferer.fresh());
    let recursive = inferer.infer(&dup_ty, &apply).unwrap();

    let quoted = quote(inferer.fresh(), recursive.clone());
    let res = inferer.infer(&quoted, &dup_ty).unwrap();

    assert_eq!(2, res.prod.len());
    assert!(res
        .prod
        .iter()
        .all(|kind| matches!(kind, Kind::Function(f) if alpha_equivalent(f, &recursive))));
}

#[test]
fn opaque_values_must_be_runtime_polymorphic() {
    let mut inferer = Inferer::new();
    let binary = func(inferer.fresh(), vec![int(), int()], vec![int()]);
    let quoted = quote(inferer.fresh(), binary);
    let store = func(inferer.fresh(), vec![Kind::simple("any")], vec![]);

    assert!(matches!(
        inferer.infer(&quoted, &store),
        Err(InferError::Kind(KindError::NotRuntimePolymorphic { .. }))
    ));

    let unary = func(inferer.fresh(), vec![int()], vec![int()]);
    let quoted = quote(inferer.fresh(), unary);
    assert!(inferer.infer(&quoted, &store).is_ok());
}

#[test]
fn side_effects_are_kept() {
    let mut inferer = Inferer::new();
    let print = inferer
        .fresh()
        .function(Vector::from_kinds([string()]), Vector::new(), true);
    let lit = func(inferer.fresh(), vec![], vec![string()]);

    let res = inferer.infer(&lit, &print).unwrap();
    assert!(res.effects);
    assert!(res.cons.is_empty() && res.prod.is_empty());
}

#[test]
fn empty_sequences_do_nothing() {
    let mut inferer = Inferer::new();
    let res = inferer.infer_all::<Word>(&[]).unwrap().unwrap();
    assert!(res.cons.is_empty() && res.prod.is_empty());
    assert!(!res.effects);
}

#[test]
fn single_terms_keep_their_type() {
    let mut inferer = Inferer::new();
    let ty = swap(inferer.fresh());
    let res = inferer.infer_all(&[word("swap", ty.clone())]).unwrap();
    assert_eq!(Some(ty), res);
}

#[test]
fn untyped_terms_make_sequences_untyped() {
    let mut inferer = Inferer::new();
    let terms = [
        word("dup", dup(inferer.fresh())),
        Word {
            name: "mystery",
            ty: None,
        },
        word("pop", pop(inferer.fresh())),
    ];

    assert_eq!(Ok(None), inferer.infer_all(&terms));
}

#[test]
fn fold_errors_point_at_the_failing_term() {
    let mut inferer = Inferer::new();
    let terms = [
        word("one", func(inferer.fresh(), vec![], vec![int()])),
        word("dup", dup(inferer.fresh())),
        word("not", func(inferer.fresh(), vec![bool()], vec![bool()])),
    ];

    let Err(FoldError { index, error }) = inferer.infer_all(&terms) else {
        panic!("expected a type error");
    };

    assert_eq!(2, index);
    assert!(matches!(error, InferError::Kind(KindError::Incompatible { .. })));
}

#[test]
fn declared_types_are_row_polymorphic() {
    let mut fresh = Fresh::new();
    let inferred = func(&mut fresh, vec![int()], vec![int()]);
    let rowed = func(&mut fresh, vec![sv("A"), int()], vec![sv("A"), int()]);
    let wider = func(&mut fresh, vec![int()], vec![Kind::simple("any")]);
    let wrong = func(&mut fresh, vec![int()], vec![string()]);

    assert!(matches_declared(&mut fresh, &inferred, &rowed));
    assert!(matches_declared(&mut fresh, &inferred, &wider));
    assert!(!matches_declared(&mut fresh, &inferred, &wrong));
}

#[test]
fn unbalanced_branches_are_rejected() {
    let mut inferer = Inferer::new();
    let one = func(inferer.fresh(), vec![], vec![int()]);
    let two = func(inferer.fresh(), vec![], vec![int(), int()]);
    let branches = func(inferer.fresh(), vec![], vec![one.into(), two.into()]);

    let branch = func(inferer.fresh(), vec![sv("A")], vec![sv("B")]);
    let choose = func(
        inferer.fresh(),
        vec![sv("A"), branch.clone().into(), branch.into()],
        vec![sv("B")],
    );

    assert!(matches!(
        inferer.infer(&branches, &choose),
        Err(InferError::Kind(KindError::Arity { .. }))
    ));
}

#[test]
fn self_types_match_declared_self_types() {
    let mut inferer = Inferer::new();
    let dup = dup(inferer.fresh());
    let apply = FnType::apply_type(inferer.fresh());
    let recursive = inferer.infer(&dup, &apply).unwrap();

    let tag = inferer.fresh().self_tag();
    let declared = func(
        inferer.fresh(),
        vec![sv("X"), Kind::SelfType(tag)],
        vec![sv("Y")],
    );

    assert!(alpha_equivalent(&recursive, &declared));
    assert!(matches_declared(inferer.fresh(), &recursive, &declared));
}

#[test]
fn declared_types_may_accept_less() {
    let mut fresh = Fresh::new();
    let inferred = func(&mut fresh, vec![Kind::simple("any")], vec![bool()]);
    let narrower = func(&mut fresh, vec![int()], vec![bool()]);

    assert!(matches_declared(&mut fresh, &inferred, &narrower));
    assert!(!matches_declared(&mut fresh, &narrower, &inferred));
}

#[test]
fn self_types_are_expanded_outside_their_function() {
    let mut inferer = Inferer::new();
    let dup_ty = dup(inferer.fresh());
    let apply = FnType::apply_type(inferer.fresh());
    let recursive = inferer.infer(&dup_ty, &apply).unwrap();

    let pop = pop(inferer.fresh());
    let first = quote(inferer.fresh(), pop);
    let second = quote(inferer.fresh(), recursive.clone());
    let lower = func(inferer.fresh(), vec![sv("B")], vec![sv("C")]);
    let upper = func(inferer.fresh(), vec![sv("C")], vec![sv("D")]);
    let both = func(inferer.fresh(), vec![sv("B")], vec![sv("D")]);
    let compose = func(
        inferer.fresh(),
        vec![sv("A"), lower.into(), upper.into()],
        vec![sv("A"), both.into()],
    );

    let terms = [
        word("[pop]", first),
        word("[dup apply]", second),
        word("compose", compose),
    ];
    let res = inferer.infer_all(&terms).unwrap().unwrap();

    let [Kind::Function(composed)] = res.prod.kinds() else {
        panic!("expected a single function, got {res}");
    };

    assert!(!composed
        .children()
        .any(|kind| matches!(kind, Kind::SelfType(_))));
    assert!(composed
        .children()
        .any(|kind| matches!(kind, Kind::Function(f) if alpha_equivalent(f, &recursive))));
}
