//! Reduces every constraint bucket to the single kind that best represents
//! it.


use std::collections::HashMap;

use log::trace;
use purr_common::kinds::{Guard, Kind, Vector};

use crate::constrain::Constraints;
use crate::{InferError, KindError};

/// The representative kind of every constrained variable.
pub type Unifiers = HashMap<String, Kind>;

pub fn unify(constraints: &Constraints) -> Result<Unifiers, InferError> {
    let mut representatives = HashMap::new();

    for (id, bucket) in constraints.buckets() {
        let mut kinds = bucket.iter().cloned();
        let Some(first) = kinds.next() else {
            return Err(InferError::internal(format!("constraint bucket {id} is empty")));
        };

        let best = kinds.try_fold(first, better)?;
        trace!("bucket {id} unifies to {}", best.to_id_string());
        representatives.insert(id, best);
    }

    for (left, right) in constraints.equalities() {
        check_equal(left, right)?;
    }

    let mut unifiers = Unifiers::new();
    for name in constraints.names() {
        let representative = constraints
            .bucket_id(name)
            .and_then(|id| representatives.get(&id))
            .ok_or_else(|| InferError::internal(format!("`{name}` has no bucket")))?;

        unifiers.insert(name.into(), representative.clone());
    }

    check_cycles(&unifiers)?;
    Ok(unifiers)
}

/// A variable may only contain itself through a function type, which later
/// becomes a self type. Any other cycle, such as `R := [R int]`, would need
/// an infinite stack.
fn check_cycles(unifiers: &Unifiers) -> Result<(), KindError> {
    let mut names: Vec<_> = unifiers.keys().collect();
    names.sort_unstable();

    for name in names {
        let unifier = &unifiers[name];
        if unifier.var_name() == Some(name.as_str()) {
            continue;
        }

        let mut guard = Guard::new();
        let cyclic = guard
            .enter(name.clone(), |guard| {
                contains_outside_functions(name, unifier, unifiers, guard)
            })
            .unwrap_or(false);

        if cyclic {
            trace!("`{name}` contains itself through {}", unifier.to_id_string());

            let right = match unifier {
                Kind::Vector(vec) => vec.clone(),
                other => Vector::from_kinds([other.clone()]),
            };

            return Err(KindError::Arity {
                left: Vector::from_kinds([Kind::StackVar(name.clone())]),
                right,
            });
        }
    }

    Ok(())
}

fn contains_outside_functions(
    name: &str,
    kind: &Kind,
    unifiers: &Unifiers,
    guard: &mut Guard<String>,
) -> bool {
    match kind {
        Kind::TypeVar(var) | Kind::StackVar(var) => {
            var == name
                || guard
                    .enter(var.clone(), |guard| {
                        unifiers.get(var).is_some_and(|unifier| {
                            contains_outside_functions(name, unifier, unifiers, guard)
                        })
                    })
                    .unwrap_or(false)
        }

        Kind::Vector(vec) => vec
            .iter()
            .any(|kind| contains_outside_functions(name, kind, unifiers, guard)),

        Kind::Function(_) | Kind::Simple(_) | Kind::SelfType(_) => false,
    }
}

/// Pick the more specific of two kinds which have been constrained equal.
pub fn better(left: Kind, right: Kind) -> Result<Kind, KindError> {
    match (left, right) {
        (Kind::SelfType(a), Kind::SelfType(b)) if a == b => Ok(Kind::SelfType(a)),
        (Kind::SelfType(tag), other) | (other, Kind::SelfType(tag))
            if other.is_var() || matches!(other, Kind::Function(_)) =>
        {
            Ok(Kind::SelfType(tag))
        }
        (left @ Kind::SelfType(_), right) | (left, right @ Kind::SelfType(_)) => {
            Err(KindError::SelfMismatch { left, right })
        }

        (Kind::Function(f), Kind::Function(g)) => {
            if g.cons.len() > f.cons.len() {
                Ok(Kind::Function(g))
            } else {
                Ok(Kind::Function(f))
            }
        }
        (Kind::Function(f), other) | (other, Kind::Function(f)) => {
            if other.is_var() {
                Ok(Kind::Function(f))
            } else if other.is_any() || other.is_dynamic_fn() {
                if f.is_runtime_polymorphic() {
                    Ok(Kind::Function(f))
                } else {
                    Err(KindError::NotRuntimePolymorphic {
                        function: f,
                        target: other,
                    })
                }
            } else {
                Err(KindError::Incompatible {
                    left: Kind::Function(f),
                    right: other,
                })
            }
        }

        (Kind::Vector(v), Kind::Vector(w)) => {
            let longer = w.len() > v.len() || (w.len() == v.len() && w.size() > v.size());
            if longer {
                Ok(Kind::Vector(w))
            } else {
                Ok(Kind::Vector(v))
            }
        }
        (Kind::Vector(v), other) | (other, Kind::Vector(v)) => {
            if other.is_var() || other.is_any() {
                Ok(Kind::Vector(v))
            } else {
                Err(KindError::Incompatible {
                    left: Kind::Vector(v),
                    right: other,
                })
            }
        }

        (left, right) if left.is_var() && right.is_var() => {
            let (a, b) = (left.var_name(), right.var_name());
            if b < a {
                Ok(right)
            } else {
                Ok(left)
            }
        }
        (var, other) | (other, var) if var.is_var() => Ok(other),

        (left, right) => {
            if left.is_subtype_of(&right) {
                Ok(left)
            } else if right.is_subtype_of(&left) {
                Ok(right)
            } else {
                Err(KindError::Incompatible { left, right })
            }
        }
    }
}

/// Check a deferred equality between two kinds that were not variables.
fn check_equal(left: &Kind, right: &Kind) -> Result<(), KindError> {
    match (left, right) {
        (Kind::Vector(v), Kind::Vector(w)) => {
            if v.is_subtype_of(w) || w.is_subtype_of(v) {
                Ok(())
            } else if v.len() != w.len() {
                Err(KindError::Arity {
                    left: v.clone(),
                    right: w.clone(),
                })
            } else {
                v.iter()
                    .zip(w.iter())
                    .try_for_each(|(a, b)| check_equal(a, b))
            }
        }

        (left, right) => better(left.clone(), right.clone()).map(|_| ()),
    }
}

/// The unifiers in a stable order, for traces.
pub fn show(unifiers: &Unifiers) -> String {
    let mut entries: Vec<_> = unifiers.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    entries
        .into_iter()
        .map(|(name, kind)| format!("{name} := {}", kind.to_id_string()))
        .collect::<Vec<_>>()
        .join("\n")
}
