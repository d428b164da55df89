use std::collections::HashSet;

use purr_common::kinds::{FnType, Fresh, Guard, Kind, Vector};

use crate::rename::Renamer;
use crate::scope::Scopes;
use crate::unify::Unifiers;
use crate::InferError;

/// Substitutes unifiers through a type. A variable that resolves to a
/// function copies that function into its position, and the copy gets fresh
/// names for the variables that belong to the function alone, so that two
/// copies never share them.
pub struct Resolver<'a> {
    unifiers: &'a Unifiers,
    scopes: &'a Scopes,
    fresh: &'a mut Fresh,
}

impl<'a> Resolver<'a> {
    pub fn new(unifiers: &'a Unifiers, scopes: &'a Scopes, fresh: &'a mut Fresh) -> Self {
        Self {
            unifiers,
            scopes,
            fresh,
        }
    }

    pub fn resolve_fn(&mut self, f: &FnType) -> Result<FnType, InferError> {
        self.function(f, &mut Guard::new())
    }

    fn function(&mut self, f: &FnType, guard: &mut Guard<String>) -> Result<FnType, InferError> {
        let cons = self.vector(&f.cons, guard)?;
        let prod = self.vector(&f.prod, guard)?;
        Ok(FnType::new(f.id(), cons, prod, f.effects))
    }

    fn vector(&mut self, vec: &Vector, guard: &mut Guard<String>) -> Result<Vector, InferError> {
        let mut res = Vector::new();
        for kind in vec.iter() {
            res.push(self.kind(kind, guard)?);
        }

        if !res.is_well_formed() {
            return Err(InferError::internal(format!(
                "resolving `{vec}` gave the malformed vector `{res}`"
            )));
        }

        Ok(res)
    }

    fn kind(&mut self, kind: &Kind, guard: &mut Guard<String>) -> Result<Kind, InferError> {
        match kind {
            Kind::TypeVar(name) | Kind::StackVar(name) => {
                let unifiers = self.unifiers;
                let Some(unifier) = unifiers.get(name).filter(|unifier| *unifier != kind) else {
                    return Ok(kind.clone());
                };

                let Some(resolved) = guard.enter(name.clone(), |guard| self.kind(unifier, guard))
                else {
                    return Ok(kind.clone());
                };

                match (kind, resolved?) {
                    (Kind::TypeVar(_), Kind::Vector(vec)) => match vec.kinds() {
                        [single] => Ok(single.clone()),
                        _ => Err(InferError::internal(format!(
                            "type variable `{name}` resolved to the vector `{vec}`"
                        ))),
                    },

                    (_, Kind::Function(f)) => Ok(Kind::Function(self.duplicate(f))),
                    (_, resolved) => Ok(resolved),
                }
            }

            Kind::Vector(vec) => Ok(Kind::Vector(self.vector(vec, guard)?)),
            Kind::Function(f) => Ok(Kind::Function(self.function(f, guard)?)),
            Kind::Simple(_) | Kind::SelfType(_) => Ok(kind.clone()),
        }
    }

    fn duplicate(&mut self, f: FnType) -> FnType {
        let owned: HashSet<String> = f
            .vars()
            .into_iter()
            .filter(|var| self.scopes.is_bound_within(f.id(), var))
            .collect();

        if owned.is_empty() {
            return f;
        }

        Renamer::only(&mut *self.fresh, owned).rename_fn(&f)
    }
}
