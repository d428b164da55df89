//! Alpha renaming. A [`Renamer`] gives every variable of a term a fresh name,
//! consistently within one pass; [`substitute`] replaces variables from a
//! given map; [`canonical`] picks short names by position so that two types
//! equal up to renaming become structurally equal, and [`comparable`] does
//! the same for self tags.


use std::collections::{HashMap, HashSet};

use purr_common::kinds::{FnType, Fresh, Kind, SelfTag, Vector};
use purr_common::pretty::alpha_name;

use crate::InferError;

pub struct Renamer<'a> {
    fresh: &'a mut Fresh,
    only: Option<HashSet<String>>,
    names: HashMap<String, String>,
}

impl<'a> Renamer<'a> {
    pub fn new(fresh: &'a mut Fresh) -> Self {
        Self {
            fresh,
            only: None,
            names: HashMap::new(),
        }
    }

    /// A renamer that leaves every variable not in `names` alone.
    pub fn only(fresh: &'a mut Fresh, names: HashSet<String>) -> Self {
        Self {
            fresh,
            only: Some(names),
            names: HashMap::new(),
        }
    }

    /// Forget the names chosen so far, so that the next term shares no
    /// variables with the previous one.
    pub fn reset(&mut self) {
        self.names.clear();
    }

    /// Rename a function type. Every function node in the result gets a new
    /// id.
    pub fn rename_fn(&mut self, f: &FnType) -> FnType {
        let cons = self.rename_vector(&f.cons);
        let prod = self.rename_vector(&f.prod);
        self.fresh.function(cons, prod, f.effects)
    }

    pub fn rename_vector(&mut self, vec: &Vector) -> Vector {
        vec.iter().map(|kind| self.rename_kind(kind)).collect()
    }

    pub fn rename_kind(&mut self, kind: &Kind) -> Kind {
        match kind {
            Kind::TypeVar(name) => Kind::TypeVar(self.name(name, false)),
            Kind::StackVar(name) => Kind::StackVar(self.name(name, true)),
            Kind::Vector(vec) => Kind::Vector(self.rename_vector(vec)),
            Kind::Function(f) => Kind::Function(self.rename_fn(f)),
            Kind::Simple(_) | Kind::SelfType(_) => kind.clone(),
        }
    }

    fn name(&mut self, name: &str, stack: bool) -> String {
        if let Some(only) = &self.only {
            if !only.contains(name) {
                return name.into();
            }
        }

        if let Some(renamed) = self.names.get(name) {
            return renamed.clone();
        }

        let renamed = if stack {
            self.fresh.stack_var()
        } else {
            self.fresh.type_var()
        };

        self.names.insert(name.into(), renamed.clone());
        renamed
    }
}

/// Replace every variable named in `map` by its kind. A stack variable may be
/// replaced by a vector, which is spliced into the surrounding vector; a type
/// variable may only stand for a single slot. Function ids are kept.
pub fn substitute(kind: &Kind, map: &HashMap<String, Kind>) -> Result<Kind, InferError> {
    match kind {
        Kind::TypeVar(name) => match map.get(name) {
            Some(Kind::Vector(vec)) => match vec.kinds() {
                [single] => Ok(single.clone()),
                _ => Err(InferError::internal(format!(
                    "type variable `{name}` cannot stand for the vector `{vec}`"
                ))),
            },
            Some(other) => Ok(other.clone()),
            None => Ok(kind.clone()),
        },

        Kind::StackVar(name) => Ok(map.get(name).cloned().unwrap_or_else(|| kind.clone())),
        Kind::Vector(vec) => Ok(Kind::Vector(substitute_vector(vec, map)?)),
        Kind::Function(f) => Ok(Kind::Function(substitute_fn(f, map)?)),
        Kind::Simple(_) | Kind::SelfType(_) => Ok(kind.clone()),
    }
}

pub fn substitute_vector(vec: &Vector, map: &HashMap<String, Kind>) -> Result<Vector, InferError> {
    let mut res = Vector::new();
    for kind in vec.iter() {
        res.push(substitute(kind, map)?);
    }

    if !res.is_well_formed() {
        return Err(InferError::internal(format!(
            "substitution produced the malformed vector `{res}`"
        )));
    }

    Ok(res)
}

pub fn substitute_fn(f: &FnType, map: &HashMap<String, Kind>) -> Result<FnType, InferError> {
    let cons = substitute_vector(&f.cons, map)?;
    let prod = substitute_vector(&f.prod, map)?;
    Ok(FnType::new(f.id(), cons, prod, f.effects))
}

/// Name the variables of `f` by order of first occurrence: `a`, `b`, ... for
/// type variables and `A`, `B`, ... for stack variables, counting both kinds
/// together.
pub fn canonical(f: &FnType) -> FnType {
    let mut map = HashMap::new();
    let mut stacks = HashSet::new();
    collect_stack_vars(&Kind::Function(f.clone()), &mut stacks);

    for (n, var) in f.vars().into_iter().enumerate() {
        let kind = if stacks.contains(&var) {
            Kind::StackVar(alpha_name(n).to_uppercase())
        } else {
            Kind::TypeVar(alpha_name(n))
        };

        map.insert(var, kind);
    }

    // variables map to variables, so the substitution cannot fail
    substitute_fn(f, &map).unwrap_or_else(|_| f.clone())
}

/// [`canonical`], with self tags also numbered by first occurrence. Two
/// self types written or inferred separately get different tags, so only
/// the comparable forms of two types can be compared. The tags of the result
/// name no self table entry.
pub fn comparable(f: &FnType) -> FnType {
    let mut tags = HashMap::new();
    renumber_fn(&canonical(f), &mut tags)
}

fn renumber_fn(f: &FnType, tags: &mut HashMap<SelfTag, SelfTag>) -> FnType {
    let cons = f.cons.iter().map(|kind| renumber(kind, tags)).collect();
    let prod = f.prod.iter().map(|kind| renumber(kind, tags)).collect();
    FnType::new(f.id(), cons, prod, f.effects)
}

fn renumber(kind: &Kind, tags: &mut HashMap<SelfTag, SelfTag>) -> Kind {
    match kind {
        Kind::SelfType(tag) => {
            let next = SelfTag::numbered(tags.len());
            Kind::SelfType(*tags.entry(*tag).or_insert(next))
        }
        Kind::Vector(vec) => Kind::Vector(vec.iter().map(|kind| renumber(kind, tags)).collect()),
        Kind::Function(f) => Kind::Function(renumber_fn(f, tags)),
        Kind::TypeVar(_) | Kind::StackVar(_) | Kind::Simple(_) => kind.clone(),
    }
}

fn collect_stack_vars(kind: &Kind, into: &mut HashSet<String>) {
    match kind {
        Kind::StackVar(name) => {
            into.insert(name.clone());
        }
        Kind::Vector(vec) => vec.iter().for_each(|kind| collect_stack_vars(kind, into)),
        Kind::Function(f) => f.children().for_each(|kind| collect_stack_vars(kind, into)),
        Kind::TypeVar(_) | Kind::Simple(_) | Kind::SelfType(_) => {}
    }
}
