//! Kinds are the terms of the type language: single-slot types, stack
//! vectors and stack effects. Every kind is an immutable tree; the only way a
//! kind can refer back to an enclosing function is through a
//! [`Kind::SelfType`] tag, which is resolved against a side table rather than
//! by making the tree cyclic.

mod fresh;
mod visit;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::fmt;

pub use fresh::Fresh;
pub use visit::Guard;

/// The simple type every single-slot kind is a subtype of.
pub const ANY: &str = "any";

/// The opaque type of a function value whose effect is only known at runtime.
pub const DYNAMIC_FN: &str = "function";

/// Identifies a function type node for diagnostics and scoping.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FnId(usize);

impl FnId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Identifies the function a [`Kind::SelfType`] abbreviates.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SelfTag(usize);

impl SelfTag {
    /// The `n`th tag of a type whose self types were renumbered so it can be
    /// compared with another. Such a tag names no self table entry.
    pub fn numbered(n: usize) -> Self {
        Self(n)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Stands for the type of one stack slot.
    TypeVar(String),

    /// Stands for any number of stack slots. Only legal at the bottom of a
    /// [`Vector`].
    StackVar(String),

    /// A nominal type such as `int`.
    Simple(String),

    Vector(Vector),
    Function(FnType),

    /// The function type enclosing this occurrence.
    SelfType(SelfTag),
}

impl Kind {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Self::TypeVar(_) | Self::StackVar(_))
    }

    /// The name of this kind if it is a type or stack variable.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Self::TypeVar(name) | Self::StackVar(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Simple(name) if name == ANY)
    }

    pub fn is_dynamic_fn(&self) -> bool {
        matches!(self, Self::Simple(name) if name == DYNAMIC_FN)
    }

    /// Subtyping is reflexive, `any` is a supertype of every single-slot kind
    /// and functions are covered by [`FnType::is_subtype_of`].
    pub fn is_subtype_of(&self, other: &Kind) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (Self::Function(f), _) => f.is_subtype_of(other),
            (Self::Vector(v), Self::Vector(w)) => v.is_subtype_of(w),
            (Self::Vector(_), _) | (Self::SelfType(_), _) => false,
            (_, other) => other.is_any(),
        }
    }

    /// The number of kinds in this tree, including itself.
    pub fn size(&self) -> usize {
        match self {
            Self::Vector(vec) => 1 + vec.size(),
            Self::Function(f) => 1 + f.cons.size() + f.prod.size(),
            _ => 1,
        }
    }

    /// Does the variable `name` occur anywhere in this tree?
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Self::TypeVar(var) | Self::StackVar(var) => var == name,
            Self::Vector(vec) => vec.iter().any(|kind| kind.mentions(name)),
            Self::Function(f) => f.children().any(|kind| kind.mentions(name)),
            Self::Simple(_) | Self::SelfType(_) => false,
        }
    }

    fn count_vars(&self, counts: &mut HashMap<String, usize>) {
        match self {
            Self::TypeVar(var) | Self::StackVar(var) => {
                *counts.entry(var.clone()).or_default() += 1;
            }
            Self::Vector(vec) => vec.iter().for_each(|kind| kind.count_vars(counts)),
            Self::Function(f) => f.children().for_each(|kind| kind.count_vars(counts)),
            Self::Simple(_) | Self::SelfType(_) => {}
        }
    }

    fn collect_vars(&self, seen: &mut HashSet<String>, vars: &mut Vec<String>) {
        match self {
            Self::TypeVar(name) | Self::StackVar(name) => {
                if seen.insert(name.clone()) {
                    vars.push(name.clone());
                }
            }
            Self::Vector(vec) => {
                for kind in vec.iter() {
                    kind.collect_vars(seen, vars);
                }
            }
            Self::Function(f) => {
                for kind in f.children() {
                    kind.collect_vars(seen, vars);
                }
            }
            Self::Simple(_) | Self::SelfType(_) => {}
        }
    }

    /// Every variable in this tree, in order of first occurrence.
    pub fn vars(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_vars(&mut HashSet::new(), &mut vars);
        vars
    }

    /// Like [`Display`](fmt::Display), but functions carry their id.
    pub fn to_id_string(&self) -> String {
        match self {
            Self::Function(f) => f.to_id_string(),
            Self::Vector(vec) => vec.to_id_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeVar(name) | Self::StackVar(name) => write!(f, "'{name}"),
            Self::Simple(name) => write!(f, "{name}"),
            Self::Vector(vec) => write!(f, "{vec}"),
            Self::Function(fun) => write!(f, "{fun}"),
            Self::SelfType(tag) => write!(f, "self#{}", tag.0),
        }
    }
}

impl From<FnType> for Kind {
    fn from(f: FnType) -> Self {
        Self::Function(f)
    }
}

impl From<Vector> for Kind {
    fn from(vec: Vector) -> Self {
        Self::Vector(vec)
    }
}

/// A segment of the stack, stored bottom to top. Vectors never nest: pushing a
/// vector onto a vector splices its elements in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vector {
    kinds: Vec<Kind>,
}

impl Vector {
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Build a vector from kinds listed bottom to top.
    pub fn from_kinds(kinds: impl IntoIterator<Item = Kind>) -> Self {
        let mut vec = Self::new();
        for kind in kinds {
            vec.push(kind);
        }
        vec
    }

    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Kind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn top(&self) -> Option<&Kind> {
        self.kinds.last()
    }

    pub fn bottom(&self) -> Option<&Kind> {
        self.kinds.first()
    }

    /// Everything but the top.
    pub fn rest(&self) -> Vector {
        let end = self.kinds.len().saturating_sub(1);
        Self {
            kinds: self.kinds[..end].to_vec(),
        }
    }

    pub fn push(&mut self, kind: Kind) {
        match kind {
            Kind::Vector(vec) => self.kinds.extend(vec.kinds),
            kind => self.kinds.push(kind),
        }
    }

    pub fn push_bottom(&mut self, kind: Kind) {
        match kind {
            Kind::Vector(vec) => {
                let mut kinds = vec.kinds;
                kinds.append(&mut self.kinds);
                self.kinds = kinds;
            }
            kind => self.kinds.insert(0, kind),
        }
    }

    fn without_bottom(&self) -> Vector {
        Self {
            kinds: self.kinds.iter().skip(1).cloned().collect(),
        }
    }

    /// Only the bottom slot may hold a stack variable.
    pub fn is_well_formed(&self) -> bool {
        self.kinds
            .iter()
            .skip(1)
            .all(|kind| !matches!(kind, Kind::StackVar(_)))
    }

    pub fn is_subtype_of(&self, other: &Vector) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(kind, other)| kind.is_subtype_of(other))
    }

    /// The number of kinds in this segment, counting nested ones.
    pub fn size(&self) -> usize {
        self.kinds.iter().map(Kind::size).sum()
    }

    fn to_id_string(&self) -> String {
        self.kinds
            .iter()
            .map(Kind::to_id_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<Kind> for Vector {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        Self::from_kinds(iter)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// A stack effect. Two function types are equal when their consumption,
/// production and effect flag are; the id is not part of the identity of the
/// type.
#[derive(Clone, Debug)]
pub struct FnType {
    id: FnId,
    pub cons: Vector,
    pub prod: Vector,
    pub effects: bool,
}

impl PartialEq for FnType {
    fn eq(&self, other: &Self) -> bool {
        self.cons == other.cons && self.prod == other.prod && self.effects == other.effects
    }
}

impl Eq for FnType {}

impl FnType {
    pub fn new(id: FnId, cons: Vector, prod: Vector, effects: bool) -> Self {
        Self {
            id,
            cons,
            prod,
            effects,
        }
    }

    /// The type of `apply`: `('A ('A -> 'B) -> 'B)`.
    pub fn apply_type(fresh: &mut Fresh) -> Self {
        let a = Kind::StackVar(fresh.stack_var());
        let b = Kind::StackVar(fresh.stack_var());
        let applied = fresh.function(
            Vector::from_kinds([a.clone()]),
            Vector::from_kinds([b.clone()]),
            false,
        );

        fresh.function(
            Vector::from_kinds([a, applied.into()]),
            Vector::from_kinds([b]),
            false,
        )
    }

    pub fn id(&self) -> FnId {
        self.id
    }

    /// The same type under another id.
    pub fn with_id(self, id: FnId) -> Self {
        Self { id, ..self }
    }

    /// Consumption then production, bottom to top.
    pub fn children(&self) -> impl Iterator<Item = &Kind> {
        self.cons.iter().chain(self.prod.iter())
    }

    /// The number of slots consumed above a row variable shared with the
    /// production. `None` if the consumption ends in a row variable the
    /// production does not share.
    pub fn max_consumption(&self) -> Option<usize> {
        net_slots(&self.cons, &self.prod)
    }

    /// The number of slots produced above a row variable shared with the
    /// consumption.
    pub fn max_production(&self) -> Option<usize> {
        net_slots(&self.prod, &self.cons)
    }

    /// Consumes exactly one value and produces exactly one value, so that the
    /// function can be passed around as an opaque `any` or `function`.
    pub fn is_runtime_polymorphic(&self) -> bool {
        self.max_consumption() == Some(1) && self.max_production() == Some(1)
    }

    /// A function may stand in for another if it accepts at least as much
    /// and produces no more, so the consumption is compared the other way
    /// around.
    pub fn is_subtype_of(&self, other: &Kind) -> bool {
        match other {
            Kind::Simple(name) if name == ANY || name == DYNAMIC_FN => {
                self.is_runtime_polymorphic()
            }

            Kind::Function(other) => {
                other.cons.is_subtype_of(&self.cons)
                    && self.prod.is_subtype_of(&other.prod)
                    && (!self.effects || other.effects)
            }

            _ => false,
        }
    }

    /// Every variable produced must also be consumed, unless the function
    /// consumes itself (a self type carries all of its consumption variables).
    pub fn is_well_typed(&self) -> bool {
        if self
            .cons
            .iter()
            .any(|kind| matches!(kind, Kind::SelfType(_)))
        {
            return true;
        }

        let mut consumed = HashSet::new();
        for kind in self.cons.iter() {
            kind.collect_vars(&mut consumed, &mut Vec::new());
        }

        self.prod
            .iter()
            .filter_map(Kind::var_name)
            .all(|name| consumed.contains(name))
    }

    /// Make every function in this tree polymorphic over the rest of the
    /// stack by putting a fresh row variable at the bottom of its consumption
    /// and production. Functions whose consumption already starts with a row
    /// variable are left alone, even when their production does not.
    pub fn with_implicit_rows(&self, fresh: &mut Fresh) -> FnType {
        let mut cons = rows_in(&self.cons, fresh);
        let mut prod = rows_in(&self.prod, fresh);

        if !matches!(cons.bottom(), Some(Kind::StackVar(_))) {
            let row = Kind::StackVar(fresh.stack_var());
            cons.push_bottom(row.clone());
            prod.push_bottom(row);
        }

        Self::new(self.id, cons, prod, self.effects)
    }

    /// Remove row variables that only connect the bottom of a consumption to
    /// the bottom of its production. A row counts as implicit when it occurs
    /// exactly twice in the whole tree.
    pub fn without_implicit_rows(&self) -> FnType {
        let mut counts = HashMap::new();
        for kind in self.children() {
            kind.count_vars(&mut counts);
        }

        self.strip_rows(&counts)
    }

    fn strip_rows(&self, counts: &HashMap<String, usize>) -> FnType {
        let cons = no_rows_in(&self.cons, counts);
        let prod = no_rows_in(&self.prod, counts);

        match (cons.bottom(), prod.bottom()) {
            (Some(Kind::StackVar(a)), Some(Kind::StackVar(b)))
                if a == b && counts.get(a) == Some(&2) =>
            {
                Self::new(self.id, cons.without_bottom(), prod.without_bottom(), self.effects)
            }
            _ => Self::new(self.id, cons, prod, self.effects),
        }
    }

    /// Every variable in this type, in order of first occurrence.
    pub fn vars(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut vars = Vec::new();
        for kind in self.children() {
            kind.collect_vars(&mut seen, &mut vars);
        }
        vars
    }

    pub fn to_id_string(&self) -> String {
        let arrow = if self.effects { "~>" } else { "->" };
        format!(
            "({} {arrow} {})_{}",
            self.cons.to_id_string(),
            self.prod.to_id_string(),
            self.id.0
        )
    }
}

impl fmt::Display for FnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.effects { "~>" } else { "->" };
        write!(f, "({} {arrow} {})", self.cons, self.prod)
    }
}

fn net_slots(of: &Vector, other: &Vector) -> Option<usize> {
    match of.bottom() {
        Some(Kind::StackVar(row)) => match other.bottom() {
            Some(Kind::StackVar(shared)) if shared == row => Some(of.len() - 1),
            _ => None,
        },
        _ => Some(of.len()),
    }
}

fn rows_in(vec: &Vector, fresh: &mut Fresh) -> Vector {
    let mut res = Vector::new();
    for kind in vec.iter() {
        match kind {
            Kind::Function(f) => res.push(f.with_implicit_rows(fresh).into()),
            kind => res.push(kind.clone()),
        }
    }
    res
}

fn no_rows_in(vec: &Vector, counts: &HashMap<String, usize>) -> Vector {
    vec.iter()
        .map(|kind| match kind {
            Kind::Function(f) => f.strip_rows(counts).into(),
            kind => kind.clone(),
        })
        .collect()
}
