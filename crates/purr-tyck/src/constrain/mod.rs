//! Constraint collection. Pairing the production of one function with the
//! consumption of the next gives a set of equations between variables and
//! kinds. Variables constrained equal share a bucket; each bucket holds every
//! kind its variables must be equal to, and is reduced to a single
//! representative by the unifier.


use std::collections::{HashMap, HashSet};
use std::fmt;

use log::trace;
use purr_common::kinds::{FnId, FnType, Fresh, Kind, SelfTag, Vector};

use crate::rename::Renamer;
use crate::selftype::SelfTypes;
use crate::InferError;

/// Union-find over buckets of kinds. Bucket ids are handed out in creation
/// order, and the older of two merged buckets is kept.
#[derive(Debug, Default)]
pub struct Constraints {
    ids: HashMap<String, usize>,
    parents: Vec<usize>,
    buckets: Vec<Vec<Kind>>,
    equalities: Vec<(Kind, Kind)>,
}

impl Constraints {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            parents: Vec::new(),
            buckets: Vec::new(),
            equalities: Vec::new(),
        }
    }

    /// Every constrained variable, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.ids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The canonical bucket id of a variable.
    pub fn bucket_id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).map(|id| self.find(*id))
    }

    pub fn bucket(&self, name: &str) -> Option<&[Kind]> {
        self.bucket_id(name)
            .map(|id| self.buckets[id].as_slice())
    }

    /// The canonical buckets in creation order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[Kind])> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(id, _)| self.parents[*id] == *id)
            .map(|(id, bucket)| (id, bucket.as_slice()))
    }

    pub fn same_bucket(&self, a: &str, b: &str) -> bool {
        matches!((self.bucket_id(a), self.bucket_id(b)), (Some(a), Some(b)) if a == b)
    }

    /// Pairs of kinds which must be equal but which are not variables, kept
    /// for the unifier to check.
    pub fn equalities(&self) -> &[(Kind, Kind)] {
        &self.equalities
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.equalities.is_empty()
    }

    fn find(&self, mut id: usize) -> usize {
        while self.parents[id] != id {
            id = self.parents[id];
        }
        id
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, bucket) in self.buckets() {
            let mut names: Vec<_> = self
                .ids
                .iter()
                .filter(|(_, other)| self.find(**other) == id)
                .map(|(name, _)| name.as_str())
                .collect();
            names.sort_unstable();

            let kinds: Vec<_> = bucket.iter().map(Kind::to_id_string).collect();
            writeln!(f, "{} = {}", names.join(", "), kinds.join(" | "))?;
        }

        for (left, right) in self.equalities.iter() {
            writeln!(f, "{} == {}", left.to_id_string(), right.to_id_string())?;
        }

        Ok(())
    }
}

/// Builds [`Constraints`]. Nested function types are unified eagerly: adding
/// a function to a bucket that already holds one pairs up their consumptions
/// and productions right away.
pub struct Collector<'a> {
    fresh: &'a mut Fresh,
    self_types: &'a SelfTypes,
    constraints: Constraints,
    processed: HashSet<(FnId, FnId)>,
    instances: HashMap<SelfTag, FnType>,
}

impl<'a> Collector<'a> {
    pub fn new(fresh: &'a mut Fresh, self_types: &'a SelfTypes) -> Self {
        Self {
            fresh,
            self_types,
            constraints: Constraints::new(),
            processed: HashSet::new(),
            instances: HashMap::new(),
        }
    }

    pub fn finish(self) -> Constraints {
        self.constraints
    }

    /// Constrain two stack segments to be equal, pairing them from the top.
    pub fn add_vector(&mut self, left: &Vector, right: &Vector) -> Result<(), InferError> {
        let (l, r) = (left.kinds(), right.kinds());
        let (mut i, mut j) = (l.len(), r.len());

        while i > 0 && j > 0 {
            let (a, b) = (&l[i - 1], &r[j - 1]);
            let a_row = matches!(a, Kind::StackVar(_));
            let b_row = matches!(b, Kind::StackVar(_));

            // a row variable always stands for everything below
            if a_row || b_row {
                if a_row {
                    self.add(a, Vector::from_kinds(r[..j].iter().cloned()).into())?;
                }

                if b_row {
                    self.add(b, Vector::from_kinds(l[..i].iter().cloned()).into())?;
                }

                return Ok(());
            }

            self.add_pair(a, b)?;
            i -= 1;
            j -= 1;
        }

        match (&l[..i], &r[..j]) {
            ([], []) => Ok(()),
            ([row @ Kind::StackVar(_)], []) | ([], [row @ Kind::StackVar(_)]) => {
                self.add(row, Vector::new().into())
            }
            (rest_l, rest_r) => {
                trace!(
                    "deferring arity mismatch between `{}` and `{}`",
                    Vector::from_kinds(rest_l.iter().cloned()),
                    Vector::from_kinds(rest_r.iter().cloned())
                );

                self.constraints.equalities.push((
                    Vector::from_kinds(rest_l.iter().cloned()).into(),
                    Vector::from_kinds(rest_r.iter().cloned()).into(),
                ));
                Ok(())
            }
        }
    }

    /// Constrain two function types to be equal. Each pair of function nodes
    /// is only processed once, which keeps recursive types finite.
    pub fn add_fn(&mut self, left: &FnType, right: &FnType) -> Result<(), InferError> {
        if left.id() == right.id() {
            return Ok(());
        }

        let key = (left.id().min(right.id()), left.id().max(right.id()));
        if !self.processed.insert(key) {
            return Ok(());
        }

        self.add_vector(&left.cons, &right.cons)?;
        self.add_vector(&left.prod, &right.prod)
    }

    /// Constrain the variable `var` to be equal to `kind`.
    pub fn add(&mut self, var: &Kind, kind: Kind) -> Result<(), InferError> {
        let Some(name) = var.var_name() else {
            return Err(InferError::internal(format!(
                "cannot constrain the non-variable `{var}`"
            )));
        };

        let kind = match kind {
            Kind::Vector(vec) if vec.len() == 1 => {
                let single = &vec.kinds()[0];
                if matches!(var, Kind::TypeVar(_)) || matches!(single, Kind::StackVar(_)) {
                    single.clone()
                } else {
                    Kind::Vector(vec)
                }
            }
            kind => kind,
        };

        let id = self.bucket_for(var);
        if kind.var_name() == Some(name) {
            return Ok(());
        }

        let Some(other) = kind.var_name().map(String::from) else {
            return self.push(id, kind);
        };

        match self.constraints.ids.get(&other) {
            Some(&other) => self.union(id, other),
            None => {
                let root = self.constraints.find(id);
                self.constraints.ids.insert(other, root);
                self.constraints.buckets[root].push(kind);
                Ok(())
            }
        }
    }

    fn add_pair(&mut self, a: &Kind, b: &Kind) -> Result<(), InferError> {
        match (a, b) {
            (var, other) | (other, var) if var.is_var() => self.add(var, other.clone()),

            (Kind::Function(f), Kind::Function(g)) => self.add_fn(f, g),

            (Kind::SelfType(tag), Kind::Function(f)) | (Kind::Function(f), Kind::SelfType(tag)) => {
                let instance = self.instance(*tag)?;
                self.add_fn(&instance, f)
            }

            (Kind::Vector(v), Kind::Vector(w)) => self.add_vector(v, w),

            (a, b) if a == b => Ok(()),

            (a, b) => {
                self.constraints.equalities.push((a.clone(), b.clone()));
                Ok(())
            }
        }
    }

    fn bucket_for(&mut self, var: &Kind) -> usize {
        let name = var.var_name().unwrap_or_default();
        if let Some(id) = self.constraints.ids.get(name) {
            return self.constraints.find(*id);
        }

        let id = self.constraints.buckets.len();
        self.constraints.parents.push(id);
        self.constraints.buckets.push(vec![var.clone()]);
        self.constraints.ids.insert(name.into(), id);
        id
    }

    fn union(&mut self, a: usize, b: usize) -> Result<(), InferError> {
        let (a, b) = (self.constraints.find(a), self.constraints.find(b));
        if a == b {
            return Ok(());
        }

        let (keep, drop) = (a.min(b), a.max(b));
        self.constraints.parents[drop] = keep;

        let moved = std::mem::take(&mut self.constraints.buckets[drop]);
        for kind in moved {
            self.push(keep, kind)?;
        }

        Ok(())
    }

    /// Add a kind to a bucket, pairing it with the bucket's existing
    /// structure if it has any.
    fn push(&mut self, id: usize, kind: Kind) -> Result<(), InferError> {
        let root = self.constraints.find(id);
        let bucket = &self.constraints.buckets[root];
        if bucket.contains(&kind) {
            return Ok(());
        }

        let partner = match &kind {
            Kind::Function(_) | Kind::SelfType(_) => bucket
                .iter()
                .find(|other| matches!(other, Kind::Function(_) | Kind::SelfType(_)))
                .cloned(),
            Kind::Vector(_) => bucket
                .iter()
                .find(|other| matches!(other, Kind::Vector(_)))
                .cloned(),
            _ => None,
        };

        self.constraints.buckets[root].push(kind.clone());

        match partner {
            Some(partner) => self.add_pair(&partner, &kind),
            None => Ok(()),
        }
    }

    /// A fresh copy of the function a self tag stands for, made once per
    /// collection.
    fn instance(&mut self, tag: SelfTag) -> Result<FnType, InferError> {
        if let Some(instance) = self.instances.get(&tag) {
            return Ok(instance.clone());
        }

        let self_types = self.self_types;
        let template = self_types.template(tag).ok_or_else(|| {
            InferError::internal(format!("self type #{} was never registered", tag.index()))
        })?;

        let renamed = Renamer::new(&mut *self.fresh).rename_fn(template);
        let instance = renamed.with_implicit_rows(&mut *self.fresh);

        trace!("instantiated self#{} as {}", tag.index(), instance.to_id_string());
        self.instances.insert(tag, instance.clone());
        Ok(instance)
    }
}
