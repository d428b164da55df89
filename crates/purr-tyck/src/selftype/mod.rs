//! Self types. A variable whose unifier is a function type that mentions the
//! variable again, directly or through other unifiers, would make the
//! resolved type infinite. Such a variable is bound to a [`Kind::SelfType`]
//! instead, and the function it stands for is kept in a side table.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use log::trace;
use purr_common::kinds::{FnId, FnType, Fresh, Guard, Kind, SelfTag};

use crate::unify::Unifiers;

/// The table from self tags to the function types they abbreviate. Entries
/// are templates: every use instantiates them with fresh variables.
#[derive(Debug, Default)]
pub struct SelfTypes {
    table: HashMap<SelfTag, FnType>,
    tags: HashMap<FnId, SelfTag>,
}

impl SelfTypes {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    pub fn template(&self, tag: SelfTag) -> Option<&FnType> {
        self.table.get(&tag)
    }

    pub fn insert(&mut self, tag: SelfTag, f: FnType) {
        trace!("self#{} stands for {}", tag.index(), f.to_id_string());
        self.table.insert(tag, f);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Register every self type in `f` that is not known yet as the function
    /// node it occurs directly in. This covers self types written in
    /// annotations.
    pub fn register_enclosing(&mut self, f: &FnType) {
        for kind in f.children() {
            match kind {
                Kind::SelfType(tag) if !self.table.contains_key(tag) => {
                    self.insert(*tag, f.without_implicit_rows());
                }
                Kind::Function(inner) => self.register_enclosing(inner),
                Kind::Vector(vec) => {
                    for kind in vec.iter() {
                        if let Kind::Function(inner) = kind {
                            self.register_enclosing(inner);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Replace every function unifier that refers back to its own variable by
    /// a self type. Variables bound to the same function node share a tag.
    /// Returns the newly tagged functions, which still have to be resolved
    /// and [inserted](Self::insert) once the unifiers are final.
    pub fn resolve(
        &mut self,
        unifiers: &mut Unifiers,
        fresh: &mut Fresh,
    ) -> Vec<(SelfTag, FnType)> {
        let mut names: Vec<_> = unifiers.keys().cloned().collect();
        names.sort_unstable();

        let mut found: Vec<(SelfTag, FnType)> = Vec::new();
        for name in names {
            let Some(Kind::Function(f)) = unifiers.get(&name) else {
                continue;
            };

            let mut guard = Guard::new();
            let recursive = guard
                .enter(name.clone(), |guard| {
                    f.children()
                        .any(|kind| refers_to(&name, kind, unifiers, guard))
                })
                .unwrap_or(false);

            if !recursive {
                continue;
            }

            let f = f.clone();
            let tag = *self.tags.entry(f.id()).or_insert_with(|| fresh.self_tag());

            trace!(
                "`{name}` refers to itself through {}, tagging as self#{}",
                f.to_id_string(),
                tag.index()
            );

            if !found.iter().any(|(other, _)| *other == tag) {
                found.push((tag, f));
            }

            unifiers.insert(name, Kind::SelfType(tag));
        }

        found
    }
}

/// Does `kind` mention `name`, following variables through their unifiers?
pub fn refers_to(name: &str, kind: &Kind, unifiers: &Unifiers, guard: &mut Guard<String>) -> bool {
    match kind {
        Kind::TypeVar(var) | Kind::StackVar(var) => {
            var == name
                || guard
                    .enter(var.clone(), |guard| {
                        unifiers
                            .get(var)
                            .is_some_and(|unifier| refers_to(name, unifier, unifiers, guard))
                    })
                    .unwrap_or(false)
        }

        Kind::Vector(vec) => vec.iter().any(|kind| refers_to(name, kind, unifiers, guard)),
        Kind::Function(f) => f.children().any(|kind| refers_to(name, kind, unifiers, guard)),
        Kind::Simple(_) | Kind::SelfType(_) => false,
    }
}
