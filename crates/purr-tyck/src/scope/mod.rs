//! Binding scopes of variables. Every occurrence of a variable belongs to the
//! innermost function node around it, and a variable is bound at the deepest
//! function node that contains all of its occurrences. Occurrences reached
//! through a unifier count as occurring where the variable they replace does.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use im::HashSet;
use purr_common::kinds::{FnId, FnType, Guard, Kind};

use crate::unify::Unifiers;

#[derive(Debug)]
pub struct Scopes {
    root: FnId,
    parents: HashMap<FnId, FnId>,
    ancestors: HashMap<FnId, HashSet<FnId>>,
    uses: HashMap<String, Vec<FnId>>,
}

impl Scopes {
    pub fn compute(root: &FnType, unifiers: &Unifiers) -> Self {
        let mut walker = Walker {
            unifiers,
            scopes: Scopes {
                root: root.id(),
                parents: HashMap::new(),
                ancestors: HashMap::new(),
                uses: HashMap::new(),
            },
        };

        walker.function(root, None, &HashSet::new(), &mut Guard::new());
        walker.scopes
    }

    pub fn root(&self) -> FnId {
        self.root
    }

    pub fn parent(&self, node: FnId) -> Option<FnId> {
        self.parents.get(&node).copied()
    }

    /// Is `node` the function `scope` or nested inside it?
    pub fn is_within(&self, node: FnId, scope: FnId) -> bool {
        node == scope
            || self
                .ancestors
                .get(&node)
                .is_some_and(|ancestors| ancestors.contains(&scope))
    }

    fn depth(&self, node: FnId) -> usize {
        self.ancestors.get(&node).map_or(0, HashSet::len)
    }

    /// The deepest function node containing every occurrence of `var`.
    pub fn binding_scope(&self, var: &str) -> Option<FnId> {
        let uses = self.uses.get(var)?;
        let first = *uses.first()?;

        let mut candidates: Vec<FnId> = self
            .ancestors
            .get(&first)
            .map(|ancestors| ancestors.iter().copied().collect())
            .unwrap_or_default();
        candidates.push(first);

        candidates
            .into_iter()
            .filter(|scope| uses.iter().all(|node| self.is_within(*node, *scope)))
            .max_by_key(|scope| self.depth(*scope))
    }

    /// Is `var` used inside `node` but bound at one of its ancestors?
    pub fn is_free_at(&self, node: FnId, var: &str) -> bool {
        let Some(uses) = self.uses.get(var) else {
            return false;
        };

        let used = uses.iter().any(|used| self.is_within(*used, node));
        used && self
            .binding_scope(var)
            .is_some_and(|scope| scope != node && self.is_within(node, scope))
    }

    /// Does every occurrence of `var` lie inside `node`? Such variables
    /// belong to `node` alone and are renamed whenever it is copied.
    pub fn is_bound_within(&self, node: FnId, var: &str) -> bool {
        self.uses.get(var).is_some_and(|uses| {
            !uses.is_empty() && uses.iter().all(|used| self.is_within(*used, node))
        })
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vars: Vec<_> = self.uses.keys().collect();
        vars.sort_unstable();

        for var in vars {
            match self.binding_scope(var) {
                Some(scope) => writeln!(f, "{var} bound at _{}", scope.index())?,
                None => writeln!(f, "{var} unbound")?,
            }
        }

        Ok(())
    }
}

struct Walker<'a> {
    unifiers: &'a Unifiers,
    scopes: Scopes,
}

impl Walker<'_> {
    fn function(
        &mut self,
        f: &FnType,
        parent: Option<FnId>,
        ancestors: &HashSet<FnId>,
        guard: &mut Guard<String>,
    ) {
        // a node reached along several paths keeps its first position
        if self.scopes.ancestors.contains_key(&f.id()) {
            return;
        }

        if let Some(parent) = parent {
            self.scopes.parents.insert(f.id(), parent);
        }

        self.scopes.ancestors.insert(f.id(), ancestors.clone());

        let inner = ancestors.update(f.id());
        for kind in f.children() {
            self.kind(kind, f.id(), &inner, guard);
        }
    }

    fn kind(
        &mut self,
        kind: &Kind,
        ctx: FnId,
        ancestors: &HashSet<FnId>,
        guard: &mut Guard<String>,
    ) {
        match kind {
            Kind::TypeVar(name) | Kind::StackVar(name) => {
                self.scopes
                    .uses
                    .entry(name.clone())
                    .or_default()
                    .push(ctx);

                let unifiers = self.unifiers;
                if let Some(unifier) = unifiers.get(name) {
                    guard.enter(name.clone(), |guard| {
                        self.kind(unifier, ctx, ancestors, guard)
                    });
                }
            }

            Kind::Vector(vec) => {
                for kind in vec.iter() {
                    self.kind(kind, ctx, ancestors, guard);
                }
            }

            Kind::Function(f) => self.function(f, Some(ctx), ancestors, guard),
            Kind::Simple(_) | Kind::SelfType(_) => {}
        }
    }
}
