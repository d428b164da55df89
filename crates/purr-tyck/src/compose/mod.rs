//! Composition of function types, the entry point of inference.

mod resolve;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::fmt;

use log::{info, trace};
use purr_common::kinds::{FnType, Fresh, Kind, SelfTag, Vector};
use purr_common::pretty::{pretty_fn, Style};

use crate::constrain::Collector;
use crate::rename::{canonical, comparable, Renamer};
use crate::scope::Scopes;
use crate::selftype::SelfTypes;
use crate::unify::{self, unify};
use crate::InferError;
use resolve::Resolver;

/// Something with a name that may or may not have a type, such as a word in
/// a definition body.
pub trait Typed {
    fn name(&self) -> &str;
    fn fn_type(&self) -> Option<&FnType>;
}

/// Composing the term at `index` of a sequence with everything before it
/// failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FoldError {
    pub index: usize,
    pub error: InferError,
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term {}: {}", self.index, self.error)
    }
}

impl Error for FoldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Infers the types of compositions. An `Inferer` owns the fresh name
/// generator and the table of self types, so all types that are composed
/// with each other must come from the same `Inferer`.
#[derive(Debug, Default)]
pub struct Inferer {
    fresh: Fresh,
    self_types: SelfTypes,
    verbose: bool,
}

impl Inferer {
    pub fn new() -> Self {
        Self {
            fresh: Fresh::new(),
            self_types: SelfTypes::new(),
            verbose: false,
        }
    }

    /// Trace every composition step through the `purr_tyck::trace` log
    /// target.
    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    pub fn fresh(&mut self) -> &mut Fresh {
        &mut self.fresh
    }

    pub fn self_types(&self) -> &SelfTypes {
        &self.self_types
    }

    /// The function type a self type abbreviates.
    pub fn expand_self(&self, tag: SelfTag) -> Option<&FnType> {
        self.self_types.template(tag)
    }

    /// The type of `left` followed by `right`.
    pub fn infer(&mut self, left: &FnType, right: &FnType) -> Result<FnType, InferError> {
        self.trace(|| format!("composing {left} with {right}"));

        self.self_types.register_enclosing(left);
        self.self_types.register_enclosing(right);

        let mut renamer = Renamer::new(&mut self.fresh);
        let left = renamer.rename_fn(left);
        renamer.reset();
        let right = renamer.rename_fn(right);

        let left = left.with_implicit_rows(&mut self.fresh);
        let right = right.with_implicit_rows(&mut self.fresh);

        self.trace(|| {
            format!(
                "renamed operands {} and {}",
                left.to_id_string(),
                right.to_id_string()
            )
        });

        let mut collector = Collector::new(&mut self.fresh, &self.self_types);
        collector.add_vector(&left.prod, &right.cons)?;
        let constraints = collector.finish();

        let composite = self.fresh.function(
            left.cons.clone(),
            right.prod.clone(),
            left.effects || right.effects,
        );

        self.trace(|| format!("unresolved composite {}", composite.to_id_string()));
        self.trace(|| format!("constraints\n{constraints}"));

        let mut unifiers = unify(&constraints)?;
        self.trace(|| format!("unifiers\n{}", unify::show(&unifiers)));

        let tagged = self.self_types.resolve(&mut unifiers, &mut self.fresh);
        if !tagged.is_empty() {
            self.trace(|| format!("unifiers with self types\n{}", unify::show(&unifiers)));
        }

        let scopes = Scopes::compute(&composite, &unifiers);
        self.trace(|| format!("scopes\n{scopes}"));

        let mut resolver = Resolver::new(&unifiers, &scopes, &mut self.fresh);
        let mut templates = Vec::with_capacity(tagged.len());
        for (tag, f) in tagged {
            templates.push((tag, resolver.resolve_fn(&f)?.without_implicit_rows()));
        }

        let resolved = resolver.resolve_fn(&composite)?;

        for (tag, template) in templates {
            self.self_types.insert(tag, template);
        }

        let result = canonical(&self.expand_strays(&resolved.without_implicit_rows()));

        self.trace(|| {
            format!(
                "result {} or {}",
                pretty_fn(&result, Style::Native),
                pretty_fn(&result, Style::Ml)
            )
        });

        trace!("{left} . {right} = {result}");
        Ok(result)
    }

    /// Fold a sequence of typed terms into the type of their composition.
    /// An untyped term makes the whole sequence untyped.
    pub fn infer_all<T: Typed>(&mut self, terms: &[T]) -> Result<Option<FnType>, FoldError> {
        let Some((first, rest)) = terms.split_first() else {
            return Ok(Some(self.fresh.function(Vector::new(), Vector::new(), false)));
        };

        let Some(mut acc) = first.fn_type().cloned() else {
            return Ok(None);
        };

        for (index, term) in rest.iter().enumerate() {
            let Some(ty) = term.fn_type() else {
                self.trace(|| format!("`{}` is untyped", term.name()));
                return Ok(None);
            };

            self.trace(|| format!("adding `{}`", term.name()));

            acc = self.infer(&acc, ty).map_err(|error| FoldError {
                index: index + 1,
                error,
            })?;
        }

        Ok(Some(acc))
    }

    /// A self type stands for the function it occurs in directly. Composing
    /// can carry one into some other function, where it is replaced by a
    /// fresh copy of the function it stands for.
    fn expand_strays(&mut self, f: &FnType) -> FnType {
        let cons = self.expand_strays_in(&f.cons, f);
        let prod = self.expand_strays_in(&f.prod, f);
        FnType::new(f.id(), cons, prod, f.effects)
    }

    fn expand_strays_in(&mut self, vec: &Vector, owner: &FnType) -> Vector {
        let mut res = Vector::new();
        for kind in vec.iter() {
            let kind = match kind {
                Kind::SelfType(tag) => match self.self_types.template(*tag).cloned() {
                    Some(template) if !self.same_function(owner, &template) => {
                        self.trace(|| {
                            format!("self#{} left {owner}, expanding it", tag.index())
                        });
                        Kind::Function(Renamer::new(&mut self.fresh).rename_fn(&template))
                    }
                    _ => kind.clone(),
                },
                Kind::Function(inner) => Kind::Function(self.expand_strays(inner)),
                Kind::Vector(inner) => Kind::Vector(self.expand_strays_in(inner, owner)),
                Kind::TypeVar(_) | Kind::StackVar(_) | Kind::Simple(_) => kind.clone(),
            };

            res.push(kind);
        }

        res
    }

    fn same_function(&mut self, f: &FnType, g: &FnType) -> bool {
        let f = f.with_implicit_rows(&mut self.fresh);
        let g = g.with_implicit_rows(&mut self.fresh);
        comparable(&f) == comparable(&g)
    }

    fn trace(&self, msg: impl FnOnce() -> String) {
        if self.verbose {
            info!(target: "purr_tyck::trace", "{}", msg());
        }
    }
}

/// Are `f` and `g` the same type up to the names of their variables and self
/// types?
pub fn alpha_equivalent(f: &FnType, g: &FnType) -> bool {
    comparable(f) == comparable(g)
}

/// Can a word with the inferred type be given the declared type? Both types
/// are made row polymorphic first, so `(int -> int)` matches
/// `('A int -> 'A int)`. The declared type may accept less than the
/// inferred one, so `(any -> int)` can be declared `(int -> int)`.
pub fn matches_declared(fresh: &mut Fresh, inferred: &FnType, declared: &FnType) -> bool {
    let inferred = comparable(&inferred.with_implicit_rows(fresh));
    let declared = comparable(&declared.with_implicit_rows(fresh));
    inferred.is_subtype_of(&Kind::Function(declared))
}
