//! Checking whole programs: every definition body is inferred in source
//! order and compared against its annotation.


use std::collections::{HashMap, HashSet};

use log::{debug, info};
use purr_common::kinds::{FnType, Kind, Vector};
use purr_common::message::{File, Messages, Span};
use purr_common::names::{Name, Names};
use purr_common::pretty::{Prettier, Style};
use purr_common::{Driver, Outcome};
use purr_tyck::{matches_declared, InferError, Inferer, KindError, Typed};

use crate::lex::lex;
use crate::lower::Lowerer;
use crate::parse::tree::{Definition, Expr, ExprNode, Literal};
use crate::parse::{parse, parse_words};
use crate::primitives::{self, Primitive};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CheckOptions {
    pub verbose: bool,
    pub style: Style,
    pub width: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            style: Style::Native,
            width: 80,
        }
    }
}

/// The type a word has once its definition has been checked.
#[derive(Clone, Debug)]
enum Entry {
    Typed(FnType),

    /// Defined, but without a type: its body was untyped or erroneous and
    /// it has no annotation.
    Untyped,
}

/// A word of a body along with its type, if it has one.
#[derive(Clone, Debug)]
struct Term {
    text: String,
    span: Span,
    ty: Option<FnType>,
}

impl Typed for Term {
    fn name(&self) -> &str {
        &self.text
    }

    fn fn_type(&self) -> Option<&FnType> {
        self.ty.as_ref()
    }
}

/// What inferring a sequence of words gave.
enum Inferred {
    Typed(FnType),
    Untyped,

    /// Already reported.
    Error,
}

pub struct Checker {
    inferer: Inferer,
    options: CheckOptions,
    prims: Vec<(Primitive, FnType)>,
    prim_names: HashMap<&'static str, usize>,

    names: Names,
    declared: HashMap<Name, FnType>,
    malformed: HashSet<Name>,
    checked: HashMap<Name, Entry>,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Result<Self, InferError> {
        let mut inferer = Inferer::new().with_verbose(options.verbose);
        let prims = primitives::load(inferer.fresh())?;
        let prim_names = prims
            .iter()
            .enumerate()
            .map(|(i, (prim, _))| (prim.name, i))
            .collect();

        debug!("loaded {} primitives", prims.len());

        Ok(Self {
            inferer,
            options,
            prims,
            prim_names,

            names: Names::new(),
            declared: HashMap::new(),
            malformed: HashSet::new(),
            checked: HashMap::new(),
        })
    }

    pub fn primitives(&self) -> impl Iterator<Item = &(Primitive, FnType)> {
        self.prims.iter()
    }

    pub fn pretty(&self, ty: &FnType) -> String {
        Prettier::new(self.options.style)
            .with_width(self.options.width)
            .pretty_fn(ty)
    }

    fn pretty_kind(&self, kind: &Kind) -> String {
        Prettier::new(self.options.style)
            .with_width(self.options.width)
            .pretty_kind(kind)
    }

    /// Check every definition of a program, reporting each outcome to the
    /// driver. Only internal errors are returned; problems with the program
    /// itself are reported and checking moves on.
    pub fn check_program(
        &mut self,
        driver: &mut impl Driver,
        src: &str,
        file: File,
    ) -> Result<(), InferError> {
        info!("checking file with id {file}");

        let tokens = lex(driver, src, file);
        let program = parse(driver, tokens, file);

        let mut defs = Vec::with_capacity(program.defs.len());
        for def in &program.defs {
            let mut msgs = Messages::new();
            if let Some(name) = self.declare(&mut msgs, def) {
                defs.push((name, def));
            }
            driver.report(msgs);
        }

        for (name, def) in defs {
            self.check_definition(driver, name, def)?;
        }

        Ok(())
    }

    /// Infer the type of a sequence of words, such as `dup [swap] dip`, in
    /// the context of every definition checked so far.
    pub fn infer_words(
        &mut self,
        driver: &mut impl Driver,
        src: &str,
        file: File,
    ) -> Result<Outcome, InferError> {
        let tokens = lex(driver, src, file);
        let words = parse_words(driver, tokens, file);

        let mut msgs = Messages::new();
        let inferred = self.infer_exprs(&mut msgs, &words)?;
        driver.report(msgs);

        let text = src.trim();
        let outcome = match inferred {
            Inferred::Typed(ty) => {
                driver.report_definition(text, Outcome::Typed, || self.pretty(&ty));
                Outcome::Typed
            }
            Inferred::Untyped => {
                driver.report_definition(text, Outcome::Untyped, String::new);
                Outcome::Untyped
            }
            Inferred::Error => {
                driver.report_definition(text, Outcome::Error, String::new);
                Outcome::Error
            }
        };

        Ok(outcome)
    }

    /// Register the name of a definition and lower its annotation.
    fn declare(&mut self, msgs: &mut Messages, def: &Definition) -> Option<Name> {
        let name = match self.names.declare(def.name_span, &def.name) {
            Ok(name) => name,
            Err((_, previous)) => {
                msgs.at(def.name_span)
                    .name_redefined(def.name.clone(), previous);
                return None;
            }
        };

        let Some(anno) = &def.anno else {
            return Some(name);
        };

        let mut lowerer = Lowerer::new(self.inferer.fresh());
        let ty = lowerer.lower_fn(anno);
        let lowered = lowerer.msgs;

        let malformed = lowered.has_errors();
        msgs.merge(lowered);

        if malformed {
            self.malformed.insert(name);
            return Some(name);
        }

        if !ty.is_well_typed() {
            msgs.at(anno.span).tyck_not_well_typed(self.pretty(&ty));
        }

        self.declared.insert(name, ty);
        Some(name)
    }

    fn check_definition(
        &mut self,
        driver: &mut impl Driver,
        name: Name,
        def: &Definition,
    ) -> Result<(), InferError> {
        info!("checking definition `{}`", def.name);

        if self.malformed.contains(&name) {
            driver.report_definition(&def.name, Outcome::Error, String::new);
            self.checked.insert(name, Entry::Untyped);
            return Ok(());
        }

        let mut msgs = Messages::new();
        let inferred = self.infer_exprs(&mut msgs, &def.body)?;
        let declared = self.declared.get(&name).cloned();

        let (outcome, entry) = match (inferred, declared) {
            (Inferred::Error, declared) => {
                let entry = declared.map(Entry::Typed).unwrap_or(Entry::Untyped);
                (Outcome::Error, entry)
            }

            (Inferred::Untyped, Some(declared)) => (Outcome::Typed, Entry::Typed(declared)),
            (Inferred::Untyped, None) => (Outcome::Untyped, Entry::Untyped),

            (Inferred::Typed(inferred), Some(declared)) => {
                if matches_declared(self.inferer.fresh(), &inferred, &declared) {
                    (Outcome::Typed, Entry::Typed(declared))
                } else {
                    let span = def.anno.as_ref().map(|anno| anno.span).unwrap_or(def.name_span);
                    msgs.at(span).tyck_declared_mismatch(
                        def.name.clone(),
                        self.pretty(&declared),
                        self.pretty(&inferred),
                    );
                    (Outcome::Error, Entry::Typed(declared))
                }
            }

            (Inferred::Typed(inferred), None) => (Outcome::Typed, Entry::Typed(inferred)),
        };

        driver.report(msgs);

        match &entry {
            Entry::Typed(ty) if outcome == Outcome::Typed => {
                driver.report_definition(&def.name, outcome, || self.pretty(ty));
            }
            _ => driver.report_definition(&def.name, outcome, String::new),
        }

        self.checked.insert(name, entry);
        Ok(())
    }

    fn infer_exprs(&mut self, msgs: &mut Messages, exprs: &[Expr]) -> Result<Inferred, InferError> {
        let mut terms = Vec::with_capacity(exprs.len());
        let mut failed = false;

        for expr in exprs {
            match self.term(msgs, expr)? {
                Some(term) => terms.push(term),
                None => failed = true,
            }
        }

        if failed {
            return Ok(Inferred::Error);
        }

        match self.inferer.infer_all(&terms) {
            Ok(Some(ty)) => Ok(Inferred::Typed(ty)),
            Ok(None) => Ok(Inferred::Untyped),

            Err(err) => match err.error {
                InferError::Kind(error) => {
                    let term = &terms[err.index];
                    self.report_kind_error(msgs, term, error);
                    Ok(Inferred::Error)
                }
                internal @ InferError::Internal(_) => Err(internal),
            },
        }
    }

    /// The term for a single word, or `None` if it is erroneous.
    fn term(&mut self, msgs: &mut Messages, expr: &Expr) -> Result<Option<Term>, InferError> {
        let (text, ty) = match &expr.node {
            ExprNode::Name(text) => match self.lookup(text) {
                Some(ty) => (text.clone(), ty),
                None => {
                    msgs.at(expr.span).name_unknown(text.clone());
                    return Ok(None);
                }
            },

            ExprNode::Literal(lit) => {
                let (text, simple) = match lit {
                    Literal::Int(value) => (value.to_string(), "int"),
                    Literal::Float(value) => (value.to_string(), "double"),
                    Literal::Str(text) => (format!("{text:?}"), "string"),
                    Literal::Char(c) => (format!("{c:?}"), "char"),
                };

                (text, Some(self.push(Kind::simple(simple))))
            }

            ExprNode::Quote(body) => {
                let ty = match self.infer_exprs(msgs, body)? {
                    Inferred::Typed(ty) => Some(self.push(Kind::Function(ty))),
                    Inferred::Untyped => None,
                    Inferred::Error => return Ok(None),
                };

                ("[...]".to_string(), ty)
            }
        };

        Ok(Some(Term {
            text,
            span: expr.span,
            ty,
        }))
    }

    /// The type of a word, where `Some(None)` is a known but untyped word.
    /// Definitions shadow primitives.
    fn lookup(&self, text: &str) -> Option<Option<FnType>> {
        if let Some(name) = self.names.lookup(text) {
            if let Some(ty) = self.declared.get(&name) {
                return Some(Some(ty.clone()));
            }

            return match self.checked.get(&name) {
                Some(Entry::Typed(ty)) => Some(Some(ty.clone())),
                Some(Entry::Untyped) | None => Some(None),
            };
        }

        self.prim_names
            .get(text)
            .map(|&i| Some(self.prims[i].1.clone()))
    }

    /// `( -> kind)`
    fn push(&mut self, kind: Kind) -> FnType {
        self.inferer
            .fresh()
            .function(Vector::new(), Vector::from_kinds([kind]), false)
    }

    fn report_kind_error(&self, msgs: &mut Messages, term: &Term, error: KindError) {
        let notes = term
            .ty
            .as_ref()
            .map(|ty| vec![format!("`{}` has type `{}`", term.text, self.pretty(ty))])
            .unwrap_or_default();

        let mut at = msgs.at(term.span);
        match error {
            KindError::Incompatible { left, right } => {
                at.tyck_incompatible(self.pretty_kind(&left), self.pretty_kind(&right), notes)
            }

            KindError::NotRuntimePolymorphic { function, target } => at
                .tyck_not_runtime_polymorphic(
                    self.pretty(&function),
                    self.pretty_kind(&target),
                    notes,
                ),

            KindError::Arity { left, right } => at.tyck_arity(
                self.pretty_kind(&Kind::Vector(left)),
                self.pretty_kind(&Kind::Vector(right)),
                notes,
            ),

            KindError::SelfMismatch { left, right } => {
                at.tyck_self_mismatch(self.pretty_kind(&left), self.pretty_kind(&right), notes)
            }
        }
    }
}
