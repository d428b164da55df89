
use std::collections::HashMap;

use log::warn;
use pretty::{Arena, DocAllocator, DocBuilder};

use crate::kinds::{FnType, Kind, Vector};

/// How to print types.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Style {
    /// `('A int -> 'A bool)`
    #[default]
    Native,

    /// `(A int -> A bool)`, with a function producing a single function
    /// written as a chain of arrows.
    Ml,
}

const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// The `n`th display name: `a`, `b`, ..., `z`, `ba`, `bb`, ...
pub fn alpha_name(n: usize) -> String {
    if n == 0 {
        return ALPHABET[0].to_string();
    }

    let mut id = n;
    let mut name = String::with_capacity(2);
    while id != 0 {
        name.insert(0, ALPHABET[id % ALPHABET.len()]);
        id /= ALPHABET.len();
    }

    name
}

/// Short display names for the variables of one printed type. Type and stack
/// variables share a single counter; stack variables are upper-cased.
#[derive(Debug, Default)]
pub struct PrettyMap {
    names: HashMap<String, String>,
    curr: usize,
}

impl PrettyMap {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            curr: 0,
        }
    }

    /// Assign names to every variable in `kind`, in printing order.
    pub fn assign(&mut self, kind: &Kind) {
        match kind {
            Kind::TypeVar(name) => self.add(name, false),
            Kind::StackVar(name) => self.add(name, true),
            Kind::Vector(vec) => vec.iter().for_each(|kind| self.assign(kind)),
            Kind::Function(f) => f.children().for_each(|kind| self.assign(kind)),
            Kind::Simple(_) | Kind::SelfType(_) => {}
        }
    }

    fn add(&mut self, var: &str, upper: bool) {
        if self.names.contains_key(var) {
            return;
        }

        let name = alpha_name(self.curr);
        self.curr += 1;

        let name = if upper { name.to_uppercase() } else { name };
        self.names.insert(var.into(), name);
    }

    pub fn name(&self, var: &str) -> Option<&str> {
        self.names.get(var).map(String::as_str)
    }
}

pub struct Prettier {
    style: Style,
    width: usize,
}

impl Prettier {
    pub fn new(style: Style) -> Self {
        Self { style, width: 80 }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    pub fn pretty_fn(&self, ty: &FnType) -> String {
        self.pretty_kind(&Kind::Function(ty.clone()))
    }

    pub fn pretty_kind(&self, kind: &Kind) -> String {
        let mut map = PrettyMap::new();
        map.assign(kind);

        let arena = Arena::new();
        let printer = Printer {
            map: &map,
            style: self.style,
            arena: &arena,
        };

        let doc = printer.kind(kind);
        let mut res = Vec::new();
        doc.render(self.width, &mut res).unwrap();
        String::from_utf8(res).unwrap()
    }
}

pub fn pretty_fn(ty: &FnType, style: Style) -> String {
    Prettier::new(style).pretty_fn(ty)
}

pub fn pretty_kind(kind: &Kind, style: Style) -> String {
    Prettier::new(style).pretty_kind(kind)
}

struct Printer<'a> {
    map: &'a PrettyMap,
    style: Style,
    arena: &'a Arena<'a>,
}

impl<'a> Printer<'a> {
    fn kind(&self, kind: &Kind) -> DocBuilder<'a, Arena<'a>> {
        match kind {
            Kind::TypeVar(name) | Kind::StackVar(name) => self.var(name),
            Kind::Simple(name) => self.arena.text(name.clone()),
            Kind::Vector(vec) => self.vector(vec),
            Kind::Function(f) => self.function(f),
            Kind::SelfType(_) => self.arena.text("self"),
        }
    }

    fn var(&self, name: &str) -> DocBuilder<'a, Arena<'a>> {
        let display = self.map.name(name).unwrap_or_else(|| {
            warn!("variable `{name}` has no display name");
            name
        });
        match self.style {
            Style::Native => self.arena.text(format!("'{display}")),
            Style::Ml => self.arena.text(display.to_string()),
        }
    }

    fn vector(&self, vec: &Vector) -> DocBuilder<'a, Arena<'a>> {
        self.arena
            .intersperse(vec.iter().map(|kind| self.kind(kind)), self.arena.line())
            .group()
    }

    fn function(&self, f: &FnType) -> DocBuilder<'a, Arena<'a>> {
        self.arena
            .text("(")
            .append(self.body(f))
            .append(self.arena.text(")"))
            .group()
    }

    fn body(&self, f: &FnType) -> DocBuilder<'a, Arena<'a>> {
        let arrow = if f.effects { "~>" } else { "->" };

        let prod = match (self.style, f.prod.kinds()) {
            (Style::Ml, [Kind::Function(inner)]) => self.body(inner),
            _ => self.vector(&f.prod),
        };

        self.vector(&f.cons)
            .append(self.arena.text(format!(" {arrow}")))
            .append(self.arena.line())
            .append(prod)
            .nest(2)
    }
}
