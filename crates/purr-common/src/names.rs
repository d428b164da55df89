use std::collections::HashMap;

use bimap::BiMap;

use crate::message::Span;

/// An interned definition name.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Name(usize);

impl Name {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The names defined by a program, along with where they were first defined.
#[derive(Debug, Default)]
pub struct Names {
    names: BiMap<Name, String>,
    decls: HashMap<Name, Span>,
}

impl Names {
    pub fn new() -> Self {
        Self {
            names: BiMap::new(),
            decls: HashMap::new(),
        }
    }

    /// Declare `text` at `at`. Returns the existing name and the span of its
    /// first declaration if `text` was already declared.
    pub fn declare(&mut self, at: Span, text: &str) -> Result<Name, (Name, Span)> {
        if let Some(name) = self.names.get_by_right(text) {
            let prev = self.decls.get(name).copied().unwrap_or(at);
            return Err((*name, prev));
        }

        let name = Name(self.names.len());
        self.names.insert(name, text.to_string());
        self.decls.insert(name, at);
        Ok(name)
    }

    pub fn lookup(&self, text: &str) -> Option<Name> {
        self.names.get_by_right(text).copied()
    }

    pub fn text(&self, name: &Name) -> Option<&str> {
        self.names.get_by_left(name).map(String::as_str)
    }

    pub fn span(&self, name: &Name) -> Option<Span> {
        self.decls.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
