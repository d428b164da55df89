use crate::message::Messages;

pub trait Driver {
    fn report(&mut self, messages: Messages);

    /// Output the outcome of checking a single definition. The type is taken
    /// as a function, since pretty printing it is wasted work for drivers that
    /// discard it.
    fn report_definition(&mut self, name: &str, outcome: Outcome, ty: impl FnOnce() -> String);
}

/// What checking a definition produced.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    /// The definition has a type.
    Typed,

    /// Some word in the definition has no known type yet, so neither does the
    /// definition. This is not an error.
    Untyped,

    /// The definition was rejected. The reason has been reported.
    Error,
}
