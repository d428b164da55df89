use super::{FnId, FnType, SelfTag, Vector};

/// Source of fresh variable names, function ids and self tags. There is no
/// global counter: whoever owns a `Fresh` threads it through every call that
/// needs new names, and independent inference runs use independent
/// generators.
#[derive(Debug, Default)]
pub struct Fresh {
    vars: usize,
    fns: usize,
    selfs: usize,
}

impl Fresh {
    pub fn new() -> Self {
        Self {
            vars: 0,
            fns: 0,
            selfs: 0,
        }
    }

    fn next_var(&mut self) -> usize {
        let id = self.vars;
        self.vars += 1;
        id
    }

    /// A new type variable name, `t0`, `t1`, ...
    pub fn type_var(&mut self) -> String {
        format!("t{}", self.next_var())
    }

    /// A new stack variable name, `S0`, `S1`, ...
    pub fn stack_var(&mut self) -> String {
        format!("S{}", self.next_var())
    }

    pub fn fn_id(&mut self) -> FnId {
        let id = FnId(self.fns);
        self.fns += 1;
        id
    }

    pub fn self_tag(&mut self) -> SelfTag {
        let tag = SelfTag(self.selfs);
        self.selfs += 1;
        tag
    }

    /// A function type with a new id.
    pub fn function(&mut self, cons: Vector, prod: Vector, effects: bool) -> FnType {
        FnType::new(self.fn_id(), cons, prod, effects)
    }
}
