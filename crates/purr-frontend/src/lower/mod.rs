//! Turns written function types into kinds.

#[cfg(test)]
mod tests;

use purr_common::kinds::{FnType, Fresh, Kind, SelfTag, Vector};
use purr_common::message::{File, Messages};

use crate::lex::lex_tokens;
use crate::parse::parse_fn_type as parse_tokens;
use crate::parse::tree::{Component, ComponentNode, FnTypeExpr};

/// Parse and lower a function type written as text, such as
/// `('A int -> 'A bool)`.
pub fn parse_fn_type(src: &str, file: File, fresh: &mut Fresh) -> Result<FnType, Messages> {
    let (tokens, mut msgs) = lex_tokens(src, file);
    let (ty, parse_msgs) = parse_tokens(tokens, file);
    msgs.merge(parse_msgs);

    let Some(ty) = ty else {
        return Err(msgs);
    };

    let mut lowerer = Lowerer::new(fresh);
    let ty = lowerer.lower_fn(&ty);
    msgs.merge(lowerer.msgs);

    if msgs.has_errors() {
        Err(msgs)
    } else {
        Ok(ty)
    }
}

pub struct Lowerer<'a> {
    fresh: &'a mut Fresh,
    pub msgs: Messages,
}

impl<'a> Lowerer<'a> {
    pub fn new(fresh: &'a mut Fresh) -> Self {
        Self {
            fresh,
            msgs: Messages::new(),
        }
    }

    /// Every `self` directly inside one function type shares a tag.
    pub fn lower_fn(&mut self, ty: &FnTypeExpr) -> FnType {
        let mut tag = None;
        let cons = self.lower_vector(&ty.cons, &mut tag);
        let prod = self.lower_vector(&ty.prod, &mut tag);
        self.fresh.function(cons, prod, ty.effects)
    }

    fn lower_vector(&mut self, components: &[Component], tag: &mut Option<SelfTag>) -> Vector {
        let mut vec = Vector::new();

        for (i, component) in components.iter().enumerate() {
            if let Some((_, span)) = &component.label {
                if !matches!(
                    component.node,
                    ComponentNode::Function(_) | ComponentNode::Named(_)
                ) {
                    self.msgs.at(*span).parse_bad_label();
                }
            }

            let kind = match &component.node {
                ComponentNode::Function(f) => Kind::Function(self.lower_fn(f)),
                ComponentNode::Named(name) => Kind::simple(name.clone()),
                ComponentNode::SelfType => {
                    Kind::SelfType(*tag.get_or_insert_with(|| self.fresh.self_tag()))
                }

                ComponentNode::Var(name) if is_stack_var(name) => {
                    if i > 0 {
                        self.msgs
                            .at(component.span)
                            .parse_stack_var_above_bottom(name.clone());
                        continue;
                    }

                    Kind::StackVar(name.clone())
                }

                ComponentNode::Var(name) => Kind::TypeVar(name.clone()),
            };

            vec.push(kind);
        }

        vec
    }
}

/// Stack variables are written with a capital letter: `'A`, `'Rest`.
fn is_stack_var(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
