use purr_common::message::Span;

use super::tree::{Component, ComponentNode, FnTypeExpr};
use super::Parser;
use crate::lex::Token;

impl<I> Parser<I>
where
    I: Iterator<Item = (Token, Span)>,
{
    /// A function type followed by nothing else.
    pub fn parse_lone_fn_type(&mut self) -> Option<FnTypeExpr> {
        if !self.peek(Token::ParenOpen) {
            self.msgs.at(self.here()).parse_expected_fn_type();
            return None;
        }

        let ty = self.fn_type()?;
        if !self.is_done() {
            self.msgs.at(self.here()).parse_unclosed(")", Some(ty.span));
            return None;
        }

        Some(ty)
    }

    /// ```abnf
    /// fn-type = "(" *component ("->" / "~>") *component ")"
    /// ```
    pub(super) fn fn_type(&mut self) -> Option<FnTypeExpr> {
        let opener = self.matches(Token::ParenOpen)?;

        let cons = self.components()?;

        let effects = if self.consume(Token::Arrow) {
            false
        } else if self.consume(Token::EffectArrow) {
            true
        } else {
            self.msgs.at(self.here()).parse_expected_arrow();
            return None;
        };

        let prod = self.components()?;

        let Some(closer) = self.matches(Token::ParenClose) else {
            self.msgs.at(self.here()).parse_unclosed(")", Some(opener));
            return None;
        };

        Some(FnTypeExpr {
            cons,
            prod,
            effects,
            span: opener + closer,
        })
    }

    fn components(&mut self) -> Option<Vec<Component>> {
        let mut components = vec![];
        while let Some(component) = self.component()? {
            components.push(component);
        }
        Some(components)
    }

    /// ```abnf
    /// component = [ident "="] (fn-type / ident) / "'" var / "self"
    /// ```
    ///
    /// Returns `Some(None)` at the end of a component list and `None` after
    /// an error.
    fn component(&mut self) -> Option<Option<Component>> {
        let Some((tok, span)) = self.curr.clone() else {
            return Some(None);
        };

        match tok {
            Token::Var(name) => {
                self.advance();
                if name.starts_with('_') {
                    self.msgs.at(span).parse_expected_var_name();
                    return None;
                }

                Some(Some(Component {
                    node: ComponentNode::Var(name),
                    label: None,
                    span,
                }))
            }

            Token::ParenOpen => {
                let ty = self.fn_type()?;
                let span = ty.span;
                Some(Some(Component {
                    node: ComponentNode::Function(ty),
                    label: None,
                    span,
                }))
            }

            Token::Name(name) => {
                self.advance();

                if !self.consume(Token::Equal) {
                    let node = if name == "self" {
                        ComponentNode::SelfType
                    } else {
                        ComponentNode::Named(name)
                    };

                    return Some(Some(Component {
                        node,
                        label: None,
                        span,
                    }));
                }

                let Some(mut labelled) = self.component()? else {
                    self.msgs.at(self.here()).parse_expected_fn_type();
                    return None;
                };

                labelled.label = Some((name, span));
                labelled.span = span + labelled.span;
                Some(Some(labelled))
            }

            _ => Some(None),
        }
    }
}
