use purr_common::message::Span;

use super::tree::{Definition, Expr, ExprNode, Literal, Program};
use super::Parser;
use crate::lex::Token;

impl<I> Parser<I>
where
    I: Iterator<Item = (Token, Span)>,
{
    /// ```abnf
    /// program = *definition
    /// ```
    pub fn parse_program(&mut self) -> Program {
        let mut defs = vec![];

        while !self.is_done() {
            let reported = if self.peek(Token::Define) {
                match self.definition() {
                    Some(def) => {
                        defs.push(def);
                        continue;
                    }
                    None => true,
                }
            } else {
                false
            };

            // skip to the next definition
            let mut skipped = None;
            while !self.is_done() && !self.peek(Token::Define) {
                self.advance();
                if skipped.is_none() {
                    skipped = self.prev.as_ref().map(|(_, span)| *span);
                }
            }

            if let (Some(span), false) = (skipped, reported) {
                self.msgs.at(span).parse_expected_definition();
            }
        }

        Program { defs }
    }

    /// ```abnf
    /// definition = "define" name [":" fn-type] "{" *expr "}"
    /// ```
    fn definition(&mut self) -> Option<Definition> {
        let define_span = self.matches(Token::Define)?;

        let (name, name_span) = match self.curr.clone() {
            Some((Token::Name(name), span)) => {
                self.advance();
                (name, span)
            }

            _ => {
                self.msgs.at(self.here()).parse_expected_name();
                return None;
            }
        };

        let anno = if self.consume(Token::Colon) {
            if self.peek(Token::ParenOpen) {
                Some(self.fn_type()?)
            } else {
                self.msgs.at(self.here()).parse_expected_fn_type();
                return None;
            }
        } else {
            None
        };

        let Some(opener) = self.matches(Token::BraceOpen) else {
            self.msgs.at(self.here()).parse_expected_body();
            return None;
        };

        let body = self.exprs();

        let Some(closer) = self.matches(Token::BraceClose) else {
            self.msgs.at(self.here()).parse_unclosed("}", Some(opener));
            return None;
        };

        Some(Definition {
            name,
            name_span,
            anno,
            body,
            span: define_span + closer,
        })
    }

    /// Parse words until the end of the input.
    pub fn parse_words(&mut self) -> Vec<Expr> {
        let words = self.exprs();

        if !self.is_done() {
            self.msgs.at(self.here()).parse_expected_definition();
        }

        words
    }

    /// ```abnf
    /// exprs = *expr
    /// ```
    fn exprs(&mut self) -> Vec<Expr> {
        let mut exprs = vec![];

        loop {
            // already reported by the lexer
            if self.consume(Token::Invalid) {
                continue;
            }

            match self.expr() {
                Some(expr) => exprs.push(expr),
                None => break,
            }
        }

        exprs
    }

    /// ```abnf
    /// expr = name / literal / "[" *expr "]"
    /// ```
    fn expr(&mut self) -> Option<Expr> {
        let (tok, span) = self.curr.clone()?;

        let node = match tok {
            Token::Name(name) => ExprNode::Name(name),
            Token::Int(value) => ExprNode::Literal(Literal::Int(value)),
            Token::Float(value) => ExprNode::Literal(Literal::Float(value)),
            Token::Str(text) => ExprNode::Literal(Literal::Str(text)),
            Token::Char(c) => ExprNode::Literal(Literal::Char(c)),

            Token::BracketOpen => {
                self.advance();
                let body = self.exprs();

                let end = match self.matches(Token::BracketClose) {
                    Some(end) => end,
                    None => {
                        self.msgs.at(self.here()).parse_unclosed("]", Some(span));
                        body.last().map(|expr| expr.span).unwrap_or(span)
                    }
                };

                return Some(Expr {
                    node: ExprNode::Quote(body),
                    span: span + end,
                });
            }

            _ => return None,
        };

        self.advance();
        Some(Expr { node, span })
    }
}
