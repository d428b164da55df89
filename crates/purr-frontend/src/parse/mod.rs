pub mod tree;

mod matcher;
mod program;
mod types;


use log::{info, trace};
use purr_common::message::{File, Messages, Span};
use purr_common::Driver;

use crate::lex::Token;
use matcher::Matcher;
use tree::{Expr, FnTypeExpr, Program};

pub fn parse(driver: &mut impl Driver, tokens: Vec<(Token, Span)>, file: File) -> Program {
    info!("parsing file with id {file}");

    let mut parser = Parser::new(tokens, file);
    let program = parser.parse_program();
    driver.report(parser.msgs);

    trace!("done parsing {file}");
    program
}

/// Parse a bare sequence of words, as given on the command line.
pub fn parse_words(driver: &mut impl Driver, tokens: Vec<(Token, Span)>, file: File) -> Vec<Expr> {
    let mut parser = Parser::new(tokens, file);
    let words = parser.parse_words();
    driver.report(parser.msgs);
    words
}

/// Parse a lone function type, reporting into the returned messages.
pub fn parse_fn_type(tokens: Vec<(Token, Span)>, file: File) -> (Option<FnTypeExpr>, Messages) {
    let mut parser = Parser::new(tokens, file);
    let ty = parser.parse_lone_fn_type();
    (ty, parser.msgs)
}

#[derive(Debug)]
struct Parser<I> {
    tokens: I,
    curr: Option<(Token, Span)>,
    prev: Option<(Token, Span)>,
    msgs: Messages,
    default_span: Span,
}

impl<I> Parser<I>
where
    I: Iterator<Item = (Token, Span)>,
{
    pub fn new<In>(tokens: In, file: File) -> Self
    where
        In: IntoIterator<Item = (Token, Span), IntoIter = I>,
    {
        let mut parser = Self {
            tokens: tokens.into_iter(),

            curr: None,
            prev: None,

            msgs: Messages::new(),
            default_span: Span::empty(file),
        };

        parser.advance();
        parser
    }

    fn is_done(&self) -> bool {
        self.curr.is_none()
    }

    fn advance(&mut self) {
        self.prev = self.curr.take();
        if let Some(curr) = self.tokens.next() {
            self.curr = Some(curr);
        }
    }

    fn peek(&self, matcher: impl Matcher) -> bool {
        self.curr
            .as_ref()
            .map(|(tok, _)| matcher.matches(tok))
            .unwrap_or(false)
    }

    fn consume(&mut self, matcher: impl Matcher) -> bool {
        if self.peek(matcher) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches(&mut self, matcher: impl Matcher) -> Option<Span> {
        if self.peek(matcher) {
            self.advance();
            self.prev.as_ref().map(|(_, span)| *span)
        } else {
            None
        }
    }

    /// The span of the current token, or of the end of the previous one when
    /// the input is exhausted.
    fn here(&self) -> Span {
        match (&self.curr, &self.prev) {
            (Some((_, span)), _) => *span,
            (None, Some((_, span))) => Span::new(span.file, span.end, span.end),
            (None, None) => self.default_span,
        }
    }
}
