mod token;

#[cfg(test)]
mod tests;

use log::{info, trace};
use logos::Logos;

use purr_common::message::{File, Messages, Span};
use purr_common::Driver;
use token::RawToken;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Define,

    BracketOpen,
    BracketClose,
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,

    Arrow,
    EffectArrow,
    Colon,
    Equal,

    /// A type or stack variable, without its leading `'`.
    Var(String),
    Name(String),

    Int(i64),
    Float(f64),
    Str(String),
    Char(char),

    Invalid,
}

pub fn lex(driver: &mut impl Driver, src: impl AsRef<str>, file: File) -> Vec<(Token, Span)> {
    let (tokens, msgs) = lex_tokens(src.as_ref(), file);
    driver.report(msgs);
    tokens
}

/// Lex without reporting, for callers that collect messages themselves.
pub fn lex_tokens(src: &str, file: File) -> (Vec<(Token, Span)>, Messages) {
    info!("lexing file with id {file}");
    let mut lexer = Lexer::new(src, file);
    lexer.lex();
    trace!("done lexing {file}");
    (lexer.res, lexer.msgs)
}

struct Lexer<'src> {
    lex: logos::SpannedIter<'src, RawToken<'src>>,
    file: File,
    res: Vec<(Token, Span)>,
    msgs: Messages,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str, file: File) -> Self {
        Self {
            lex: RawToken::lexer(src).spanned(),
            file,
            res: Vec::new(),
            msgs: Messages::new(),
        }
    }

    fn lex(&mut self) {
        while self.dispatch() {}
    }

    fn dispatch(&mut self) -> bool {
        let Some((tok, span)) = self.lex.next() else {
            return false;
        };

        let span = Span::new(self.file, span.start, span.end);
        let tok = match tok {
            RawToken::Define => Token::Define,
            RawToken::LBracket => Token::BracketOpen,
            RawToken::RBracket => Token::BracketClose,
            RawToken::LBrace => Token::BraceOpen,
            RawToken::RBrace => Token::BraceClose,
            RawToken::LParen => Token::ParenOpen,
            RawToken::RParen => Token::ParenClose,
            RawToken::Arrow => Token::Arrow,
            RawToken::EffectArrow => Token::EffectArrow,
            RawToken::Colon => Token::Colon,
            RawToken::Equal => Token::Equal,
            RawToken::Var(name) => Token::Var(name.into()),
            RawToken::Name(name) => Token::Name(name.into()),
            RawToken::Int(value) => Token::Int(value),
            RawToken::Float(value) => Token::Float(value),
            RawToken::Str(text) => Token::Str(unescape(text)),

            RawToken::Char(text) => match unescape(text).chars().next() {
                Some(c) => Token::Char(c),
                None => {
                    self.msgs.at(span).lex_invalid();
                    Token::Invalid
                }
            },

            RawToken::Error => {
                if self.extend_invalid(span) {
                    return true;
                }

                self.msgs.at(span).lex_invalid();
                Token::Invalid
            }
        };

        self.res.push((tok, span));
        true
    }

    /// Grow the previous invalid token if `span` directly follows it, so that
    /// a run of invalid characters gives a single message.
    fn extend_invalid(&mut self, span: Span) -> bool {
        let Some((Token::Invalid, prev)) = self.res.last_mut() else {
            return false;
        };

        if prev.end != span.start {
            return false;
        }

        *prev += span;
        if let Some(msg) = self.msgs.msgs.last_mut() {
            for label in msg.labels.iter_mut() {
                label.span += span;
            }
        }

        true
    }
}

fn unescape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => res.push('\n'),
            Some('t') => res.push('\t'),
            Some('r') => res.push('\r'),
            Some('0') => res.push('\0'),
            Some(other) => res.push(other),
            None => res.push('\\'),
        }
    }

    res
}
