use logos::Logos;

#[derive(Logos, Debug, PartialEq)]
pub enum RawToken<'src> {
    #[token("define")]
    Define,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("->")]
    Arrow,

    #[token("~>")]
    EffectArrow,

    #[token(":")]
    Colon,

    #[token("=")]
    Equal,

    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*", |lex| &lex.slice()[1..])]
    Var(&'src str),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    #[regex(r"[+\-*/%<>=!&|^~@$?.,]+")]
    Name(&'src str),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse())]
    Int(i64),

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse())]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Str(&'src str),

    #[regex(r"'([^'\\]|\\.)'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Char(&'src str),

    #[error]
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n\r]*", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Error,
}
