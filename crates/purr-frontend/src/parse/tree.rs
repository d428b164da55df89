use purr_common::message::Span;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub defs: Vec<Definition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub name: String,
    pub name_span: Span,
    pub anno: Option<FnTypeExpr>,
    pub body: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub node: ExprNode,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprNode {
    Name(String),
    Literal(Literal),
    Quote(Vec<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

/// A written function type such as `('A int -> 'A bool)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FnTypeExpr {
    pub cons: Vec<Component>,
    pub prod: Vec<Component>,
    pub effects: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub node: ComponentNode,

    /// Documentation labels such as the `f` in `f=('A -> 'B)`.
    pub label: Option<(String, Span)>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ComponentNode {
    Function(FnTypeExpr),
    Named(String),
    Var(String),
    SelfType,
}
