pub mod check;
pub mod lex;
pub mod lower;
pub mod parse;
pub mod primitives;

pub use check::{CheckOptions, Checker};
