//! Type inference for stack effects. The entry point is [`Inferer`], which
//! composes function types pairwise or folds a whole sequence of them.

pub mod constrain;
pub mod rename;
pub mod scope;
pub mod selftype;
pub mod unify;

pub use compose::{alpha_equivalent, matches_declared, FoldError, Inferer, Typed};
pub use error::{InferError, KindError};

mod compose;
mod error;
