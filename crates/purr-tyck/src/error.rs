use std::error::Error;
use std::fmt;

use purr_common::kinds::{FnType, Kind, Vector};

/// Two kinds that cannot be reconciled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KindError {
    Incompatible { left: Kind, right: Kind },

    /// A function which does not consume and produce exactly one value was
    /// used where an opaque value is expected.
    NotRuntimePolymorphic { function: FnType, target: Kind },

    /// Two stack segments of different lengths.
    Arity { left: Vector, right: Vector },

    SelfMismatch { left: Kind, right: Kind },
}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incompatible { left, right } => {
                write!(f, "incompatible kinds `{left}` and `{right}`")
            }
            Self::NotRuntimePolymorphic { function, target } => write!(
                f,
                "function `{function}` is not runtime polymorphic and cannot be used as `{target}`"
            ),
            Self::Arity { left, right } => {
                write!(f, "stack segments `{left}` and `{right}` differ in length")
            }
            Self::SelfMismatch { left, right } => {
                write!(f, "self type `{left}` cannot be unified with `{right}`")
            }
        }
    }
}

impl Error for KindError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InferError {
    Kind(KindError),

    /// A broken invariant inside the inference engine. Never caused by the
    /// input program.
    Internal(String),
}

impl InferError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(err) => write!(f, "{err}"),
            Self::Internal(msg) => write!(f, "internal inference error: {msg}"),
        }
    }
}

impl Error for InferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kind(err) => Some(err),
            Self::Internal(_) => None,
        }
    }
}

impl From<KindError> for InferError {
    fn from(err: KindError) -> Self {
        Self::Kind(err)
    }
}
