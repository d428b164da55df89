//! The built in words and their signatures.

use purr_common::kinds::{FnType, Fresh};
use purr_tyck::InferError;

use crate::lower::parse_fn_type;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Primitive {
    pub name: &'static str,
    pub signature: &'static str,
    pub doc: &'static str,
}

const fn prim(name: &'static str, signature: &'static str, doc: &'static str) -> Primitive {
    Primitive {
        name,
        signature,
        doc,
    }
}

pub const PRIMITIVES: &[Primitive] = &[
    // stack shuffling
    prim("id", "('a -> 'a)", "does nothing, but requires one item on the stack"),
    prim("dup", "('R 'a -> 'R 'a 'a)", "duplicates the top item"),
    prim("pop", "('R 'a -> 'R)", "removes the top item"),
    prim("swap", "('R 'a 'b -> 'R 'b 'a)", "swaps the top two items"),
    prim("dupd", "('R 'a 'b -> 'R 'a 'a 'b)", "duplicates the second item"),
    prim("swapd", "('R 'a 'b 'c -> 'R 'b 'a 'c)", "swaps the second and third items"),
    prim("popd", "('R 'a 'b -> 'R 'b)", "removes the second item"),
    prim("over", "('R 'a 'b -> 'R 'a 'b 'a)", "copies the second item to the top"),
    prim("dig", "('R 'a 'b 'c -> 'R 'b 'c 'a)", "moves the third item to the top"),
    prim("bury", "('R 'a 'b 'c -> 'R 'c 'a 'b)", "moves the top item below the next two"),
    // combinators
    prim("eval", "('A ('A -> 'B) -> 'B)", "evaluates a function"),
    prim("apply", "('A ('A -> 'B) -> 'B)", "evaluates a function"),
    prim(
        "dip",
        "('A 'b ('A -> 'C) -> 'C 'b)",
        "evaluates a function, temporarily removing the second item",
    ),
    prim(
        "compose",
        "('R ('A -> 'B) ('B -> 'C) -> 'R ('A -> 'C))",
        "creates a function by composing two functions",
    ),
    prim(
        "qv",
        "('R 'a -> 'R ('S -> 'S 'a))",
        "quotes a value, creating a function that pushes it",
    ),
    prim(
        "if",
        "('A bool ontrue=('A -> 'B) onfalse=('A -> 'B) -> 'B)",
        "evaluates one of two functions depending on a condition",
    ),
    prim(
        "while",
        "('A body=('A -> 'A) condition=('A -> 'A bool) -> 'A)",
        "repeatedly evaluates a body while a condition holds",
    ),
    prim(
        "try_catch",
        "('A ('A -> 'B) ('A any -> 'B) -> 'B)",
        "evaluates a function, and catches any exceptions",
    ),
    prim("throw", "(any -> )", "throws an exception"),
    // booleans
    prim("true", "( -> bool)", "pushes true"),
    prim("false", "( -> bool)", "pushes false"),
    prim("and", "(bool bool -> bool)", "logical conjunction"),
    prim("or", "(bool bool -> bool)", "logical disjunction"),
    prim("not", "(bool -> bool)", "logical negation"),
    // integers
    prim("+", "(int int -> int)", "adds two integers"),
    prim("-", "(int int -> int)", "subtracts two integers"),
    prim("*", "(int int -> int)", "multiplies two integers"),
    prim("/", "(int int -> int)", "divides two integers"),
    prim("%", "(int int -> int)", "remainder of integer division"),
    prim("neg", "(int -> int)", "negates an integer"),
    prim("inc", "(int -> int)", "adds one"),
    prim("dec", "(int -> int)", "subtracts one"),
    // doubles
    prim("add_dbl", "(double double -> double)", "adds two doubles"),
    prim("sub_dbl", "(double double -> double)", "subtracts two doubles"),
    prim("mul_dbl", "(double double -> double)", "multiplies two doubles"),
    prim("div_dbl", "(double double -> double)", "divides two doubles"),
    prim("int_to_dbl", "(int -> double)", "converts an integer into a double"),
    // comparisons
    prim("eq", "(any any -> bool)", "compares any two values for equality"),
    prim("==", "('a 'a -> bool)", "compares two values of the same type"),
    prim("!=", "('a 'a -> bool)", "compares two values of the same type"),
    prim("<", "(int int -> bool)", "less than"),
    prim(">", "(int int -> bool)", "greater than"),
    prim("<=", "(int int -> bool)", "less than or equal"),
    prim(">=", "(int int -> bool)", "greater than or equal"),
    // strings
    prim("str", "(any -> string)", "converts any value into a string"),
    prim("str_cat", "(string string -> string)", "concatenates two strings"),
    prim("str_len", "(string -> int)", "the length of a string"),
    prim("hex_str", "(int -> string)", "formats a number in hexadecimal"),
    prim("bin_str", "(int -> string)", "formats a number in binary"),
    prim("char_to_str", "(char -> string)", "a string of one character"),
    // lists
    prim("nil", "( -> list)", "creates an empty list"),
    prim("unit", "('a -> list)", "creates a list of one item"),
    prim("pair", "('second 'first -> list)", "creates a list from two items"),
    prim("cons", "(list 'a -> list)", "prepends an item to a list"),
    prim("uncons", "(list -> list any)", "the rest of a list and its first item"),
    prim("empty", "(list -> list bool)", "is the list empty?"),
    prim("count", "(list -> list int)", "the number of items in a list"),
    prim("nth", "(list int -> list any)", "the item at an index"),
    prim("cat", "(list list -> list)", "concatenates two lists"),
    prim("map", "(list ('a -> 'b) -> list)", "applies a function to every item"),
    prim("filter", "(list ('a -> bool) -> list)", "keeps the items passing a test"),
    prim(
        "fold",
        "('A list ('A any -> 'A) -> 'A)",
        "applies a function to each item in a list",
    ),
    prim("list", "(( -> 'A) -> list)", "creates a list from a function"),
    // side effects
    prim("write", "(any ~> )", "writes a value to the console"),
    prim("writeln", "(any ~> )", "writes a value and a newline to the console"),
    prim("read_line", "( ~> string)", "reads a line from the console"),
    prim("random", "(int ~> int)", "a random number below the given bound"),
];

/// Lower every primitive signature. The table is static, so a signature
/// that does not parse is a bug.
pub fn load(fresh: &mut Fresh) -> Result<Vec<(Primitive, FnType)>, InferError> {
    PRIMITIVES
        .iter()
        .map(|prim| {
            let ty = parse_fn_type(prim.signature, 0, fresh).map_err(|msgs| {
                InferError::internal(format!(
                    "signature of `{}` is malformed ({} messages)",
                    prim.name,
                    msgs.len()
                ))
            })?;
            Ok((*prim, ty))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use purr_common::kinds::Fresh;

    use super::{load, PRIMITIVES};

    #[test]
    fn every_signature_lowers() {
        let mut fresh = Fresh::new();
        let prims = load(&mut fresh).unwrap();
        assert_eq!(PRIMITIVES.len(), prims.len());
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = PRIMITIVES.iter().map(|prim| prim.name).collect();
        assert_eq!(PRIMITIVES.len(), names.len());
    }

    #[test]
    fn effects_are_marked() {
        let mut fresh = Fresh::new();
        let prims = load(&mut fresh).unwrap();

        let effectful: Vec<_> = prims
            .iter()
            .filter(|(_, ty)| ty.effects)
            .map(|(prim, _)| prim.name)
            .collect();

        assert_eq!(vec!["write", "writeln", "read_line", "random"], effectful);
    }
}
