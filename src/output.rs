use console::style;
use purr_common::Outcome;
use purr_frontend::primitives::Primitive;

/// `name : type`, with the type replaced by `?` or `<error>` when there is
/// none.
pub fn format_definition(name: &str, outcome: Outcome, ty: String) -> String {
    let ty = match outcome {
        Outcome::Typed => ty,
        Outcome::Untyped => style("?").yellow().to_string(),
        Outcome::Error => style("<error>").red().to_string(),
    };

    format!("{} : {ty}", style(name).bold())
}

pub fn format_primitive(prim: &Primitive, ty: String) -> String {
    format!(
        "{} : {ty}\n    {}",
        style(prim.name).bold(),
        style(prim.doc).dim()
    )
}
