use super::{Diagnostic, Label, MessageAdder};

const INCOMPATIBLE_KINDS: &str = "ET00";
const NOT_RUNTIME_POLYMORPHIC: &str = "ET01";
const ARITY: &str = "ET02";
const SELF_MISMATCH: &str = "ET03";
const DECLARED_MISMATCH: &str = "ET04";
const NOT_WELL_TYPED: &str = "ET05";

impl MessageAdder<'_> {
    pub fn tyck_incompatible(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        notes: Vec<String>,
    ) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "cannot unify `{}` with `{}`",
            left.into(),
            right.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(INCOMPATIBLE_KINDS)
                .with_message("incompatible kinds")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn tyck_not_runtime_polymorphic(
        &mut self,
        function: impl Into<String>,
        target: impl Into<String>,
        notes: Vec<String>,
    ) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "`{}` is used as `{}`",
            function.into(),
            target.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(NOT_RUNTIME_POLYMORPHIC)
                .with_message("function is not runtime polymorphic")
                .with_labels(labels)
                .with_notes(vec![
                    "only functions consuming and producing exactly one value can be used dynamically"
                        .into(),
                ])
                .with_notes(notes),
        );
    }

    pub fn tyck_arity(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        notes: Vec<String>,
    ) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "the stack `{}` does not fit `{}`",
            left.into(),
            right.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(ARITY)
                .with_message("stack size mismatch")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn tyck_self_mismatch(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        notes: Vec<String>,
    ) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "`{}` refers to its enclosing function and cannot be `{}`",
            left.into(),
            right.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(SELF_MISMATCH)
                .with_message("self type mismatch")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn tyck_declared_mismatch(
        &mut self,
        name: impl Into<String>,
        declared: impl Into<String>,
        inferred: impl Into<String>,
    ) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "`{}` is declared as `{}`",
            name.into(),
            declared.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(DECLARED_MISMATCH)
                .with_message("declared type does not match the inferred type")
                .with_labels(labels)
                .with_notes(vec![format!("the body has type `{}`", inferred.into())]),
        );
    }

    pub fn tyck_not_well_typed(&mut self, ty: impl Into<String>) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "`{}` produces variables it never consumes",
            ty.into()
        ))];

        self.add(
            Diagnostic::warning()
                .with_code(NOT_WELL_TYPED)
                .with_message("annotation is not well typed")
                .with_labels(labels),
        );
    }
}
