use super::{Diagnostic, Label, MessageAdder, Span};

const EXPECTED_DEFINITION: &str = "EP00";
const EXPECTED_NAME: &str = "EP01";
const EXPECTED_BODY: &str = "EP02";
const UNCLOSED: &str = "EP03";
const STACK_VAR_ABOVE_BOTTOM: &str = "EP04";
const EXPECTED_ARROW: &str = "EP05";
const BAD_LABEL: &str = "EP06";
const EXPECTED_FN_TYPE: &str = "EP07";
const EXPECTED_VAR_NAME: &str = "EP08";

impl MessageAdder<'_> {
    pub fn parse_expected_definition(&mut self) {
        let labels = vec![Label::primary(self.at).with_message("expected `define` here")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_DEFINITION)
                .with_message("expected a definition")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_name(&mut self) {
        let labels = vec![Label::primary(self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_NAME)
                .with_message("expected the name of the definition")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_body(&mut self) {
        let labels = vec![Label::primary(self.at).with_message("expected `{` here")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_BODY)
                .with_message("expected a code block")
                .with_labels(labels),
        );
    }

    pub fn parse_unclosed(&mut self, closer: &str, opener: Option<Span>) {
        let mut labels = vec![Label::primary(self.at).with_message(format!("expected `{closer}`"))];
        if let Some(opener) = opener {
            labels.push(Label::secondary(opener).with_message("opened here"));
        }

        self.add(
            Diagnostic::error()
                .with_code(UNCLOSED)
                .with_message(format!("missing `{closer}`"))
                .with_labels(labels),
        );
    }

    pub fn parse_stack_var_above_bottom(&mut self, name: impl Into<String>) {
        let labels = vec![Label::primary(self.at).with_message(format!(
            "'{} is a stack variable, but it is not at the bottom of the stack",
            name.into()
        ))];

        self.add(
            Diagnostic::error()
                .with_code(STACK_VAR_ABOVE_BOTTOM)
                .with_message("misplaced stack variable")
                .with_labels(labels)
                .with_notes(vec![
                    "a stack variable stands for the rest of the stack, so it must come first"
                        .into(),
                ]),
        );
    }

    pub fn parse_expected_arrow(&mut self) {
        let labels = vec![Label::primary(self.at).with_message("expected `->` or `~>`")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_ARROW)
                .with_message("expected an arrow in the function type")
                .with_labels(labels),
        );
    }

    pub fn parse_bad_label(&mut self) {
        let labels = vec![Label::primary(self.at)];

        self.add(
            Diagnostic::error()
                .with_code(BAD_LABEL)
                .with_message("only function types and named types can be labelled")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_fn_type(&mut self) {
        let labels = vec![Label::primary(self.at).with_message("expected `(` here")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_FN_TYPE)
                .with_message("expected a function type")
                .with_labels(labels),
        );
    }

    pub fn parse_expected_var_name(&mut self) {
        let labels = vec![Label::primary(self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_VAR_NAME)
                .with_message("invalid type or stack variable name")
                .with_labels(labels),
        );
    }
}
