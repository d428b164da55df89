use super::{Diagnostic, Label, MessageAdder, Span};

const UNKNOWN_WORD: &str = "EN00";
const REDEFINED: &str = "EN01";

impl MessageAdder<'_> {
    pub fn name_unknown(&mut self, name: impl Into<String>) {
        let labels = vec![Label::primary(self.at)
            .with_message(format!("no primitive or definition called `{}`", name.into()))];

        self.add(
            Diagnostic::error()
                .with_code(UNKNOWN_WORD)
                .with_message("unknown word")
                .with_labels(labels),
        );
    }

    pub fn name_redefined(&mut self, name: impl Into<String>, previous: Span) {
        let labels = vec![
            Label::primary(self.at)
                .with_message(format!("`{}` is already defined", name.into())),
            Label::secondary(previous).with_message("previous definition here"),
        ];

        self.add(
            Diagnostic::error()
                .with_code(REDEFINED)
                .with_message("duplicate definition")
                .with_labels(labels),
        );
    }
}
