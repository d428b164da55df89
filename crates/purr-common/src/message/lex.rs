use super::{Diagnostic, Label, MessageAdder};

const INVALID_CHARACTERS: &str = "EL00";

impl MessageAdder<'_> {
    pub fn lex_invalid(&mut self) {
        let labels = vec![Label::primary(self.at)];

        self.add(
            Diagnostic::error()
                .with_code(INVALID_CHARACTERS)
                .with_message("invalid characters")
                .with_labels(labels),
        );
    }
}
