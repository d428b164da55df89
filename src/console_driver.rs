use codespan_reporting::diagnostic::{
    Diagnostic as Report, Label as ReportLabel, LabelStyle as ReportLabelStyle,
    Severity as ReportSeverity,
};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config, DisplayStyle};
use log::error;

use purr_common::message::{Diagnostic, LabelStyle, Messages, Severity};
use purr_common::{Driver, Outcome};

use crate::output::format_definition;

pub struct ConsoleDriver {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: Config,

    show_definitions: bool,
    errors: usize,
}

impl ConsoleDriver {
    pub fn new(files: SimpleFiles<String, String>) -> Self {
        Self {
            files,
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: Config {
                display_style: DisplayStyle::Rich,
                ..Default::default()
            },

            show_definitions: true,
            errors: 0,
        }
    }

    pub fn files_mut(&mut self) -> &mut SimpleFiles<String, String> {
        &mut self.files
    }

    /// Whether checked definitions are printed. Diagnostics are always
    /// printed.
    pub fn show_definitions(&mut self, show: bool) {
        self.show_definitions = show;
    }

    /// Has any error been reported?
    pub fn failed(&self) -> bool {
        self.errors > 0
    }
}

impl Driver for ConsoleDriver {
    fn report(&mut self, messages: Messages) {
        for msg in messages.msgs {
            if msg.is_error() {
                self.errors += 1;
            }

            let report = convert(msg);
            if let Err(err) = term::emit(&mut self.writer, &self.config, &self.files, &report) {
                error!("unable to print diagnostic: {err}");
            }
        }
    }

    fn report_definition(&mut self, name: &str, outcome: Outcome, ty: impl FnOnce() -> String) {
        if outcome == Outcome::Error {
            self.errors += 1;
        }

        if self.show_definitions {
            let ty = match outcome {
                Outcome::Typed => ty(),
                Outcome::Untyped | Outcome::Error => String::new(),
            };

            println!("{}", format_definition(name, outcome, ty));
        }
    }
}

fn convert(msg: Diagnostic) -> Report<usize> {
    let severity = match msg.severity {
        Severity::Bug => ReportSeverity::Bug,
        Severity::Error => ReportSeverity::Error,
        Severity::Warning => ReportSeverity::Warning,
        Severity::Note => ReportSeverity::Note,
    };

    let labels = msg
        .labels
        .into_iter()
        .map(|label| {
            let style = match label.style {
                LabelStyle::Primary => ReportLabelStyle::Primary,
                LabelStyle::Secondary => ReportLabelStyle::Secondary,
            };

            ReportLabel::new(style, label.span.file, label.span.start..label.span.end)
                .with_message(label.message)
        })
        .collect();

    let report = Report::new(severity)
        .with_message(msg.message)
        .with_labels(labels)
        .with_notes(msg.notes);

    match msg.code {
        Some(code) => report.with_code(code),
        None => report,
    }
}
