use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use purr_common::pretty::Style;
use purr_frontend::CheckOptions;

/// type inference for a small concatenative language.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
#[command(propagate_version = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

impl Arguments {
    pub fn options(&self) -> CheckOptions {
        self.command.options()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check every definition in a program and print its type.
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// Infer the type of a sequence of words.
    #[command(visible_alias = "i")]
    Infer(InferArgs),

    /// List the built in words.
    #[command(visible_alias = "p")]
    Primitives(DisplayOptions),
}

impl Command {
    pub fn options(&self) -> CheckOptions {
        match self {
            Self::Check(args) => args.display.options(args.verbose),
            Self::Infer(args) => args.display.options(args.verbose),
            Self::Primitives(display) => display.options(false),
        }
    }
}

#[derive(Debug, Args)]
pub struct DisplayOptions {
    /// Print types without quotes, with curried arrows.
    #[arg(long, action = ArgAction::SetTrue)]
    pub ml: bool,

    /// The width to fit printed types within.
    #[arg(long, default_value_t = 80)]
    pub width: usize,
}

impl DisplayOptions {
    fn options(&self, verbose: bool) -> CheckOptions {
        CheckOptions {
            verbose,
            style: if self.ml { Style::Ml } else { Style::Native },
            width: self.width,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub display: DisplayOptions,

    /// Trace every inference step.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[arg(required = true)]
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct InferArgs {
    #[command(flatten)]
    pub display: DisplayOptions,

    /// Trace every inference step.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// A program whose definitions the words may use.
    #[arg(long)]
    pub prelude: Option<PathBuf>,

    #[arg(required = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}
